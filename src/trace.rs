use std::fmt;

/// Coarse label for what the detector was doing on a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    /// Envelope at or below threshold, no reduction.
    Idle,
    /// Envelope above threshold and rising.
    Attack,
    /// Envelope above threshold and decaying.
    Release,
}

impl fmt::Display for TraceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TraceState::Idle => "Idle",
            TraceState::Attack => "Attack",
            TraceState::Release => "Release",
        };
        // pad() so width/alignment flags apply
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceEntry {
    /// 1-based position within the processed buffer
    pub index: usize,
    pub input: f32,
    pub envelope: f32,
    /// Gain computed from this sample's input
    pub gain: f32,
    pub state: TraceState,
    /// Value written back to the buffer
    pub output: f32,
}

/// Per-sample diagnostic record of one processing call.
///
/// Hand one to [`crate::Compressor::process_traced`]; it is cleared at the
/// start of every call. `Display` renders the fixed-width table used by the
/// `trace` subcommand.
#[derive(Debug, Clone, Default)]
pub struct DebugTrace {
    entries: Vec<TraceEntry>,
}

impl DebugTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    pub(crate) fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }
}

impl fmt::Display for DebugTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10}{:<10}{:<12}{:<10}{:<10}{:<10}",
            "Sample", "Input", "Envelope", "Gain", "State", "Output"
        )?;
        writeln!(f, "{}", "-".repeat(60))?;

        for e in &self.entries {
            writeln!(
                f,
                "{:<10}{:<10.3}{:<12.3}{:<10.3}{:<10}{:<10.3}",
                e.index, e.input, e.envelope, e.gain, e.state, e.output
            )?;
        }

        Ok(())
    }
}
