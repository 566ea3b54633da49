use crate::envelope::{EnvelopeFollower, Phase};
use crate::error::Result;
use crate::gain::compute_gain;
use crate::lookahead::{lookahead_frames, LookaheadAligner};
use crate::settings::CompressorSettings;
use crate::trace::{DebugTrace, TraceEntry, TraceState};

/// Stateful per-sample dynamic range compressor.
///
/// Envelope and gain persist across [`Compressor::process`] calls, so one
/// instance should follow one stream (or one channel of it) from start to
/// end. Setters take effect on the next processed sample and perform no
/// validation; see [`Compressor::validated`] for the strict constructor.
///
/// With a non-zero lookahead, gain is still computed from each sample as it
/// arrives, but the sample and that gain are queued for
/// `round(lookahead_ms / 1000 * sample_rate)` frames before being multiplied
/// and written out. The delay lines start as silence with unity gain.
#[derive(Debug, Clone)]
pub struct Compressor {
    threshold: f32,
    ratio: f32,
    attack_time: f32,
    release_time: f32,
    lookahead_time_ms: f32,
    follower: EnvelopeFollower,
    gain: f32,
    aligner: LookaheadAligner,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor {
    pub fn new() -> Self {
        Self::from_settings(CompressorSettings::default())
    }

    /// Applies `settings` as-is, including out-of-range values.
    pub fn from_settings(settings: CompressorSettings) -> Self {
        Self {
            threshold: settings.threshold,
            ratio: settings.ratio,
            attack_time: settings.attack,
            release_time: settings.release,
            lookahead_time_ms: settings.lookahead_ms,
            follower: EnvelopeFollower::new(),
            gain: 1.0,
            aligner: LookaheadAligner::new(0),
        }
    }

    /// Like [`Compressor::from_settings`], but rejects settings that would
    /// make the gain computer divide by zero or go negative.
    pub fn validated(settings: CompressorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_settings(settings))
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
    }

    /// Stored but not used by the envelope follower; attack is instant.
    pub fn set_attack(&mut self, attack: f32) {
        self.attack_time = attack;
    }

    pub fn set_release(&mut self, release: f32) {
        self.release_time = release;
    }

    pub fn set_lookahead(&mut self, lookahead_ms: f32) {
        self.lookahead_time_ms = lookahead_ms;
    }

    pub fn settings(&self) -> CompressorSettings {
        CompressorSettings {
            threshold: self.threshold,
            ratio: self.ratio,
            attack: self.attack_time,
            release: self.release_time,
            lookahead_ms: self.lookahead_time_ms,
        }
    }

    pub fn envelope(&self) -> f32 {
        self.follower.value()
    }

    /// Last gain computed from an input sample (not necessarily the one
    /// applied to the last output when lookahead is active).
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Current length of the delay lines in frames.
    pub fn lookahead_len(&self) -> usize {
        self.aligner.len()
    }

    /// Compresses `buffer` in place, delaying it by the configured lookahead.
    pub fn process(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let frames = lookahead_frames(self.lookahead_time_ms, sample_rate);
        self.run(buffer, frames, None);
    }

    /// Compresses `buffer` in place without any delay.
    ///
    /// Equivalent to [`Compressor::process`] with a lookahead of zero; any
    /// queued lookahead samples are dropped.
    pub fn process_no_lookahead(&mut self, buffer: &mut [f32]) {
        self.run(buffer, 0, None);
    }

    /// [`Compressor::process`] that also records one entry per sample.
    pub fn process_traced(&mut self, buffer: &mut [f32], sample_rate: f32, trace: &mut DebugTrace) {
        let frames = lookahead_frames(self.lookahead_time_ms, sample_rate);
        self.run(buffer, frames, Some(trace));
    }

    fn run(&mut self, buffer: &mut [f32], frames: usize, mut trace: Option<&mut DebugTrace>) {
        if let Some(trace) = trace.as_deref_mut() {
            trace.clear();
            trace.reserve(buffer.len());
        }

        // parameters cannot change mid-call, so one length check covers the buffer
        self.aligner.ensure_len(frames);

        for (i, sample) in buffer.iter_mut().enumerate() {
            let input = *sample;
            let (envelope, phase) = self.follower.update(input, self.release_time);
            self.gain = compute_gain(envelope, self.threshold, self.ratio);

            let (delayed, delayed_gain) = self.aligner.align(input, self.gain);
            *sample = delayed * delayed_gain;

            if let Some(trace) = trace.as_deref_mut() {
                let state = if envelope <= self.threshold {
                    TraceState::Idle
                } else {
                    match phase {
                        Phase::Attack => TraceState::Attack,
                        Phase::Release => TraceState::Release,
                    }
                };
                trace.push(TraceEntry {
                    index: i + 1,
                    input,
                    envelope,
                    gain: self.gain,
                    state,
                    output: *sample,
                });
            }
        }
    }
}
