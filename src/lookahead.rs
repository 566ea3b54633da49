use std::collections::VecDeque;

use tracing::debug;

/// Longest delay line the aligner will allocate, about 10 s at 192 kHz.
pub const MAX_LOOKAHEAD_FRAMES: usize = 1 << 21;

/// Number of frames covered by `lookahead_ms` at `sample_rate`.
///
/// Negative or NaN inputs produce zero frames; anything past
/// [`MAX_LOOKAHEAD_FRAMES`], infinity included, is capped to it.
pub fn lookahead_frames(lookahead_ms: f32, sample_rate: f32) -> usize {
    let frames = (lookahead_ms / 1000.0 * sample_rate).round() as usize;
    frames.min(MAX_LOOKAHEAD_FRAMES)
}

/// Delays raw samples against the gain computed from them.
///
/// Each call to [`LookaheadAligner::align`] queues the current sample and
/// its freshly computed gain, and hands back the pair queued `len` calls
/// ago. The sample line starts zero-filled and the gain line unity-filled,
/// so the first `len` outputs are silence.
#[derive(Debug, Clone, Default)]
pub struct LookaheadAligner {
    samples: VecDeque<f32>,
    gains: VecDeque<f32>,
}

impl LookaheadAligner {
    pub fn new(len: usize) -> Self {
        Self {
            samples: VecDeque::from(vec![0.0; len]),
            gains: VecDeque::from(vec![1.0; len]),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Resets both delay lines to `len` when the required length changed.
    ///
    /// Returns `true` if a reset happened; queued samples are discarded.
    pub fn ensure_len(&mut self, len: usize) -> bool {
        if self.samples.len() == len {
            return false;
        }

        debug!(from = self.samples.len(), to = len, "resetting lookahead delay lines");
        *self = Self::new(len);
        true
    }

    /// Swaps the current `(sample, gain)` in for the oldest queued pair.
    ///
    /// With an empty line the current pair passes straight through.
    #[inline]
    pub fn align(&mut self, sample: f32, gain: f32) -> (f32, f32) {
        match (self.samples.pop_front(), self.gains.pop_front()) {
            (Some(delayed_sample), Some(delayed_gain)) => {
                self.samples.push_back(sample);
                self.gains.push_back(gain);
                (delayed_sample, delayed_gain)
            }
            _ => (sample, gain),
        }
    }
}
