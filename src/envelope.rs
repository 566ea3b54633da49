/// Which branch the follower took on the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The input rose above the envelope and the envelope jumped to it.
    Attack,
    /// The envelope decayed toward the input.
    Release,
}

/// Peak-hold envelope follower with exponential decay.
///
/// Rising input is tracked instantly. Falling input is approached with
/// `release` used directly as the per-sample smoothing coefficient, so a
/// value of 0.0 holds the peak forever and 1.0 follows the input exactly.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeFollower {
    envelope: f32,
}

impl EnvelopeFollower {
    pub fn new() -> Self {
        Self { envelope: 0.0 }
    }

    pub fn value(&self) -> f32 {
        self.envelope
    }

    /// Feeds one sample and returns the updated envelope with the branch taken.
    #[inline]
    pub fn update(&mut self, sample: f32, release: f32) -> (f32, Phase) {
        let level = sample.abs();
        let phase = if level > self.envelope {
            // attack time is not applied; the peak is taken as-is
            self.envelope = level;
            Phase::Attack
        } else {
            self.envelope = self.envelope * (1.0 - release) + level * release;
            Phase::Release
        };

        (self.envelope, phase)
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}
