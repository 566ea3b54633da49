/// Linear gain for an envelope value.
///
/// Above the threshold the gain is `1 - (env - threshold) / (env * ratio)`,
/// otherwise unity. Nothing is clamped: a ratio of zero or an envelope of
/// zero over a negative threshold yields infinities, NaN or negative gain,
/// and those values are returned unchanged.
#[inline]
pub fn compute_gain(envelope: f32, threshold: f32, ratio: f32) -> f32 {
    if envelope > threshold {
        1.0 - (envelope - threshold) / (envelope * ratio)
    } else {
        1.0
    }
}
