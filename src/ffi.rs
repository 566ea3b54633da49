//! One-shot entry points for hosts that hand over a raw `float*` buffer.
//!
//! Every call builds a fresh [`Compressor`], so envelope and lookahead state
//! never survive between calls. That suits offline/batch use; a streaming
//! host should keep a [`Compressor`] per channel instead.

use std::os::raw::{c_float, c_int};
use std::slice;

use crate::compressor::Compressor;
use crate::settings::CompressorSettings;

/// Compresses `buffer` once with no lookahead.
pub fn compress_once(buffer: &mut [f32], threshold: f32, ratio: f32, attack: f32, release: f32) {
    let mut compressor = configured(threshold, ratio, attack, release);
    let mut samples = buffer.to_vec();
    compressor.process_no_lookahead(&mut samples);
    buffer.copy_from_slice(&samples);
}

/// Compresses `buffer` once with `lookahead_ms` of delay at `sample_rate`.
pub fn compress_once_with_lookahead(buffer: &mut [f32], settings: CompressorSettings, sample_rate: f32) {
    let mut compressor = Compressor::from_settings(settings);
    let mut samples = buffer.to_vec();
    compressor.process(&mut samples, sample_rate);
    buffer.copy_from_slice(&samples);
}

fn configured(threshold: f32, ratio: f32, attack: f32, release: f32) -> Compressor {
    let mut compressor = Compressor::new();
    compressor.set_threshold(threshold);
    compressor.set_ratio(ratio);
    compressor.set_attack(attack);
    compressor.set_release(release);
    compressor
}

/// # Safety
///
/// `buffer` must point to `size` initialised, writable `f32`s that nothing
/// else touches for the duration of the call. A null pointer or a
/// non-positive size is ignored.
#[no_mangle]
pub unsafe extern "C" fn process_audio_buffer(
    buffer: *mut c_float,
    size: c_int,
    threshold: c_float,
    ratio: c_float,
    attack: c_float,
    release: c_float,
) {
    if buffer.is_null() || size <= 0 {
        return;
    }

    let samples = slice::from_raw_parts_mut(buffer, size as usize);
    compress_once(samples, threshold, ratio, attack, release);
}

/// # Safety
///
/// Same contract as [`process_audio_buffer`].
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn process_audio_buffer_lookahead(
    buffer: *mut c_float,
    size: c_int,
    threshold: c_float,
    ratio: c_float,
    attack: c_float,
    release: c_float,
    lookahead_ms: c_float,
    sample_rate: c_float,
) {
    if buffer.is_null() || size <= 0 {
        return;
    }

    let samples = slice::from_raw_parts_mut(buffer, size as usize);
    let settings = CompressorSettings {
        threshold,
        ratio,
        attack,
        release,
        lookahead_ms,
    };
    compress_once_with_lookahead(samples, settings, sample_rate);
}
