use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use lookahead_compressor::{wav, Compressor, CompressorError, CompressorSettings};

fn write_i16_stereo(path: &Path, frames: &[(i16, i16)]) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 1000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &(l, r) in frames {
        writer.write_sample(l).unwrap();
        writer.write_sample(r).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_f32_mono(path: &Path, samples: &[f32]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 1000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_read_channels_deinterleaves_and_scales() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.wav");
    write_i16_stereo(&path, &[(16384, -16384), (0, 8192)]);

    let (spec, channels) = wav::read_channels(&path).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(channels, vec![vec![0.5, 0.0], vec![-0.5, 0.25]]);
}

#[test]
fn test_compress_file_runs_channels_independently() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");

    // left is loud, right stays under threshold
    let frames: Vec<(i16, i16)> = (0..50)
        .map(|i| if i % 10 == 0 { (29491, 3277) } else { (3277, 3277) })
        .collect();
    write_i16_stereo(&input, &frames);

    let settings = CompressorSettings {
        threshold: 0.5,
        ratio: 4.0,
        release: 0.2,
        ..Default::default()
    };
    let report = wav::compress_file(&input, &output, settings, 8).unwrap();
    assert_eq!(report.channels, 2);
    assert_eq!(report.frames, 50);
    assert_eq!(report.lookahead_frames, 0);

    let (out_spec, out) = wav::read_channels(&output).unwrap();
    assert_eq!(out_spec.sample_format, SampleFormat::Float);
    assert_eq!(out_spec.sample_rate, 1000);

    let (_, original) = wav::read_channels(&input).unwrap();
    let mut expected_left = original[0].clone();
    Compressor::from_settings(settings).process(&mut expected_left, 1000.0);

    assert_eq!(out[0], expected_left);
    assert!(out[0][0] < original[0][0]);
    assert_eq!(out[1], original[1]);
}

#[test]
fn test_compress_file_with_lookahead_delays_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_f32_mono(&input, &[0.1, 0.2, 0.3, 0.4, 0.5]);

    let settings = CompressorSettings {
        threshold: 0.9,
        lookahead_ms: 2.0,
        ..Default::default()
    };
    let report = wav::compress_file(&input, &output, settings, 2).unwrap();
    assert_eq!(report.lookahead_frames, 2);

    let (_, out) = wav::read_channels(&output).unwrap();
    assert_eq!(out[0], vec![0.0, 0.0, 0.1, 0.2, 0.3]);
}

#[test]
fn test_compress_dir_skips_non_wav() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();

    write_f32_mono(&input_dir.join("a.wav"), &[0.1, 0.9, 0.2]);
    write_f32_mono(&input_dir.join("b.wav"), &[0.3, 0.3]);
    fs::write(input_dir.join("notes.txt"), "not audio").unwrap();
    fs::write(input_dir.join("broken.wav"), "not a wav either").unwrap();

    let settings = CompressorSettings {
        threshold: 0.5,
        ratio: 2.0,
        ..Default::default()
    };
    let mut reports = wav::compress_dir(&input_dir, &output_dir, settings, 1024).unwrap();
    reports.sort_by(|a, b| a.input.cmp(&b.input));

    assert_eq!(reports.len(), 2);
    assert!(output_dir.join("a.wav").exists());
    assert!(output_dir.join("b.wav").exists());
    assert!(!output_dir.join("notes.txt").exists());

    let (_, b) = wav::read_channels(&output_dir.join("b.wav")).unwrap();
    assert_eq!(b[0], vec![0.3, 0.3]);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = wav::compress_file(
        &dir.path().join("missing.wav"),
        &dir.path().join("out.wav"),
        CompressorSettings::default(),
        64,
    )
    .unwrap_err();
    assert!(matches!(err, CompressorError::Wav(_)));
}

#[test]
fn test_settings_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comp.toml");
    fs::write(
        &path,
        "[compressor]\nthreshold = 0.25\nratio = 8.0\nrelease = 0.1\nlookahead_ms = 1.5\n",
    )
    .unwrap();

    let settings = CompressorSettings::load(&path).unwrap();
    assert_eq!(settings.threshold, 0.25);
    assert_eq!(settings.ratio, 8.0);
    assert_eq!(settings.release, 0.1);
    assert_eq!(settings.lookahead_ms, 1.5);
    assert_eq!(settings.attack, 0.05);
    assert!(Compressor::validated(settings).is_ok());
}
