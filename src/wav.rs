use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rayon::prelude::*;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::compressor::Compressor;
use crate::error::{CompressorError, Result};
use crate::settings::CompressorSettings;

/// What happened to one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub channels: u16,
    pub sample_rate: u32,
    pub frames: usize,
    pub lookahead_frames: usize,
}

fn compute_volume_scale(spec: WavSpec) -> Option<f32> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => Some(1.0),
        (SampleFormat::Int, bits @ 1..=32) => Some((1u64 << (bits - 1)) as f32),
        _ => None,
    }
}

/// Reads `path` into one sample vector per channel, scaled to [-1.0, 1.0).
pub fn read_channels(path: &Path) -> Result<(WavSpec, Vec<Vec<f32>>)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let volume_scale =
        compute_volume_scale(spec).ok_or_else(|| CompressorError::UnsupportedFormat {
            path: path.to_path_buf(),
            bits: spec.bits_per_sample,
            format: spec.sample_format,
        })?;

    let channel_count = spec.channels.max(1) as usize;
    let frames = reader.duration() as usize;
    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frames))
        .collect();

    let samples: Box<dyn Iterator<Item = hound::Result<f32>> + '_> =
        if spec.sample_format == SampleFormat::Float {
            Box::new(reader.samples::<f32>())
        } else {
            Box::new(reader.samples::<i32>().map(move |res| res.map(|s| s as f32 / volume_scale)))
        };

    // interleaved: L R L R ...
    for (i, sample) in samples.enumerate() {
        channels[i % channel_count].push(sample?);
    }

    Ok((spec, channels))
}

/// Writes per-channel samples as an interleaved 32-bit float WAV.
pub fn write_channels(path: &Path, sample_rate: u32, channels: &[Vec<f32>]) -> Result<()> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(channel.get(frame).copied().unwrap_or(0.0))?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Compresses every channel of `input` and writes the result to `output`.
///
/// Each channel gets its own compressor, fed `block_size` frames at a time
/// so envelope and lookahead state carry from block to block the way they
/// would on a live stream.
pub fn compress_file(
    input: &Path,
    output: &Path,
    settings: CompressorSettings,
    block_size: usize,
) -> Result<FileReport> {
    let (spec, mut channels) = read_channels(input)?;
    let sample_rate = spec.sample_rate as f32;
    let block_size = block_size.max(1);

    let mut lookahead_frames = 0;
    for channel in channels.iter_mut() {
        let mut compressor = Compressor::from_settings(settings);
        for block in channel.chunks_mut(block_size) {
            compressor.process(block, sample_rate);
        }
        lookahead_frames = compressor.lookahead_len();
    }

    write_channels(output, spec.sample_rate, &channels)?;

    let report = FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        frames: channels.first().map(Vec::len).unwrap_or(0),
        lookahead_frames,
    };
    info!(
        input = %report.input.display(),
        output = %report.output.display(),
        channels = report.channels,
        sample_rate = report.sample_rate,
        frames = report.frames,
        lookahead_frames = report.lookahead_frames,
        "compressed file"
    );

    Ok(report)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Compresses every `.wav` directly inside `input_dir` into `output_dir`,
/// one file per rayon task. Files that fail are logged and left out of the
/// returned reports.
pub fn compress_dir(
    input_dir: &Path,
    output_dir: &Path,
    settings: CompressorSettings,
    block_size: usize,
) -> Result<Vec<FileReport>> {
    fs::create_dir_all(output_dir)?;

    let wav_paths: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|p| p.is_file() && is_wav(p))
        .collect();

    if wav_paths.is_empty() {
        warn!(dir = %input_dir.display(), "no wav files found");
        return Ok(Vec::new());
    }

    let reports = wav_paths
        .par_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?;
            let output = output_dir.join(file_name);
            match compress_file(path, &output, settings, block_size) {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(path = %path.display(), "failed to compress: {}", e);
                    None
                }
            }
        })
        .collect();

    Ok(reports)
}
