use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompressorError>;

#[derive(Error, Debug)]
pub enum CompressorError {
    /// Rejected by the strict (validated) construction mode
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("could not parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format in {path}: {bits} bit {format:?}")]
    UnsupportedFormat {
        path: PathBuf,
        bits: u16,
        format: hound::SampleFormat,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
