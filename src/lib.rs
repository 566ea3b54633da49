//! Per-sample dynamic range compressor with optional lookahead.
//!
//! ```
//! use lookahead_compressor::Compressor;
//!
//! let mut comp = Compressor::new();
//! comp.set_threshold(0.5);
//! comp.set_ratio(4.0);
//! comp.set_release(0.2);
//!
//! let mut buffer = vec![0.1, 0.2, 0.8, 0.4];
//! comp.process(&mut buffer, 44100.0);
//! assert!(buffer[2] < 0.8);
//! ```

pub mod compressor;
pub mod envelope;
pub mod error;
pub mod ffi;
pub mod gain;
pub mod lookahead;
pub mod settings;
pub mod trace;
pub mod wav;

pub use compressor::Compressor;
pub use envelope::{EnvelopeFollower, Phase};
pub use error::{CompressorError, Result};
pub use ffi::{compress_once, compress_once_with_lookahead};
pub use gain::compute_gain;
pub use lookahead::{lookahead_frames, LookaheadAligner, MAX_LOOKAHEAD_FRAMES};
pub use settings::CompressorSettings;
pub use trace::{DebugTrace, TraceEntry, TraceState};
