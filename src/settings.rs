use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompressorError, Result};

/// Upper bound on `lookahead_ms` accepted by [`CompressorSettings::validate`].
pub const MAX_LOOKAHEAD_MS: f32 = 1000.0;

/// Compressor parameters as they appear in a config file.
///
/// ```toml
/// [compressor]
/// threshold = 0.5
/// ratio = 4.0
/// release = 0.2
/// lookahead_ms = 5.0
/// ```
///
/// Missing fields fall back to the construction defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorSettings {
    pub threshold: f32,
    pub ratio: f32,
    pub attack: f32,
    /// Per-sample smoothing coefficient, not a time.
    pub release: f32,
    pub lookahead_ms: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            ratio: 1.0,
            attack: 0.05,
            release: 0.2,
            lookahead_ms: 0.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    compressor: CompressorSettings,
}

impl CompressorSettings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(s)?;
        Ok(file.compressor)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks the ranges the arithmetic behaves sensibly in.
    ///
    /// Unvalidated settings are still accepted everywhere else.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("threshold", self.threshold),
            ("ratio", self.ratio),
            ("attack", self.attack),
            ("release", self.release),
            ("lookahead_ms", self.lookahead_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
        }

        if self.threshold < 0.0 {
            return Err(invalid("threshold", self.threshold, "must not be negative"));
        }
        if self.ratio < 1.0 {
            return Err(invalid("ratio", self.ratio, "must be at least 1.0"));
        }
        if !(0.0..=1.0).contains(&self.release) {
            return Err(invalid("release", self.release, "must be within 0.0..=1.0"));
        }
        if self.attack < 0.0 {
            return Err(invalid("attack", self.attack, "must not be negative"));
        }
        if self.lookahead_ms < 0.0 {
            return Err(invalid("lookahead_ms", self.lookahead_ms, "must not be negative"));
        }
        if self.lookahead_ms > MAX_LOOKAHEAD_MS {
            return Err(invalid("lookahead_ms", self.lookahead_ms, "must be at most 1000 ms"));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, value: f32, reason: &'static str) -> CompressorError {
    CompressorError::InvalidParameter {
        name,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_construction_defaults() {
        let settings = CompressorSettings::default();
        assert_eq!(settings.threshold, 0.0);
        assert_eq!(settings.ratio, 1.0);
        assert_eq!(settings.attack, 0.05);
        assert_eq!(settings.release, 0.2);
        assert_eq!(settings.lookahead_ms, 0.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_table() {
        let settings = CompressorSettings::from_toml_str(
            "[compressor]\nthreshold = 0.5\nratio = 4.0\nlookahead_ms = 2.0\n",
        )
        .unwrap();
        assert_eq!(settings.threshold, 0.5);
        assert_eq!(settings.ratio, 4.0);
        assert_eq!(settings.lookahead_ms, 2.0);
        assert_eq!(settings.release, 0.2);
    }

    #[test]
    fn test_parse_empty_file() {
        let settings = CompressorSettings::from_toml_str("").unwrap();
        assert_eq!(settings, CompressorSettings::default());
    }

    #[test]
    fn test_parse_error() {
        let err = CompressorSettings::from_toml_str("[compressor]\nratio = \"hard\"\n").unwrap_err();
        assert!(matches!(err, CompressorError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            CompressorSettings { ratio: 0.0, ..Default::default() },
            CompressorSettings { ratio: 0.5, ..Default::default() },
            CompressorSettings { release: 1.5, ..Default::default() },
            CompressorSettings { release: -0.1, ..Default::default() },
            CompressorSettings { attack: -1.0, ..Default::default() },
            CompressorSettings { lookahead_ms: -2.0, ..Default::default() },
            CompressorSettings { lookahead_ms: 1.0e30, ..Default::default() },
            CompressorSettings { lookahead_ms: f32::INFINITY, ..Default::default() },
            CompressorSettings { threshold: f32::NAN, ..Default::default() },
            CompressorSettings { threshold: -0.5, ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(CompressorError::InvalidParameter { .. })),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_reports_field() {
        let settings = CompressorSettings { ratio: 0.0, ..Default::default() };
        match settings.validate() {
            Err(CompressorError::InvalidParameter { name, .. }) => assert_eq!(name, "ratio"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_threshold_is_valid() {
        // envelope starts at 0.0, so only a negative threshold can divide by zero
        let settings = CompressorSettings { threshold: 0.0, ratio: 2.0, ..Default::default() };
        assert!(settings.validate().is_ok());
    }
}
