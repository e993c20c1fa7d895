use serde::{Deserialize, Serialize};

use crate::output::Sweep;

/// Decoder options recognised by the sweep assembler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Returns closer than this (meters) are dropped.
    pub min_range: f64,
    /// Returns farther than this (meters) are dropped.
    pub max_range: f64,
    /// Nominal rotation rate in Hz. Accepted and validated, not used in decoding yet.
    pub frequency: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_range: 0.5,
            max_range: 100.0,
            frequency: 20.0,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> DecodeResult<()> {
        if !self.min_range.is_finite() || !self.max_range.is_finite() || !self.frequency.is_finite()
        {
            return Err(DecodeError::InvalidConfig(
                "range and frequency must be finite".into(),
            ));
        }
        if self.min_range < 0.0 {
            return Err(DecodeError::InvalidConfig(format!(
                "min_range {} is negative",
                self.min_range
            )));
        }
        if self.max_range <= self.min_range {
            return Err(DecodeError::InvalidConfig(format!(
                "max_range {} must exceed min_range {}",
                self.max_range, self.min_range
            )));
        }
        if self.frequency <= 0.0 {
            return Err(DecodeError::InvalidConfig(format!(
                "frequency {} must be positive",
                self.frequency
            )));
        }
        Ok(())
    }
}

/// Wire-level failures reported by the packet parser.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("packet length mismatch: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("block {block} header is {header:#06x}")]
    InvalidHeader { block: usize, header: u16 },
}

/// Common error type for decoder construction and packet decoding.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error(transparent)]
    Packet(#[from] PacketError),
    #[error("invalid decoder config: {0}")]
    InvalidConfig(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Receives each completed sweep. Ownership passes to the sink.
pub trait SweepSink {
    fn consume(&mut self, sweep: Sweep);
}

impl SweepSink for Vec<Sweep> {
    fn consume(&mut self, sweep: Sweep) {
        self.push(sweep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DecoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_range, 0.5);
        assert_eq!(config.max_range, 100.0);
    }

    #[test]
    fn frequency_does_not_alias_max_range() {
        let config: DecoderConfig = serde_json::from_str(r#"{"frequency": 10.0}"#).unwrap();
        assert_eq!(config.frequency, 10.0);
        assert_eq!(config.max_range, 100.0);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = DecoderConfig {
            min_range: 5.0,
            max_range: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DecodeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let config = DecoderConfig {
            frequency: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
