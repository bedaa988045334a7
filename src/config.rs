//! Rhythm tuning parameters
//!
//! All timing knobs are supplied at construction and immutable for the
//! session. Changing tempo means building a new session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid construction parameter. Fatal; never produced after startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bpm must be positive and finite, got {0}")]
    InvalidBpm(f64),
    #[error("tolerance must be non-negative, got {0} ms")]
    NegativeTolerance(f64),
    #[error("charge length must be positive, got {0} beats")]
    InvalidChargeBeats(f64),
}

/// Session-wide rhythm configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RhythmConfig {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Hit window around beat / half-beat instants (ms)
    pub tolerance_ms: f64,
    /// Target hold length for a heavy (charge) action, in beats
    pub charge_beats: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            charge_beats: DEFAULT_CHARGE_BEATS,
        }
    }
}

impl RhythmConfig {
    /// Create a config with the given tempo and default windows
    pub fn with_bpm(bpm: f64) -> Self {
        Self {
            bpm,
            ..Self::default()
        }
    }

    /// Validate all parameters; called by session construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(ConfigError::InvalidBpm(self.bpm));
        }
        if !self.tolerance_ms.is_finite() || self.tolerance_ms < 0.0 {
            return Err(ConfigError::NegativeTolerance(self.tolerance_ms));
        }
        if !self.charge_beats.is_finite() || self.charge_beats <= 0.0 {
            return Err(ConfigError::InvalidChargeBeats(self.charge_beats));
        }
        Ok(())
    }
}
