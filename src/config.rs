//! Tunable constants for decoding and calibration.

use serde::{Deserialize, Serialize};

use crate::error::MogError;

/// Propagation velocity of a radar wave in air (m/ns).
pub const AIR_VELOCITY_M_PER_NS: f64 = 0.2998;

/// Maximum number of characters of an OS error kept in a file-not-found diagnostic.
pub const DIAGNOSTIC_LIMIT: usize = 42;

/// Largest `SAMPLES:` value a header may declare.
pub const MAX_SAMPLES_PER_TRACE: usize = 65_536;

/// Largest `LAST TRACE` value a header may declare.
pub const MAX_TRACE_COUNT: usize = 1_000_000;

/// Core settings supplied by the host application.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Velocity used to convert the known air-shot separation into a travel time.
    pub air_velocity: f64,
    /// Truncation length for file-not-found diagnostics.
    pub diagnostic_limit: usize,
    /// Headers declaring more samples per trace are rejected before any
    /// buffer is sized from them.
    pub max_samples_per_trace: usize,
    pub max_trace_count: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            air_velocity: AIR_VELOCITY_M_PER_NS,
            diagnostic_limit: DIAGNOSTIC_LIMIT,
            max_samples_per_trace: MAX_SAMPLES_PER_TRACE,
            max_trace_count: MAX_TRACE_COUNT,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MogError> {
        let config: CoreConfig = serde_json::from_str(json)
            .map_err(|e| MogError::Configuration(format!("invalid core config: {e}")))?;
        if !(config.air_velocity.is_finite() && config.air_velocity > 0.0) {
            return Err(MogError::Configuration(format!(
                "air velocity must be positive, got {}",
                config.air_velocity
            )));
        }
        Ok(config)
    }
}
