//! Simulation error handling
//!
//! Errors only arise from invalid setup: bad pipe geometry, out-of-range
//! configuration values, or a config file that cannot be read. The stepping
//! functions never return errors; numeric hazards are guarded in place.

/// Result type for simulation setup operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while building or configuring a simulation
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid pipe geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Create an invalid geometry error
pub fn invalid_geometry(reason: impl Into<String>) -> SimError {
    SimError::InvalidGeometry {
        reason: reason.into(),
    }
}

/// Create an invalid config error
pub fn invalid_config(field: impl Into<String>, reason: impl std::fmt::Display) -> SimError {
    SimError::InvalidConfig {
        field: field.into(),
        reason: reason.to_string(),
    }
}

/// Check an index against a collection length
pub fn check_index(index: usize, len: usize) -> SimResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(SimError::IndexOutOfRange { index, len })
    }
}

/// Require a strictly positive finite value
pub fn require_positive(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid_config(field, format!("must be positive and finite, got {}", value)))
    }
}
