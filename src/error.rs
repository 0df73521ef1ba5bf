//! Error types for loading game configuration
//!
//! The simulation itself never fails: degenerate geometry is skipped and pool
//! growth is not an error. Only reading tuning data from outside can go wrong.

use std::fmt;

/// Failure to load or validate a [`crate::Tuning`]
#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read
    Io(std::io::Error),
    /// The tuning JSON was malformed
    Parse(serde_json::Error),
    /// A value parsed fine but makes no sense for the game
    OutOfRange {
        /// Field name (for logging)
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable description of the accepted range
        expected: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {}", e),
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {}", e),
            TuningError::OutOfRange {
                name,
                value,
                expected,
            } => write!(f, "tuning value '{}' = {} is outside {}", name, value, expected),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::OutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}
