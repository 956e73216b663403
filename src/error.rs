//! Configuration errors
//!
//! The simulation itself has no failure paths: out-of-state input is ignored
//! and game over is a normal outcome. Errors only arise when loading or
//! validating a [`crate::Tuning`].

use std::fmt;

/// Error produced while loading or validating tuning data
#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read
    Io {
        /// Path that was being read
        path: String,
        source: std::io::Error,
    },

    /// The tuning document is not valid JSON for [`crate::Tuning`]
    Parse(serde_json::Error),

    /// A value parsed fine but is outside the range the simulation can handle
    Invalid {
        /// Dotted field name, e.g. `pipes.gap`
        field: &'static str,
        /// Human-readable description of the constraint
        reason: String,
    },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TuningError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io { path, source } => {
                write!(f, "failed to read tuning file '{}': {}", path, source)
            }
            TuningError::Parse(err) => write!(f, "failed to parse tuning JSON: {}", err),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io { source, .. } => Some(source),
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}
