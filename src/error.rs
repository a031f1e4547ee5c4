use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building rules or resolving virtual paths.
///
/// None of these are transient: they describe bad input or bad configuration,
/// so callers propagate them rather than retry.
#[derive(Error, Debug)]
pub enum VpathError {
    #[error("Duplicate rule '{0}' ignored!")]
    DuplicateRule(String),

    #[error("Rule '{name}' references undefined rule '{target}'")]
    BadRefRule { name: String, target: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Not a valid virtual path: '{0}'")]
    NotVirtualPath(String),

    #[error("Invalid action '{0}'!")]
    InvalidAction(String),

    #[error("Invalid wildcard pattern ({} bytes): {reason}", .pattern.len())]
    InvalidPattern { pattern: String, reason: String },

    #[error("Library line {line}: {reason}")]
    Library { line: usize, reason: String },

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VpathError {
    /// Whether a rule loader may skip this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VpathError::DuplicateRule(_) | VpathError::BadRefRule { .. } | VpathError::InvalidRule(_))
    }
}

pub type Result<T, E = VpathError> = std::result::Result<T, E>;
