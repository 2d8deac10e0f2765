//! Error types shared across Reelplan crates.

/// Top-level error type for Reelplan operations.
///
/// Media that is still generating (or missing) is never represented
/// here; the sequencer treats it as a layer that is not yet renderable.
#[derive(Debug, thiserror::Error)]
pub enum ReelplanError {
    #[error("Invalid composition: {} structural issue(s): {}", issues.len(), issues.join("; "))]
    Validation { issues: Vec<String> },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelplanError.
pub type ReelplanResult<T> = Result<T, ReelplanError>;

impl ReelplanError {
    pub fn validation<I, S>(issues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            issues: issues.into_iter().map(Into::into).collect(),
        }
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    /// Structural issues carried by a validation fault, if any.
    pub fn issues(&self) -> &[String] {
        match self {
            Self::Validation { issues } => issues,
            _ => &[],
        }
    }
}
