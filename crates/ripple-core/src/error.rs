//! Analysis error types

use thiserror::Error;

/// Errors that can occur while retrieving or processing track analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed or missing analysis payload (non-retryable as such, but
    /// consumes a fetch attempt like any other failure)
    #[error("Invalid analysis payload: {0}")]
    InvalidAnalysis(String),

    /// Network or HTTP failure reported by the analysis source
    #[error("Analysis transport failure: {0}")]
    Transport(String),

    /// Retry budget exhausted: terminal for the track, triggers fallback
    /// to the host's default progress indicator
    #[error("Analysis unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },
}

impl AnalysisError {
    /// Whether this error ends the track's session (no further retries)
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisError::Unavailable { .. })
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
