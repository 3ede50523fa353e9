//! Track analysis input model
//!
//! These types mirror the loudness-segment analysis delivered by the host's
//! analysis feed. They are supplied wholesale per track and discarded on the
//! next track change; nothing here is persisted.

use std::fmt;

use serde::Deserialize;

use crate::error::{AnalysisError, AnalysisResult};

/// Opaque track identifier as reported by the host player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One contiguous span of audio with a characteristic peak loudness
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisSegment {
    /// Segment start offset in seconds from track start
    pub start: f64,
    /// Segment length in seconds
    pub duration: f64,
    /// Peak loudness of the segment in dB (typically -60..0)
    pub loudness_max: f64,
}

/// Complete loudness analysis for one track
///
/// Segments are ordered but may overlap or abut; resolution varies with the
/// source material. `duration` is the full track length in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackAnalysis {
    pub segments: Vec<AnalysisSegment>,
    pub duration: f64,
}

impl TrackAnalysis {
    /// Check that the payload is usable for profile computation
    ///
    /// A payload with no segments or a non-positive duration cannot produce
    /// a meaningful profile and is rejected up front.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.segments.is_empty() {
            return Err(AnalysisError::InvalidAnalysis(
                "no loudness segments".to_string(),
            ));
        }
        if !(self.duration > 0.0) {
            return Err(AnalysisError::InvalidAnalysis(format!(
                "non-positive track duration: {}",
                self.duration
            )));
        }
        Ok(())
    }
}
