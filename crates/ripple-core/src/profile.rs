//! Loudness profile computation
//!
//! Converts a track's variable-length, variable-resolution loudness segments
//! into the fixed-resolution intensity profile the seekbar renders from.
//! This is the pixel-independent analog of downsampling raw audio to
//! per-column waveform peaks: the track is partitioned into a fixed number
//! of equal time buckets and each bucket keeps the strongest shaped
//! intensity of any segment covering it.

use crate::analysis::TrackAnalysis;
use crate::error::AnalysisResult;

/// Number of time buckets in every profile, regardless of track length
pub const PROFILE_RESOLUTION: usize = 1000;

/// Loudness floor for normalization: segments at or below this are silent
const LOUDNESS_FLOOR_DB: f64 = -40.0;

/// Fixed-resolution intensity profile for one track
///
/// Always exactly [`PROFILE_RESOLUTION`] values in `0.0..=1.0`. Immutable
/// after creation; a track change replaces the whole profile rather than
/// mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformProfile {
    values: Vec<f32>,
}

impl WaveformProfile {
    /// Intensity values, one per time bucket
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of buckets (always [`PROFILE_RESOLUTION`])
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Map a segment loudness in dB to a normalized intensity in 0..=1
///
/// Clamps to the -40..0 dB window, then maps linearly so -40 dB -> 0.0 and
/// 0 dB -> 1.0 (quieter is lower).
pub(crate) fn normalized_loudness(loudness_db: f64) -> f64 {
    1.0 - loudness_db.clamp(LOUDNESS_FLOOR_DB, 0.0) / LOUDNESS_FLOOR_DB
}

/// Compute the intensity profile for a track
///
/// `contrast` is the exponent applied to each normalized loudness; values
/// above 1.0 compress the mid-range and visually emphasize peaks. Pure and
/// deterministic: the same analysis always yields a bit-identical profile.
pub fn process(analysis: &TrackAnalysis, contrast: f64) -> AnalysisResult<WaveformProfile> {
    analysis.validate()?;

    let bucket_width = analysis.duration / PROFILE_RESOLUTION as f64;
    let mut buckets = vec![0.0f32; PROFILE_RESOLUTION];

    for segment in &analysis.segments {
        let first = (segment.start / bucket_width) as usize;
        let last =
            (((segment.start + segment.duration) / bucket_width) as usize).min(PROFILE_RESOLUTION - 1);

        let shaped = normalized_loudness(segment.loudness_max).powf(contrast) as f32;

        // Merge with max: buckets covered by several segments keep the
        // loudest one, so a quiet segment never masks a loud neighbour.
        // A segment starting past the reported duration yields first > last
        // and covers nothing.
        for value in buckets.iter_mut().take(last + 1).skip(first) {
            *value = value.max(shaped);
        }
    }

    log::debug!(
        "processed {} segments over {:.1}s into {} buckets",
        analysis.segments.len(),
        analysis.duration,
        PROFILE_RESOLUTION
    );

    Ok(WaveformProfile { values: buckets })
}
