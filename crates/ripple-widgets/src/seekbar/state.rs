//! Seekbar widget state
//!
//! Pure data consumed by the canvas program. Following iced 0.14 patterns,
//! this lives at the application level; the host updates it from player
//! position ticks and session transitions, and view functions take a
//! reference.

use std::sync::Arc;
use std::time::Instant;

use ripple_core::WaveformProfile;

use super::loading::PLACEHOLDER_CLOCK_RATE;

/// State for the waveform seekbar widget
#[derive(Debug, Clone)]
pub struct SeekbarState {
    /// Profile for the current track (None while loading or failed)
    pub profile: Option<Arc<WaveformProfile>>,
    /// Playback position in milliseconds
    pub position_ms: u64,
    /// Track duration in milliseconds
    pub duration_ms: u64,
    /// Analysis fetch in flight (show the animated placeholder)
    pub loading: bool,
    /// Seekhead marker offset within the drawable region
    pub seekhead_x: f32,
    /// Seekhead marker and time label visible (pointer over the widget)
    pub seekhead_visible: bool,
    /// Reference point for the placeholder animation clock
    animation_epoch: Instant,
}

impl SeekbarState {
    pub fn new() -> Self {
        Self {
            profile: None,
            position_ms: 0,
            duration_ms: 0,
            loading: false,
            seekhead_x: 0.0,
            seekhead_visible: false,
            animation_epoch: Instant::now(),
        }
    }

    /// Enter the loading presentation for a new track
    ///
    /// Discards the previous profile and hides the seekhead; the marker
    /// position is stale for the new track until the pointer moves again.
    pub fn begin_loading(&mut self) {
        self.profile = None;
        self.loading = true;
        self.seekhead_visible = false;
        self.position_ms = 0;
    }

    /// Install the finished profile and leave the loading presentation
    pub fn set_profile(&mut self, profile: Arc<WaveformProfile>) {
        self.profile = Some(profile);
        self.loading = false;
    }

    /// Drop all track data (session went Idle or Failed)
    pub fn clear(&mut self) {
        self.profile = None;
        self.loading = false;
        self.seekhead_visible = false;
    }

    /// Update playback position from the player's position feed
    pub fn set_position(&mut self, position_ms: u64, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.position_ms = position_ms.min(duration_ms);
    }

    /// Update the seekhead from a pointer hover change
    ///
    /// `Some(offset)` shows the marker at that drawable-region offset;
    /// `None` hides it without moving it, so re-entering the widget shows
    /// the marker where it last was until the pointer moves.
    pub fn set_seekhead(&mut self, offset: Option<f32>) {
        match offset {
            Some(x) => {
                self.seekhead_x = x;
                self.seekhead_visible = true;
            }
            None => self.seekhead_visible = false,
        }
    }

    /// Placeholder animation clock, in radians
    pub fn animation_clock(&self) -> f32 {
        self.animation_epoch.elapsed().as_secs_f32() * PLACEHOLDER_CLOCK_RATE
    }
}

impl Default for SeekbarState {
    fn default() -> Self {
        Self::new()
    }
}
