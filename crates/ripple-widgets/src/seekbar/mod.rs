//! Waveform seekbar widget
//!
//! A clickable waveform visualization that stands in for a linear progress
//! bar. The host feeds it a fixed-resolution loudness profile (computed by
//! `ripple-core`) plus playback position ticks; the widget renders the
//! profile as a bar field with a progress-colored sweep, an animated
//! placeholder while analysis loads, and a hover seekhead with a projected
//! time label.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State struct** ([`SeekbarState`]): pure data owned by the
//!   application
//! - **View functions** ([`waveform_seekbar`], [`fallback_seekbar`]): take
//!   state + callbacks, return `Element<Message>`
//! - **Canvas Program** ([`SeekbarCanvas`]): custom rendering and
//!   event-to-callback translation

mod canvas;
mod geometry;
mod loading;
mod state;
mod view;

pub use canvas::{SeekbarCanvas, SeekbarInteraction};
pub use geometry::{
    bar_rect, drawable_width, format_time, is_bar_active, offset_in_region, progress_x,
    time_at_offset, BarRect,
    // Constants
    BAR_GAP, BAR_HEIGHT_SCALE, SEEKBAR_HEIGHT, TIME_LABEL_GUTTER,
};
pub use loading::{placeholder_level, PLACEHOLDER_BAR_COUNT, PLACEHOLDER_CLOCK_RATE};
pub use state::SeekbarState;
pub use view::{fallback_seekbar, waveform_seekbar};
