//! Seekbar widgets for the ripple waveform visualization
//!
//! This crate provides the iced rendering side of the waveform seekbar:
//! the canvas widget, its theme palette, and subscription helpers for
//! bridging the core's channel-delivered events into an iced application.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! Following idiomatic iced patterns:
//!
//! - **State structs**: pure data (`SeekbarState`)
//! - **View functions**: take state + callbacks, return `Element<Message>`
//!   (`waveform_seekbar`, `fallback_seekbar`)
//! - **Canvas Programs**: custom rendering and event-to-callback
//!   translation (`SeekbarCanvas`)
//!
//! The model and control flow (profile computation, the retrying analysis
//! fetch, and the per-track session state machine) live in `ripple-core`.

pub mod seekbar;
pub mod subscription;
pub mod theme;

// Re-export commonly used items
pub use seekbar::{
    fallback_seekbar, waveform_seekbar, SeekbarCanvas, SeekbarInteraction, SeekbarState,
    SEEKBAR_HEIGHT, TIME_LABEL_GUTTER,
};
pub use subscription::{channel_subscription, channel_subscription_owned};
pub use theme::{init_theme, palette, SeekbarPalette, ThemeConfig};
