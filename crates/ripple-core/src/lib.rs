//! Core model and control flow for the ripple waveform seekbar
//!
//! This crate turns a host player's precomputed loudness analysis into a
//! renderable intensity profile and manages the per-track lifecycle around
//! it. It is GUI-free; rendering lives in `ripple-widgets`.
//!
//! ## Architecture
//!
//! - [`analysis`]: input model for the host's loudness-segment feed
//! - [`profile`]: fixed-resolution profile computation (pure)
//! - [`fetch`]: retrying fetch protocol and the background loader thread
//! - [`session`]: per-track state machine with stale-result discarding
//! - [`config`]: compiled-in tunables with optional YAML override
//!
//! ## Wiring
//!
//! The host implements [`AnalysisSource`], [`PlayerHandle`] and
//! [`SeekbarMount`], then drives the session from its update loop:
//!
//! ```ignore
//! let loader = AnalysisLoader::spawn(source, config.retry_policy(), config.contrast_factor)?;
//! let mut session = TrackSession::new(mount);
//!
//! // On a track-changed notification:
//! if let Some(ticket) = session.handle_track_change(player.current_track_id()) {
//!     loader.request(ticket)?;
//! }
//!
//! // When a fetch outcome arrives (e.g. via a channel subscription):
//! match session.apply_fetch_outcome(outcome) {
//!     SessionUpdate::Ready => { /* hand session.profile() to the widget */ }
//!     SessionUpdate::FellBack => { /* host default seekbar is back */ }
//!     SessionUpdate::Stale => {}
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod profile;
pub mod session;

pub use analysis::{AnalysisSegment, TrackAnalysis, TrackId};
pub use config::{default_config_path, load_config, SeekbarConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use fetch::{fetch_with_retry, AnalysisLoader, AnalysisSource, FetchOutcome, RetryPolicy};
pub use profile::{process, WaveformProfile, PROFILE_RESOLUTION};
pub use session::{
    FetchTicket, PlayerEvent, PlayerHandle, SeekbarMount, SessionState, SessionUpdate,
    TrackSession,
};
