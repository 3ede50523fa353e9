//! Per-track session control
//!
//! One [`TrackSession`] owns the seekbar's state for the currently playing
//! track: which track is active, whether its profile is ready, and whether
//! the custom widget is mounted in place of the host's default seekbar.
//! Track changes re-enter the machine; results from superseded fetches are
//! recognized by generation and discarded, so a slow retry loop for a stale
//! track can never overwrite the state of the new one.
//!
//! The session talks to the host through two narrow traits: [`PlayerHandle`]
//! for position/identity/seek, and [`SeekbarMount`] for swapping the custom
//! widget in and out. It never touches host structure beyond those calls.

use std::sync::Arc;

use crate::analysis::TrackId;
use crate::error::AnalysisError;
use crate::fetch::FetchOutcome;
use crate::profile::WaveformProfile;

/// Host player surface: identity, position, and seeking
///
/// Position is read on every render tick rather than cached here; the
/// session stores nothing it can re-ask the player for.
pub trait PlayerHandle {
    /// Identifier of the currently playing track, if any
    fn current_track_id(&self) -> Option<TrackId>;
    /// Playback position in milliseconds
    fn progress_ms(&self) -> u64;
    /// Track duration in milliseconds
    fn duration_ms(&self) -> u64;
    /// Request a seek to the given position
    fn seek_to(&self, position_ms: u64);
}

/// Host widget swap target
///
/// `mount` inserts the custom seekbar in place of the host's default
/// widget; `unmount` reverses the swap. The session guarantees strict
/// mount/unmount pairing, so implementations need not tolerate repeated
/// calls.
pub trait SeekbarMount {
    fn mount(&mut self);
    fn unmount(&mut self);
}

/// Notifications delivered by the host player's subscription mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The playing track changed (or playback stopped)
    TrackChanged(Option<TrackId>),
    /// Playback position advanced; redraw the progress sweep
    PositionTick,
}

/// Session lifecycle for the active track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No track tracked yet
    Idle,
    /// Analysis fetch in flight; loading placeholder is animating
    Loading,
    /// Profile available; progress-synced rendering active
    Ready,
    /// Retry budget exhausted; host default widget restored
    Failed,
}

/// Ticket identifying one fetch request
///
/// The generation is bumped on every accepted track change, which is what
/// invalidates in-flight work: an outcome whose ticket no longer matches
/// the session generation is stale by definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub track: TrackId,
    pub generation: u64,
}

/// What applying a fetch outcome did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Profile stored; session is Ready
    Ready,
    /// Terminal failure; custom widget unmounted, session is Failed
    FellBack,
    /// Outcome belonged to a superseded track and was discarded
    Stale,
}

/// State machine driving the seekbar through track changes
pub struct TrackSession<M: SeekbarMount> {
    mount: M,
    state: SessionState,
    current: Option<TrackId>,
    profile: Option<Arc<WaveformProfile>>,
    generation: u64,
    mounted: bool,
}

impl<M: SeekbarMount> TrackSession<M> {
    pub fn new(mount: M) -> Self {
        Self {
            mount,
            state: SessionState::Idle,
            current: None,
            profile: None,
            generation: 0,
            mounted: false,
        }
    }

    /// Start a session for the track already playing at construction time
    ///
    /// Equivalent to a track-changed notification carrying the player's
    /// current track; a paused host with no track is a no-op.
    pub fn bootstrap(&mut self, player: &impl PlayerHandle) -> Option<FetchTicket> {
        self.handle_track_change(player.current_track_id())
    }

    /// React to a track-changed notification
    ///
    /// Guarded: `None` and the already-tracked id are no-ops. An accepted
    /// change discards the previous profile, bumps the generation (which
    /// retires any in-flight fetch and loading loop for the old track),
    /// mounts the custom widget if the host default is currently showing,
    /// and returns the ticket to hand to the analysis loader.
    pub fn handle_track_change(&mut self, new_track: Option<TrackId>) -> Option<FetchTicket> {
        let new_track = new_track?;
        if self.current.as_ref() == Some(&new_track) {
            return None;
        }

        self.current = Some(new_track.clone());
        self.profile = None;
        self.generation += 1;
        self.state = SessionState::Loading;

        if !self.mounted {
            self.mount.mount();
            self.mounted = true;
        }

        log::info!(
            "[SESSION] loading analysis for {} (generation {})",
            new_track,
            self.generation
        );

        Some(FetchTicket {
            track: new_track,
            generation: self.generation,
        })
    }

    /// Apply a fetch outcome delivered by the loader
    ///
    /// Outcomes for superseded tickets are discarded without touching
    /// state, success and exhaustion alike. A current-generation success
    /// stores the profile and enters Ready; a current-generation terminal
    /// failure restores the host default widget and enters Failed.
    pub fn apply_fetch_outcome(&mut self, outcome: FetchOutcome) -> SessionUpdate {
        if outcome.ticket.generation != self.generation
            || self.current.as_ref() != Some(&outcome.ticket.track)
        {
            log::debug!(
                "[SESSION] discarding stale outcome for {} (generation {}, now {})",
                outcome.ticket.track,
                outcome.ticket.generation,
                self.generation
            );
            return SessionUpdate::Stale;
        }

        match outcome.result {
            Ok(profile) => {
                log::info!("[SESSION] profile ready for {}", outcome.ticket.track);
                self.profile = Some(Arc::new(profile));
                self.state = SessionState::Ready;
                SessionUpdate::Ready
            }
            Err(err) => {
                log::error!(
                    "[SESSION] falling back to default seekbar for {}: {}",
                    outcome.ticket.track,
                    err
                );
                self.state = SessionState::Failed;
                if self.mounted {
                    self.mount.unmount();
                    self.mounted = false;
                }
                SessionUpdate::FellBack
            }
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Profile for the active track, once Ready
    pub fn profile(&self) -> Option<&Arc<WaveformProfile>> {
        self.profile.as_ref()
    }

    /// Identifier of the tracked track
    pub fn current_track(&self) -> Option<&TrackId> {
        self.current.as_ref()
    }

    /// Whether the loading placeholder should be animating
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Whether the custom widget currently replaces the host default
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisSegment, TrackAnalysis};
    use crate::profile::process;

    /// Mount that records its call sequence
    #[derive(Default)]
    struct RecordingMount {
        calls: Vec<&'static str>,
    }

    impl SeekbarMount for RecordingMount {
        fn mount(&mut self) {
            self.calls.push("mount");
        }
        fn unmount(&mut self) {
            self.calls.push("unmount");
        }
    }

    fn ready_profile() -> WaveformProfile {
        let analysis = TrackAnalysis {
            segments: vec![AnalysisSegment {
                start: 0.0,
                duration: 60.0,
                loudness_max: -10.0,
            }],
            duration: 60.0,
        };
        process(&analysis, 4.0).unwrap()
    }

    fn success(ticket: FetchTicket) -> FetchOutcome {
        FetchOutcome {
            ticket,
            result: Ok(ready_profile()),
        }
    }

    fn exhaustion(ticket: FetchTicket) -> FetchOutcome {
        FetchOutcome {
            ticket,
            result: Err(AnalysisError::Unavailable { attempts: 3 }),
        }
    }

    #[test]
    fn test_track_change_enters_loading_and_mounts() {
        let mut session = TrackSession::new(RecordingMount::default());
        assert_eq!(session.state(), SessionState::Idle);

        let ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .expect("first track should start a fetch");

        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.is_mounted());
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.track, TrackId::new("track:a"));
    }

    #[test]
    fn test_same_or_missing_track_is_a_no_op() {
        let mut session = TrackSession::new(RecordingMount::default());
        session.handle_track_change(Some(TrackId::new("track:a")));

        assert!(session.handle_track_change(None).is_none());
        assert!(session
            .handle_track_change(Some(TrackId::new("track:a")))
            .is_none());
        assert_eq!(session.state(), SessionState::Loading);
    }

    #[test]
    fn test_successful_fetch_enters_ready_with_profile() {
        let mut session = TrackSession::new(RecordingMount::default());
        let ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();

        let update = session.apply_fetch_outcome(success(ticket));

        assert_eq!(update, SessionUpdate::Ready);
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.profile().is_some());
        assert!(session.is_mounted());
    }

    #[test]
    fn test_exhaustion_unmounts_and_fails() {
        let mut session = TrackSession::new(RecordingMount::default());
        let ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();

        let update = session.apply_fetch_outcome(exhaustion(ticket));

        assert_eq!(update, SessionUpdate::FellBack);
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.profile().is_none());
        assert!(!session.is_mounted());
        assert_eq!(session.mount.calls, vec!["mount", "unmount"]);
    }

    #[test]
    fn test_stale_success_does_not_touch_new_session() {
        let mut session = TrackSession::new(RecordingMount::default());
        let old_ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();
        let new_ticket = session
            .handle_track_change(Some(TrackId::new("track:b")))
            .unwrap();

        // The old track's fetch resolves after the change
        let update = session.apply_fetch_outcome(success(old_ticket));

        assert_eq!(update, SessionUpdate::Stale);
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.profile().is_none());
        assert_eq!(session.current_track(), Some(&TrackId::new("track:b")));

        // The new track's fetch still lands normally
        assert_eq!(
            session.apply_fetch_outcome(success(new_ticket)),
            SessionUpdate::Ready
        );
    }

    #[test]
    fn test_stale_exhaustion_does_not_unmount() {
        let mut session = TrackSession::new(RecordingMount::default());
        let old_ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();
        session.handle_track_change(Some(TrackId::new("track:b")));

        assert_eq!(
            session.apply_fetch_outcome(exhaustion(old_ticket)),
            SessionUpdate::Stale
        );
        assert!(session.is_mounted());
        assert_eq!(session.state(), SessionState::Loading);
    }

    #[test]
    fn test_failed_session_remounts_on_next_track() {
        let mut session = TrackSession::new(RecordingMount::default());
        let ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();
        session.apply_fetch_outcome(exhaustion(ticket));

        let ticket = session
            .handle_track_change(Some(TrackId::new("track:b")))
            .expect("failed session should accept a new track");

        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.is_mounted());
        assert_eq!(ticket.generation, 2);
        assert_eq!(session.mount.calls, vec!["mount", "unmount", "mount"]);
    }

    #[test]
    fn test_ready_session_discards_profile_on_track_change() {
        let mut session = TrackSession::new(RecordingMount::default());
        let ticket = session
            .handle_track_change(Some(TrackId::new("track:a")))
            .unwrap();
        session.apply_fetch_outcome(success(ticket));
        assert!(session.profile().is_some());

        session.handle_track_change(Some(TrackId::new("track:b")));

        assert!(session.profile().is_none());
        assert_eq!(session.state(), SessionState::Loading);
    }

    #[test]
    fn test_bootstrap_uses_player_current_track() {
        struct StubPlayer(Option<TrackId>);
        impl PlayerHandle for StubPlayer {
            fn current_track_id(&self) -> Option<TrackId> {
                self.0.clone()
            }
            fn progress_ms(&self) -> u64 {
                0
            }
            fn duration_ms(&self) -> u64 {
                0
            }
            fn seek_to(&self, _position_ms: u64) {}
        }

        let mut session = TrackSession::new(RecordingMount::default());
        assert!(session.bootstrap(&StubPlayer(None)).is_none());
        assert_eq!(session.state(), SessionState::Idle);

        let ticket = session
            .bootstrap(&StubPlayer(Some(TrackId::new("track:boot"))))
            .expect("playing host should start a session");
        assert_eq!(ticket.track, TrackId::new("track:boot"));
        assert_eq!(session.state(), SessionState::Loading);
    }
}
