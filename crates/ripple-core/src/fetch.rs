//! Analysis retrieval with bounded retry
//!
//! The host's analysis feed is flaky in practice: analysis for a freshly
//! started track is often not ready on the first request. The fetcher wraps
//! the single external fetch call in a fixed-delay retry loop and hands
//! back a finished [`WaveformProfile`]. Each attempt fetches *and*
//! processes, so a malformed payload consumes an attempt exactly like a
//! transport failure (either way there is no usable profile).
//!
//! [`AnalysisLoader`] moves the retry loop off the UI thread: a dedicated
//! loader thread runs a single-threaded runtime, requests arrive over a
//! channel, and outcomes are reported back tagged with the ticket that
//! started them so the session can discard results that arrive after the
//! track has changed.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::analysis::{TrackAnalysis, TrackId};
use crate::error::{AnalysisError, AnalysisResult};
use crate::profile::{self, WaveformProfile};
use crate::session::FetchTicket;

/// External analysis data source
///
/// Implemented by the host against whatever transport it uses. A single
/// call maps to one network attempt; retrying is the fetcher's job.
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Fetch the raw loudness analysis for one track
    async fn fetch_analysis(&self, track: &TrackId) -> AnalysisResult<TrackAnalysis>;
}

/// Retry budget for analysis fetches
///
/// Fixed delay between attempts: no exponential backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// One fetch attempt: retrieve the payload and process it to a profile
async fn attempt<S: AnalysisSource + ?Sized>(
    source: &S,
    track: &TrackId,
    contrast: f64,
) -> AnalysisResult<WaveformProfile> {
    let analysis = source.fetch_analysis(track).await?;
    profile::process(&analysis, contrast)
}

/// Fetch and process a track's analysis, retrying on failure
///
/// Returns the finished profile on the first successful attempt. Failed
/// attempts are logged and retried after `policy.delay` until the budget is
/// spent, then [`AnalysisError::Unavailable`] is returned, the terminal
/// signal that sends the session back to the host's default seekbar.
///
/// Suspends cooperatively between attempts; it is never hard-aborted. A
/// caller that no longer wants the result simply discards it (see the
/// generation check in [`crate::session::TrackSession`]).
pub async fn fetch_with_retry<S: AnalysisSource + ?Sized>(
    source: &S,
    track: &TrackId,
    policy: RetryPolicy,
    contrast: f64,
) -> AnalysisResult<WaveformProfile> {
    let mut attempts = 0u32;

    loop {
        match attempt(source, track, contrast).await {
            Ok(profile) => {
                log::debug!(
                    "analysis for {} ready after {} failed attempt(s)",
                    track,
                    attempts
                );
                return Ok(profile);
            }
            Err(err) => {
                attempts += 1;
                log::warn!(
                    "analysis fetch for {} failed (attempt {}/{}): {}",
                    track,
                    attempts,
                    policy.max_attempts,
                    err
                );
                if attempts >= policy.max_attempts {
                    log::error!("analysis for {} unavailable, giving up", track);
                    return Err(AnalysisError::Unavailable { attempts });
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

/// Outcome of a background fetch, tagged with the ticket that started it
#[derive(Debug)]
pub struct FetchOutcome {
    /// Ticket issued by the session when the fetch was requested
    pub ticket: FetchTicket,
    /// Finished profile, or the terminal error for this track
    pub result: AnalysisResult<WaveformProfile>,
}

/// Handle to the background analysis loader thread
///
/// Requests are non-blocking; outcomes arrive on a channel suitable for
/// bridging into the host's update loop. Overlapping requests each run as
/// their own cooperative task on the loader runtime, so a superseded
/// track's in-flight retries keep running and simply report late; the
/// session discards them by ticket.
pub struct AnalysisLoader {
    /// Channel to send fetch requests
    tx: tokio::sync::mpsc::UnboundedSender<FetchTicket>,
    /// Channel delivering fetch outcomes
    rx: Arc<Mutex<Receiver<FetchOutcome>>>,
    /// Thread handle (for graceful shutdown)
    _handle: JoinHandle<()>,
}

impl AnalysisLoader {
    /// Spawn the background loader thread
    pub fn spawn(
        source: Arc<dyn AnalysisSource>,
        policy: RetryPolicy,
        contrast: f64,
    ) -> anyhow::Result<Self> {
        let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel::<FetchTicket>();
        let (result_tx, result_rx) = std::sync::mpsc::channel::<FetchOutcome>();

        let handle = thread::Builder::new()
            .name("analysis-loader".to_string())
            .spawn(move || loader_thread(source, policy, contrast, request_rx, result_tx))
            .context("failed to spawn analysis loader thread")?;

        log::info!(
            "AnalysisLoader spawned (max {} attempts, {:?} between attempts)",
            policy.max_attempts,
            policy.delay
        );

        Ok(Self {
            tx: request_tx,
            rx: Arc::new(Mutex::new(result_rx)),
            _handle: handle,
        })
    }

    /// Request a fetch for the ticketed track (non-blocking)
    pub fn request(&self, ticket: FetchTicket) -> anyhow::Result<()> {
        self.tx
            .send(ticket)
            .map_err(|_| anyhow::anyhow!("analysis loader thread disconnected"))
    }

    /// Receiver for fetch outcomes, for bridging into a subscription
    pub fn result_receiver(&self) -> Arc<Mutex<Receiver<FetchOutcome>>> {
        Arc::clone(&self.rx)
    }

    /// Try to receive a completed fetch outcome (non-blocking)
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        let rx = self.rx.lock().ok()?;
        match rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("analysis loader thread disconnected unexpectedly");
                None
            }
        }
    }
}

/// The loader thread: a current-thread runtime so all retry loops share one
/// cooperative execution context
fn loader_thread(
    source: Arc<dyn AnalysisSource>,
    policy: RetryPolicy,
    contrast: f64,
    mut request_rx: tokio::sync::mpsc::UnboundedReceiver<FetchTicket>,
    result_tx: Sender<FetchOutcome>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("failed to build analysis loader runtime: {}", e);
            return;
        }
    };

    log::info!("analysis loader thread started");

    runtime.block_on(async move {
        while let Some(ticket) = request_rx.recv().await {
            let source = Arc::clone(&source);
            let results = result_tx.clone();

            tokio::spawn(async move {
                let result =
                    fetch_with_retry(source.as_ref(), &ticket.track, policy, contrast).await;
                if results.send(FetchOutcome { ticket, result }).is_err() {
                    log::debug!("dropping fetch outcome: result receiver gone");
                }
            });
        }
    });

    log::info!("analysis loader thread shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisSegment;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Source that fails a configured number of times before succeeding
    struct FlakySource {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures_before_success: u32) -> Self {
            Self {
                failures_before_success,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisSource for FlakySource {
        async fn fetch_analysis(&self, _track: &TrackId) -> AnalysisResult<TrackAnalysis> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(AnalysisError::Transport("503 from analysis feed".to_string()))
            } else {
                Ok(valid_analysis())
            }
        }
    }

    /// Source that always returns a payload the processor rejects
    struct MalformedSource {
        calls: AtomicU32,
    }

    #[async_trait]
    impl AnalysisSource for MalformedSource {
        async fn fetch_analysis(&self, _track: &TrackId) -> AnalysisResult<TrackAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TrackAnalysis {
                segments: Vec::new(),
                duration: 100.0,
            })
        }
    }

    fn valid_analysis() -> TrackAnalysis {
        TrackAnalysis {
            segments: vec![AnalysisSegment {
                start: 0.0,
                duration: 100.0,
                loudness_max: -10.0,
            }],
            duration: 100.0,
        }
    }

    fn track() -> TrackId {
        TrackId::new("track:abc123")
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_attempts_exactly_max_with_fixed_delay() {
        let _ = env_logger::builder().is_test(true).try_init();

        let source = FlakySource::new(u32::MAX);
        let started = tokio::time::Instant::now();

        let result = fetch_with_retry(&source, &track(), policy(), 4.0).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Unavailable { attempts: 3 })
        ));
        assert_eq!(source.calls(), 3);
        // Delay between attempts only: two gaps for three attempts, and no
        // trailing sleep after the final failure.
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_within_budget_stops_retrying() {
        let source = FlakySource::new(2);

        let profile = fetch_with_retry(&source, &track(), policy(), 4.0)
            .await
            .unwrap();

        assert_eq!(source.calls(), 3);
        assert_eq!(profile.len(), crate::profile::PROFILE_RESOLUTION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_takes_no_delay() {
        let source = FlakySource::new(0);
        let started = tokio::time::Instant::now();

        fetch_with_retry(&source, &track(), policy(), 4.0)
            .await
            .unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_consumes_attempts_like_transport_failure() {
        let source = MalformedSource {
            calls: AtomicU32::new(0),
        };

        let result = fetch_with_retry(&source, &track(), policy(), 4.0).await;

        assert!(matches!(result, Err(AnalysisError::Unavailable { .. })));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_loader_round_trips_ticket_and_outcome() {
        let source = Arc::new(FlakySource::new(0));
        let loader = AnalysisLoader::spawn(
            source,
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(1),
            },
            4.0,
        )
        .unwrap();

        let ticket = FetchTicket {
            track: track(),
            generation: 7,
        };
        loader.request(ticket.clone()).unwrap();

        let receiver = loader.result_receiver();
        let outcome = receiver
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .expect("loader should deliver an outcome");

        assert_eq!(outcome.ticket, ticket);
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn test_loader_reports_terminal_failure() {
        let source = Arc::new(FlakySource::new(u32::MAX));
        let loader = AnalysisLoader::spawn(
            source,
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
            },
            4.0,
        )
        .unwrap();

        loader
            .request(FetchTicket {
                track: track(),
                generation: 1,
            })
            .unwrap();

        let receiver = loader.result_receiver();
        let outcome = receiver
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .expect("loader should deliver an outcome");

        assert!(matches!(
            outcome.result,
            Err(AnalysisError::Unavailable { attempts: 2 })
        ));
    }
}
