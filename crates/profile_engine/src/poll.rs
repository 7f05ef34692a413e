use std::time::Duration;

use engine_logging::{engine_debug, engine_trace};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ContentSource, EngineEvent, EventSink};

/// Default period between manifest polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Stops a running poll loop. Dropping the handle leaves the loop running.
#[derive(Debug, Clone)]
pub struct PollHandle {
    token: CancellationToken,
}

impl PollHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Fetches the manifest every `interval` (bypassing caches) and emits
/// `EngineEvent::ManifestPolled` for each success until `token` is cancelled.
///
/// Errors are logged and dropped; the next tick is the retry.
pub async fn run_poll_loop(
    source: &dyn ContentSource,
    interval: Duration,
    token: CancellationToken,
    sink: &dyn EventSink,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the startup load covers it.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let polled = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            polled = source.fetch_manifest(true) => polled,
        };

        match polled {
            Ok(manifest) => {
                engine_trace!("Polled manifest modified_at={}", manifest.modified_at);
                sink.emit(EngineEvent::ManifestPolled(manifest));
            }
            Err(err) => engine_debug!("Manifest poll failed: {}", err),
        }
    }
    engine_debug!("Poll loop stopped");
}
