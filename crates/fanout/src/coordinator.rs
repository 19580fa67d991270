//! Fan-out coordinator - concurrent directory lookups merged into one stream

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_stream::wrappers::{ReceiverStream, UnboundedReceiverStream};
use tokio_stream::StreamExt;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use gig_core::{DirectoryClient, EventRecord, Identity};

use crate::outcome::{FanOutSummary, LookupFailure, LookupOutcome, LookupStage};

/// Configuration for the fan-out coordinator
#[derive(Debug, Clone)]
pub struct FanOutConfig {
    /// Maximum pipelines running at once; `None` launches every lookup
    /// immediately. `Some(0)` is treated as `Some(1)`.
    pub max_concurrency: Option<usize>,
    /// Capacity of the events channel
    pub channel_capacity: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            channel_capacity: 32,
        }
    }
}

impl FanOutConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Receiving side of one fan-out run
///
/// Events arrive in completion order, not input order. The events and
/// failures sequences both end once every pipeline has finished. Drain
/// `events` before waiting on anything else: the events channel is bounded
/// and a stalled consumer stalls the workers.
pub struct FanOutHandle {
    pub run_id: Uuid,
    events: mpsc::Receiver<EventRecord>,
    failures: mpsc::UnboundedReceiver<LookupFailure>,
    summary: JoinHandle<FanOutSummary>,
}

impl FanOutHandle {
    /// Next event, or `None` once all pipelines are done
    pub async fn next_event(&mut self) -> Option<EventRecord> {
        self.events.recv().await
    }

    /// Split into the events stream, the failure side channel and the
    /// summary produced by the closer task
    pub fn into_parts(
        self,
    ) -> (
        ReceiverStream<EventRecord>,
        UnboundedReceiverStream<LookupFailure>,
        JoinHandle<FanOutSummary>,
    ) {
        (
            ReceiverStream::new(self.events),
            UnboundedReceiverStream::new(self.failures),
            self.summary,
        )
    }

    /// Drain everything and wait for the summary
    pub async fn collect(self) -> (Vec<EventRecord>, Vec<LookupFailure>, Option<FanOutSummary>) {
        let (events, failures, summary) = self.into_parts();
        let events: Vec<EventRecord> = events.collect().await;
        let failures: Vec<LookupFailure> = failures.collect().await;
        (events, failures, summary.await.ok())
    }
}

/// Runs one lookup pipeline per identity against a directory
pub struct FanOut {
    directory: Arc<dyn DirectoryClient>,
    config: FanOutConfig,
}

impl FanOut {
    pub fn new(directory: Arc<dyn DirectoryClient>, config: FanOutConfig) -> Self {
        Self { directory, config }
    }

    /// Start a lookup for every identity
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// workers and the closer task run in the background.
    pub fn run(&self, identities: Vec<Identity>) -> FanOutHandle {
        let run_id = Uuid::new_v4();
        let total = identities.len();
        let span = info_span!("fanout", run_id = %run_id, total);

        let (event_tx, event_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        let limiter = self
            .config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits.max(1))));

        let started = Instant::now();
        let mut workers = JoinSet::new();

        for identity in identities {
            let directory = Arc::clone(&self.directory);
            let event_tx = event_tx.clone();
            let failure_tx = failure_tx.clone();
            let limiter = limiter.clone();

            workers.spawn(
                async move {
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    run_pipeline(directory.as_ref(), &identity.name, &event_tx, &failure_tx)
                        .await
                }
                .instrument(span.clone()),
            );
        }

        // The closer owns the last senders; dropping them after the barrier
        // ends both sequences.
        let summary = tokio::spawn(
            async move {
                let mut summary = FanOutSummary::new(run_id, total);

                while let Some(joined) = workers.join_next().await {
                    match joined {
                        Ok(outcome) => summary.record(outcome),
                        Err(e) => {
                            error!("Lookup worker aborted: {}", e);
                            summary.failed += 1;
                        }
                    }
                }

                drop(event_tx);
                drop(failure_tx);

                summary.elapsed = started.elapsed();
                info!(
                    "Fan-out finished: {} emitted, {} failed of {} in {:?}",
                    summary.emitted, summary.failed, summary.total, summary.elapsed
                );
                summary
            }
            .instrument(span),
        );

        FanOutHandle {
            run_id,
            events: event_rx,
            failures: failure_rx,
            summary,
        }
    }
}

/// Search, then fetch events, then emit. Never propagates errors.
async fn run_pipeline(
    directory: &dyn DirectoryClient,
    name: &str,
    event_tx: &mpsc::Sender<EventRecord>,
    failure_tx: &mpsc::UnboundedSender<LookupFailure>,
) -> LookupOutcome {
    let entity = match directory.find_entity(name).await {
        Ok(Some(entity)) => entity,
        Ok(None) => {
            debug!("No artist match for '{}'", name);
            return LookupOutcome::NoMatch;
        }
        Err(e) => return report_failure(failure_tx, name, LookupStage::Search, e),
    };

    if entity.events_href().is_none() {
        debug!("Artist '{}' has no identifiers", entity.display_name);
        return LookupOutcome::NoIdentifier;
    }

    let event = match directory.fetch_events(&entity).await {
        Ok(Some(event)) => event,
        Ok(None) => return LookupOutcome::NoEvents,
        Err(e) => return report_failure(failure_tx, name, LookupStage::Events, e),
    };

    if event_tx.send(event).await.is_err() {
        debug!("Event consumer gone, dropping event for '{}'", name);
        return LookupOutcome::Undelivered;
    }

    LookupOutcome::Emitted
}

fn report_failure(
    failure_tx: &mpsc::UnboundedSender<LookupFailure>,
    name: &str,
    stage: LookupStage,
    error: gig_core::Error,
) -> LookupOutcome {
    warn!("{} lookup for '{}' failed: {}", stage, name, error);
    // Nobody listening on the side channel is fine
    let _ = failure_tx.send(LookupFailure {
        name: name.to_string(),
        stage,
        error: error.to_string(),
    });
    LookupOutcome::Failed(stage)
}
