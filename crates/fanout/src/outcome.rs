//! Per-lookup outcomes and run summaries

use std::fmt;
use std::time::Duration;

use uuid::Uuid;

/// Remote call a lookup pipeline was in when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    /// Artist search by name
    Search,
    /// Event listing for the matched artist
    Events,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Events => write!(f, "events"),
        }
    }
}

/// How a single pipeline ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// An event was sent on the output channel
    Emitted,
    /// Search found no artist
    NoMatch,
    /// Artist matched but carries no identifier
    NoIdentifier,
    /// Artist has no upcoming events
    NoEvents,
    /// Event found but the consumer was already gone
    Undelivered,
    /// A remote call failed
    Failed(LookupStage),
}

/// A failed remote call inside the fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    /// Name being looked up
    pub name: String,
    pub stage: LookupStage,
    pub error: String,
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lookup for '{}' failed: {}", self.stage, self.name, self.error)
    }
}

/// Counters for one fan-out run, produced after the join barrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutSummary {
    pub run_id: Uuid,
    /// Number of pipelines launched
    pub total: usize,
    pub emitted: usize,
    pub no_match: usize,
    pub no_identifier: usize,
    pub no_events: usize,
    pub undelivered: usize,
    /// Remote failures plus panicked workers
    pub failed: usize,
    pub elapsed: Duration,
}

impl FanOutSummary {
    pub fn new(run_id: Uuid, total: usize) -> Self {
        Self {
            run_id,
            total,
            emitted: 0,
            no_match: 0,
            no_identifier: 0,
            no_events: 0,
            undelivered: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: LookupOutcome) {
        match outcome {
            LookupOutcome::Emitted => self.emitted += 1,
            LookupOutcome::NoMatch => self.no_match += 1,
            LookupOutcome::NoIdentifier => self.no_identifier += 1,
            LookupOutcome::NoEvents => self.no_events += 1,
            LookupOutcome::Undelivered => self.undelivered += 1,
            LookupOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Pipelines that have reported back
    pub fn completed(&self) -> usize {
        self.emitted
            + self.no_match
            + self.no_identifier
            + self.no_events
            + self.undelivered
            + self.failed
    }
}
