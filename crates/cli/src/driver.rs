//! Run orchestration: origin user -> followings -> fan-out -> output

use std::io::Write;

use futures::StreamExt;
use tracing::{info, warn};

use gig_core::FollowGraphClient;
use gig_fanout::{FanOut, FanOutSummary, LookupFailure};
use uuid::Uuid;

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Origin user could not be resolved; the message was printed
    UserUnavailable,
    Completed {
        printed: usize,
        summary: Option<FanOutSummary>,
    },
}

/// Options that shape a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Also write a failure summary to stderr
    pub report_failures: bool,
}

/// Resolve `username`, look up gigs for everyone they follow and print one
/// `<eventName>, <city>` line per event in arrival order
pub async fn run<W: Write>(
    follow_graph: &dyn FollowGraphClient,
    fanout: &FanOut,
    username: &str,
    options: &RunOptions,
    out: &mut W,
) -> anyhow::Result<RunOutcome> {
    let user = match follow_graph.resolve_user(username).await {
        Ok(user) => user,
        Err(e) => {
            if e.is_upstream() {
                warn!("Resolving '{}' failed: {}", username, e);
            }
            writeln!(out, "{}", e)?;
            return Ok(RunOutcome::UserUnavailable);
        }
    };
    info!("Resolved '{}' to user {}", username, user.id);

    let followings = match follow_graph.list_followings(user.id).await {
        Ok(followings) => followings,
        Err(e) => {
            warn!("Could not list followings of user {}: {}", user.id, e);
            Vec::new()
        }
    };
    info!("Looking up gigs for {} followed accounts", followings.len());

    let handle = fanout.run(followings);
    let run_id = handle.run_id;
    let (mut events, mut failures, summary) = handle.into_parts();

    let mut printed = 0;
    while let Some(event) = events.next().await {
        writeln!(out, "{}", event.summary_line())?;
        printed += 1;
    }

    let mut failed = Vec::new();
    while let Some(failure) = failures.next().await {
        failed.push(failure);
    }

    let summary = match summary.await {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!("Fan-out closer task failed: {}", e);
            None
        }
    };

    if options.report_failures && !failed.is_empty() {
        eprintln!("{}", failure_report(run_id, &failed));
    }

    Ok(RunOutcome::Completed { printed, summary })
}

/// Multi-line failure summary for `--report-failures`
fn failure_report(run_id: Uuid, failed: &[LookupFailure]) -> String {
    let mut report = format!("{} lookups failed (run {}):", failed.len(), run_id);
    for failure in failed {
        report.push_str(&format!("\n  {}", failure));
    }
    report
}
