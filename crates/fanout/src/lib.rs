//! Fan-out coordinator
//!
//! Runs one directory lookup pipeline per followed account, concurrently,
//! and merges the resulting events into a single channel that closes once
//! every pipeline has finished.

mod coordinator;
mod outcome;

pub use coordinator::{FanOut, FanOutConfig, FanOutHandle};
pub use outcome::{FanOutSummary, LookupFailure, LookupOutcome, LookupStage};
