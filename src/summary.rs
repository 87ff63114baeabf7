//! Run-level reporting for batches of venues or titles.
//!
//! Each item of a batch either succeeds (possibly with zero records) or fails;
//! failures are kept with their reason so the run can report them at the end
//! instead of aborting.

use crate::error::DblpError;
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// A batch item that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

/// Counters for one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// What an item is, for log messages ("venue", "title")
    pub label: &'static str,
    pub items: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
    /// Title lookups with no matching entry
    pub not_found: usize,
    /// Title lookups with more than one matching entry
    pub ambiguous: usize,
    /// Records produced across all items
    pub records: usize,
    pub started_at: DateTime<Local>,
}

impl BatchSummary {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            items: 0,
            succeeded: 0,
            failures: Vec::new(),
            not_found: 0,
            ambiguous: 0,
            records: 0,
            started_at: Local::now(),
        }
    }

    pub fn record_success(&mut self, records: usize) {
        self.items += 1;
        self.succeeded += 1;
        self.records += records;
    }

    pub fn record_failure(&mut self, item: &str, error: &DblpError) {
        self.items += 1;
        self.failures.push(ItemFailure {
            item: item.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when there was at least one item and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.items > 0 && self.succeeded == 0
    }

    /// Emit the summary (and each failure) to the log.
    pub fn log(&self) {
        let elapsed = Local::now().signed_duration_since(self.started_at);
        info!(
            kind = self.label,
            items = self.items,
            succeeded = self.succeeded,
            failed = self.failed(),
            not_found = self.not_found,
            ambiguous = self.ambiguous,
            records = self.records,
            elapsed_ms = elapsed.num_milliseconds(),
            "Batch complete"
        );
        for failure in &self.failures {
            warn!(kind = self.label, item = %failure.item, reason = %failure.reason, "Failed item");
        }
    }
}
