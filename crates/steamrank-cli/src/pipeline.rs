//! Single-worker enrichment pipeline.
//!
//! Each identifier is fetched, then reconciled in its own transaction, before
//! the next one starts. Nothing that goes wrong with one record stops the
//! pass; the outcome is logged, counted and, for fetch failures in the bulk
//! pass, appended to the failure log.

use std::io::BufRead;
use std::time::Duration;

use steamrank_appdetails::AppDetailsError;
use steamrank_core::{IdentifierRecord, IdentifierSource, NormalizedMetadata, RunMode};
use steamrank_db::{DbError, GameUpdate};

use crate::failure_log::FailureLog;

/// Fetches normalized metadata for one app id.
pub(crate) trait MetadataFetcher {
    async fn fetch(&self, appid: &str) -> Result<NormalizedMetadata, AppDetailsError>;
}

/// Applies one update inside its own transaction: commit on success,
/// rollback on error.
pub(crate) trait Reconciler {
    async fn reconcile(&mut self, update: &GameUpdate<'_>) -> Result<u64, DbError>;
}

/// What happened to one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordOutcome {
    Updated { rows: u64 },
    /// The update committed but matched no row.
    NoMatch,
    /// Steam answered but has no usable entry for the app.
    NoData { reason: String },
    /// The request failed (network, timeout, status, malformed body).
    FetchFailed { reason: String },
    /// The update or commit failed and was rolled back.
    StoreFailed { reason: String },
}

impl RecordOutcome {
    /// Fetch failures are what a later retry pass can fix.
    pub(crate) fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            RecordOutcome::NoData { .. } | RecordOutcome::FetchFailed { .. }
        )
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub processed: usize,
    pub updated: usize,
    pub rows_updated: u64,
    pub no_match: usize,
    pub no_data: usize,
    pub fetch_failed: usize,
    pub store_failed: usize,
    pub malformed: usize,
    pub failures_logged: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &RecordOutcome) {
        self.processed += 1;
        match outcome {
            RecordOutcome::Updated { rows } => {
                self.updated += 1;
                self.rows_updated = self.rows_updated.saturating_add(*rows);
            }
            RecordOutcome::NoMatch => self.no_match += 1,
            RecordOutcome::NoData { .. } => self.no_data += 1,
            RecordOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            RecordOutcome::StoreFailed { .. } => self.store_failed += 1,
        }
    }

    pub(crate) fn log(&self, mode: RunMode) {
        tracing::info!(
            %mode,
            processed = self.processed,
            updated = self.updated,
            rows_updated = self.rows_updated,
            no_match = self.no_match,
            no_data = self.no_data,
            fetch_failed = self.fetch_failed,
            store_failed = self.store_failed,
            malformed = self.malformed,
            failures_logged = self.failures_logged,
            "pass complete"
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PassOptions {
    pub mode: RunMode,
    pub inter_request_delay: Duration,
}

/// Fetches and reconciles a single record.
pub(crate) async fn process_record<F, C>(
    mode: RunMode,
    record: &IdentifierRecord,
    fetcher: &F,
    reconciler: &mut C,
) -> RecordOutcome
where
    F: MetadataFetcher,
    C: Reconciler,
{
    let metadata = match fetcher.fetch(&record.appid).await {
        Ok(metadata) => metadata,
        Err(e) if e.is_no_data() => {
            return RecordOutcome::NoData {
                reason: e.to_string(),
            }
        }
        Err(e) => {
            return RecordOutcome::FetchFailed {
                reason: e.to_string(),
            }
        }
    };

    let price = metadata.price_string();
    let update = GameUpdate {
        appid: &record.appid,
        name: &record.name,
        profile_img: metadata.profile_img.as_deref(),
        price: price.as_deref(),
        overwrite_name: mode.overwrites_name(),
    };

    match reconciler.reconcile(&update).await {
        Ok(0) => RecordOutcome::NoMatch,
        Ok(rows) => RecordOutcome::Updated { rows },
        Err(e) => RecordOutcome::StoreFailed {
            reason: e.to_string(),
        },
    }
}

fn log_outcome(record: &IdentifierRecord, outcome: &RecordOutcome) {
    let appid = record.appid.as_str();
    let name = record.name.as_str();
    match outcome {
        RecordOutcome::Updated { rows } => {
            tracing::info!(appid, name, rows, "updated");
        }
        RecordOutcome::NoMatch => {
            tracing::warn!(appid, name, "no catalog row matched; nothing updated");
        }
        RecordOutcome::NoData { reason } => {
            tracing::warn!(appid, name, reason = %reason, "skipped: no appdetails data");
        }
        RecordOutcome::FetchFailed { reason } => {
            tracing::warn!(appid, name, reason = %reason, "skipped: appdetails request failed");
        }
        RecordOutcome::StoreFailed { reason } => {
            tracing::error!(appid, name, error = %reason, "database update rolled back; skipping");
        }
    }
}

/// Drains `source` through the fetch and reconcile stages.
///
/// Never fails: every per-record problem becomes a [`RecordOutcome`].
pub(crate) async fn run_pass<R, F, C>(
    options: PassOptions,
    source: &mut IdentifierSource<R>,
    fetcher: &F,
    reconciler: &mut C,
    mut failure_log: Option<&mut FailureLog>,
) -> RunSummary
where
    R: BufRead,
    F: MetadataFetcher,
    C: Reconciler,
{
    let mut summary = RunSummary::default();

    for record in source.by_ref() {
        if summary.processed > 0 && !options.inter_request_delay.is_zero() {
            tokio::time::sleep(options.inter_request_delay).await;
        }

        tracing::info!(appid = %record.appid, name = %record.name, "processing");
        let outcome = process_record(options.mode, &record, fetcher, reconciler).await;
        log_outcome(&record, &outcome);

        if outcome.is_fetch_failure() {
            if let Some(log) = failure_log.as_deref_mut() {
                match log.append(&record) {
                    Ok(()) => summary.failures_logged += 1,
                    Err(e) => tracing::error!(
                        appid = %record.appid,
                        path = %log.path().display(),
                        error = %e,
                        "failed to append to failure log"
                    ),
                }
            }
        }

        summary.record(&outcome);
    }

    summary.malformed = source.malformed();
    summary
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
