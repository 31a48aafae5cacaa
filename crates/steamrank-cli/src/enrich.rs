//! `enrich` and `retry` command handlers.
//!
//! Both open their identifier list first, then a single database connection,
//! and drive [`run_pass`] to the end of the input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use steamrank_core::{AppConfig, IdentifierSource, RunMode};

use crate::failure_log::FailureLog;
use crate::pipeline::{run_pass, PassOptions, RunSummary};
use crate::stages::{AppDetailsFetcher, PgReconciler};

pub(crate) type BoxedSource = IdentifierSource<Box<dyn BufRead>>;

/// Opens the identifier list for `mode`.
///
/// A bulk list that cannot be opened is an error. A retry list that does not
/// exist (usually because the bulk pass had no failures) is logged and
/// treated as empty.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, except for a missing
/// retry list.
pub(crate) fn open_source(mode: RunMode, path: &Path) -> anyhow::Result<BoxedSource> {
    let reader: Box<dyn BufRead> = match File::open(path) {
        Ok(file) => Box::new(BufReader::new(file)),
        Err(e) if mode == RunMode::Retry && e.kind() == io::ErrorKind::NotFound => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "could not open failure log; nothing to retry"
            );
            Box::new(io::empty())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open input {}", path.display()));
        }
    };
    Ok(IdentifierSource::new(reader, mode.line_format()))
}

/// Opens the bulk pass's failure log. An unwritable log costs the retry
/// list, not the pass: the error is logged and the pass runs without it.
pub(crate) fn open_failure_log(path: &Path) -> Option<FailureLog> {
    match FailureLog::open(path) {
        Ok(log) => Some(log),
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "could not open failure log; fetch failures will not be recorded"
            );
            None
        }
    }
}

/// Runs one pass of `mode` over `input` (or the configured default path).
///
/// # Errors
///
/// Returns an error if the input, HTTP client, or database connection cannot
/// be set up. Per-record failures are logged and counted,
/// never propagated.
pub(crate) async fn run_enrich(
    config: &AppConfig,
    mode: RunMode,
    input: Option<&Path>,
) -> anyhow::Result<RunSummary> {
    let input = input.unwrap_or(match mode {
        RunMode::Bulk => config.games_path.as_path(),
        RunMode::Retry => config.failed_path.as_path(),
    });

    let mut source = open_source(mode, input)?;

    let mut failure_log = match mode {
        RunMode::Bulk => open_failure_log(&config.failed_path),
        RunMode::Retry => None,
    };

    let fetcher = AppDetailsFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build appdetails client: {e}"))?;

    let conn = steamrank_db::connect(&config.db)
        .await
        .context("failed to connect to catalog database")?;
    let mut reconciler = PgReconciler::new(conn, config.match_strategy);

    tracing::info!(
        %mode,
        input = %input.display(),
        match_strategy = %config.match_strategy,
        "starting pass"
    );

    let options = PassOptions {
        mode,
        inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
    };
    let summary = run_pass(
        options,
        &mut source,
        &fetcher,
        &mut reconciler,
        failure_log.as_mut(),
    )
    .await;

    if let Err(e) = reconciler.close().await {
        tracing::warn!(error = %e, "failed to close database connection cleanly");
    }

    summary.log(mode);
    Ok(summary)
}
