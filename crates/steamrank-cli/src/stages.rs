//! Production implementations of the pipeline stages.

use sqlx::{Connection, PgConnection};
use steamrank_appdetails::{AppDetailsClient, AppDetailsError};
use steamrank_core::{AppConfig, MatchStrategy, NormalizedMetadata};
use steamrank_db::{update_game, DbError, GameUpdate};

use crate::pipeline::{MetadataFetcher, Reconciler};

/// Steam `appdetails` lookups with the configured retry policy.
pub(crate) struct AppDetailsFetcher {
    client: AppDetailsClient,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl AppDetailsFetcher {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppDetailsError> {
        let client = AppDetailsClient::with_endpoint(
            &config.appdetails_url,
            config.request_timeout_secs,
            &config.user_agent,
            &config.primary_currency,
        )?;
        Ok(Self {
            client,
            max_retries: config.fetch_max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        })
    }
}

impl MetadataFetcher for AppDetailsFetcher {
    async fn fetch(&self, appid: &str) -> Result<NormalizedMetadata, AppDetailsError> {
        self.client
            .fetch_app_details_with_retry(appid, self.max_retries, self.backoff_base_ms)
            .await
    }
}

/// Runs each update in its own transaction on the pass's single connection.
pub(crate) struct PgReconciler {
    conn: PgConnection,
    strategy: MatchStrategy,
}

impl PgReconciler {
    pub(crate) fn new(conn: PgConnection, strategy: MatchStrategy) -> Self {
        Self { conn, strategy }
    }

    /// Closes the connection gracefully.
    pub(crate) async fn close(self) -> Result<(), DbError> {
        self.conn.close().await?;
        Ok(())
    }
}

impl Reconciler for PgReconciler {
    async fn reconcile(&mut self, update: &GameUpdate<'_>) -> Result<u64, DbError> {
        let mut tx = self.conn.begin().await?;

        match update_game(&mut *tx, update, self.strategy).await {
            Ok(rows) => {
                tx.commit().await?;
                Ok(rows)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        appid = update.appid,
                        error = %rollback_err,
                        "rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "stages_test.rs"]
mod tests;
