use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use steamrank_core::{DbSettings, SslMode};
use thiserror::Error;

// Path relative to crates/steamrank-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

/// Build connect options from explicit settings.
///
/// `PgConnectOptions::new` seeds defaults from `PG*` variables; every field in
/// [`DbSettings`] overrides them.
#[must_use]
pub fn connect_options(settings: &DbSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.dbname)
        .username(&settings.user)
        .password(&settings.password)
        .ssl_mode(pg_ssl_mode(settings.ssl_mode))
        .application_name("steamrank")
}

/// Open the single connection a pass runs on.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the connection cannot be established.
pub async fn connect(settings: &DbSettings) -> Result<PgConnection, DbError> {
    let conn = PgConnection::connect_with(&connect_options(settings)).await?;
    tracing::debug!(
        host = %settings.host,
        dbname = %settings.dbname,
        ssl_mode = %settings.ssl_mode,
        "connected to catalog database"
    );
    Ok(conn)
}

/// Run all pending migrations on the connection.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(conn: &mut PgConnection) -> Result<usize, sqlx::migrate::MigrateError> {
    // The _sqlx_migrations table may not exist yet on a fresh database;
    // treat absence as zero applied.
    let applied_before = count_applied(conn).await;
    MIGRATOR.run(&mut *conn).await?;
    let applied_after = count_applied(conn).await;

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

async fn count_applied(conn: &mut PgConnection) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
        .fetch_one(&mut *conn)
        .await
        .unwrap_or(0)
}

/// Send a `SELECT 1` to verify the connection is live.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&mut *conn)
        .await?;
    Ok(())
}

pub mod games;

pub use games::{update_game, GameUpdate};
