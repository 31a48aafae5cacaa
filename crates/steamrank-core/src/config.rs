use std::path::{Path, PathBuf};

use crate::app_config::{AppConfig, DbSettings, MatchStrategy, SslMode};
use crate::ConfigError;

const FAILED_FILE_NAME: &str = "games_failed.txt";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    build_app_config(|key| std::env::var(key), exe_dir.as_deref())
}

/// Build application configuration using the provided env-var lookup function.
///
/// `exe_dir` is the directory holding the running binary; the failure log
/// defaults to a file beside it, falling back to the working directory.
fn build_app_config<F>(lookup: F, exe_dir: Option<&Path>) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let db = DbSettings {
        host: require("STEAMRANK_DB_HOST")?,
        dbname: require("STEAMRANK_DB_NAME")?,
        user: require("STEAMRANK_DB_USER")?,
        password: require("STEAMRANK_DB_PASSWORD")?,
        port: parse_u16("STEAMRANK_DB_PORT", "5432")?,
        ssl_mode: parse_ssl_mode(&or_default("STEAMRANK_DB_SSLMODE", "require"))?,
    };

    let log_level = or_default("STEAMRANK_LOG_LEVEL", "info");
    let appdetails_url = or_default(
        "STEAMRANK_APPDETAILS_URL",
        "https://store.steampowered.com/api/appdetails",
    );
    let request_timeout_secs = parse_u64("STEAMRANK_REQUEST_TIMEOUT_SECS", "6")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "STEAMRANK_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("STEAMRANK_USER_AGENT", "steamrank/0.1 (catalog-enrichment)");
    let primary_currency = or_default("STEAMRANK_PRIMARY_CURRENCY", "USD")
        .trim()
        .to_uppercase();
    let match_strategy = parse_match_strategy(&or_default("STEAMRANK_MATCH_STRATEGY", "either"))?;
    let fetch_max_retries = parse_u32("STEAMRANK_FETCH_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("STEAMRANK_RETRY_BACKOFF_BASE_MS", "1000")?;
    let inter_request_delay_ms = parse_u64("STEAMRANK_INTER_REQUEST_DELAY_MS", "0")?;

    let games_path = PathBuf::from(or_default("STEAMRANK_GAMES_PATH", "games.txt"));
    let failed_path = lookup("STEAMRANK_FAILED_PATH").map_or_else(
        |_| {
            exe_dir.map_or_else(
                || PathBuf::from(FAILED_FILE_NAME),
                |dir| dir.join(FAILED_FILE_NAME),
            )
        },
        PathBuf::from,
    );

    Ok(AppConfig {
        db,
        log_level,
        appdetails_url,
        request_timeout_secs,
        user_agent,
        primary_currency,
        match_strategy,
        fetch_max_retries,
        retry_backoff_base_ms,
        inter_request_delay_ms,
        games_path,
        failed_path,
    })
}

fn parse_ssl_mode(s: &str) -> Result<SslMode, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        "verify-ca" => Ok(SslMode::VerifyCa),
        "verify-full" => Ok(SslMode::VerifyFull),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STEAMRANK_DB_SSLMODE".to_string(),
            reason: format!("unknown sslmode '{other}'"),
        }),
    }
}

fn parse_match_strategy(s: &str) -> Result<MatchStrategy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "either" => Ok(MatchStrategy::Either),
        "id-first" => Ok(MatchStrategy::IdFirst),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STEAMRANK_MATCH_STRATEGY".to_string(),
            reason: format!("expected 'either' or 'id-first', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
