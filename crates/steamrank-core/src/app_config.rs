use std::path::PathBuf;

/// Postgres `sslmode`, named the way libpq spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SslMode::Disable => write!(f, "disable"),
            SslMode::Prefer => write!(f, "prefer"),
            SslMode::Require => write!(f, "require"),
            SslMode::VerifyCa => write!(f, "verify-ca"),
            SslMode::VerifyFull => write!(f, "verify-full"),
        }
    }
}

/// How the reconciler finds the row(s) to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// `steam_appid = $id OR name = $name`. A row matching either condition
    /// is updated, so drifted ids or colliding names can touch several rows.
    Either,
    /// Match by `steam_appid`; fall back to `name` only when the id matches
    /// nothing.
    IdFirst,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Either => write!(f, "either"),
            MatchStrategy::IdFirst => write!(f, "id-first"),
        }
    }
}

/// Connection parameters for the catalog database.
#[derive(Clone)]
pub struct DbSettings {
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    pub ssl_mode: SslMode,
}

impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("port", &self.port)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub db: DbSettings,
    pub log_level: String,
    pub appdetails_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub primary_currency: String,
    pub match_strategy: MatchStrategy,
    pub fetch_max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub inter_request_delay_ms: u64,
    pub games_path: PathBuf,
    pub failed_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db", &self.db)
            .field("log_level", &self.log_level)
            .field("appdetails_url", &self.appdetails_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("primary_currency", &self.primary_currency)
            .field("match_strategy", &self.match_strategy)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("games_path", &self.games_path)
            .field("failed_path", &self.failed_path)
            .finish()
    }
}
