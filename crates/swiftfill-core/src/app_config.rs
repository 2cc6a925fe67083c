use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origin advertised to storefront scripts; derived per request when `None`.
    pub public_app_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_user_agent: String,
    pub provider_max_results: u32,
    pub provider_search_for: String,
    pub provider_max_retries: u32,
    pub provider_retry_backoff_ms: u64,
    pub min_query_chars: usize,
    pub debounce_ms: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("public_app_url", &self.public_app_url)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_user_agent", &self.provider_user_agent)
            .field("provider_max_results", &self.provider_max_results)
            .field("provider_search_for", &self.provider_search_for)
            .field("provider_max_retries", &self.provider_max_retries)
            .field("provider_retry_backoff_ms", &self.provider_retry_backoff_ms)
            .field("min_query_chars", &self.min_query_chars)
            .field("debounce_ms", &self.debounce_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
