use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SWIFTFILL_ENV", "development"))?;

    let bind_addr = parse_addr("SWIFTFILL_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SWIFTFILL_LOG_LEVEL", "info");
    let public_app_url = lookup("SWIFTFILL_PUBLIC_APP_URL")
        .ok()
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty());

    let db_max_connections = parse_u32("SWIFTFILL_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SWIFTFILL_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SWIFTFILL_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let provider_base_url = or_default(
        "SWIFTFILL_PROVIDER_BASE_URL",
        "https://api.swiftcomplete.com/",
    );
    let provider_timeout_secs = parse_u64("SWIFTFILL_PROVIDER_TIMEOUT_SECS", "10")?;
    let provider_user_agent = or_default(
        "SWIFTFILL_PROVIDER_USER_AGENT",
        "swiftfill/0.1 (address-autocomplete)",
    );
    let provider_max_results = parse_u32("SWIFTFILL_PROVIDER_MAX_RESULTS", "5")?;
    let provider_search_for = or_default("SWIFTFILL_PROVIDER_SEARCH_FOR", "address,road");
    let provider_max_retries = parse_u32("SWIFTFILL_PROVIDER_MAX_RETRIES", "2")?;
    let provider_retry_backoff_ms = parse_u64("SWIFTFILL_PROVIDER_RETRY_BACKOFF_MS", "250")?;

    let min_query_chars = parse_usize("SWIFTFILL_MIN_QUERY_CHARS", "3")?;
    let debounce_ms = parse_u64("SWIFTFILL_DEBOUNCE_MS", "300")?;

    let rate_limit_max_requests = parse_usize("SWIFTFILL_RATE_LIMIT_MAX_REQUESTS", "600")?;
    let rate_limit_window_secs = parse_u64("SWIFTFILL_RATE_LIMIT_WINDOW_SECS", "60")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "SWIFTFILL_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        public_app_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        provider_base_url,
        provider_timeout_secs,
        provider_user_agent,
        provider_max_results,
        provider_search_for,
        provider_max_retries,
        provider_retry_backoff_ms,
        min_query_chars,
        debounce_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SWIFTFILL_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
