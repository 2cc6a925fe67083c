//! Postgres persistence for shop settings and the address-lookup ledger.

pub mod lookups;
pub mod shop_settings;

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use swiftfill_core::AppConfig;
use thiserror::Error;

pub use lookups::{
    insert_address_lookup, list_recent_lookups, usage_summary, AddressLookupRow, NewAddressLookup,
    UsageSummary,
};
pub use shop_settings::{
    get_shop_settings, record_settings_usage, upsert_shop_settings, ShopSettingsRow,
};

// Resolved from this crate's manifest: <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Pool sizing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 10,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

/// Opens a pool against `database_url`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Applies pending migrations and reports how many ran.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    let before = successful_migrations(pool).await;
    MIGRATOR.run(pool).await?;
    let after = successful_migrations(pool).await;

    Ok(usize::try_from(after.saturating_sub(before)).unwrap_or(0))
}

// The bookkeeping table is missing on a fresh database; that counts as zero.
async fn successful_migrations(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// Round-trips `SELECT 1`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// [`ping`] with the crate's error type, for the health endpoint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the database is unreachable.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await.map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_defaults() {
        assert_eq!(
            PoolConfig::default(),
            PoolConfig {
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 10,
            }
        );
    }

    #[test]
    fn not_found_message() {
        assert_eq!(DbError::NotFound.to_string(), "record not found");
    }
}
