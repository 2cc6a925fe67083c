//! Database operations for the `shop_settings` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use swiftfill_core::ShopSettings;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `shop_settings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopSettingsRow {
    pub id: i64,
    pub shop: String,
    pub api_key: String,
    pub enabled: bool,
    pub enabled_checkout: bool,
    pub enabled_profile: bool,
    pub charge_per_lookup: Decimal,
    pub max_monthly_charge: Decimal,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShopSettingsRow> for ShopSettings {
    fn from(row: ShopSettingsRow) -> Self {
        Self {
            shop: row.shop,
            api_key: row.api_key,
            enabled: row.enabled,
            enabled_checkout: row.enabled_checkout,
            enabled_profile: row.enabled_profile,
            charge_per_lookup: row.charge_per_lookup,
            max_monthly_charge: row.max_monthly_charge,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the stored settings for `shop`, or `None` if the shop has never
/// saved any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_shop_settings(
    pool: &PgPool,
    shop: &str,
) -> Result<Option<ShopSettingsRow>, DbError> {
    let row = sqlx::query_as::<_, ShopSettingsRow>(
        "SELECT id, shop, api_key, enabled, enabled_checkout, enabled_profile, \
                charge_per_lookup, max_monthly_charge, usage_count, last_used_at, \
                created_at, updated_at \
         FROM shop_settings \
         WHERE shop = $1",
    )
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts or replaces the settings for `settings.shop`.
///
/// `usage_count` and `last_used_at` are preserved on update.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_shop_settings(
    pool: &PgPool,
    settings: &ShopSettings,
) -> Result<ShopSettingsRow, DbError> {
    let row = sqlx::query_as::<_, ShopSettingsRow>(
        "INSERT INTO shop_settings \
             (shop, api_key, enabled, enabled_checkout, enabled_profile, \
              charge_per_lookup, max_monthly_charge) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (shop) DO UPDATE SET \
             api_key = EXCLUDED.api_key, \
             enabled = EXCLUDED.enabled, \
             enabled_checkout = EXCLUDED.enabled_checkout, \
             enabled_profile = EXCLUDED.enabled_profile, \
             charge_per_lookup = EXCLUDED.charge_per_lookup, \
             max_monthly_charge = EXCLUDED.max_monthly_charge, \
             updated_at = NOW() \
         RETURNING id, shop, api_key, enabled, enabled_checkout, enabled_profile, \
                   charge_per_lookup, max_monthly_charge, usage_count, last_used_at, \
                   created_at, updated_at",
    )
    .bind(&settings.shop)
    .bind(&settings.api_key)
    .bind(settings.enabled)
    .bind(settings.enabled_checkout)
    .bind(settings.enabled_profile)
    .bind(settings.charge_per_lookup)
    .bind(settings.max_monthly_charge)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Increments the shop's lookup counter and stamps `last_used_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the shop has no settings row, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn record_settings_usage(pool: &PgPool, shop: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE shop_settings \
         SET usage_count = usage_count + 1, last_used_at = NOW() \
         WHERE shop = $1",
    )
    .bind(shop)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
