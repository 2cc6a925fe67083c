//! Database operations for the `address_lookups` usage ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use swiftfill_core::SearchContext;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `address_lookups` table; one per provider call.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AddressLookupRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop: String,
    pub query: String,
    pub context: Option<String>,
    pub result_count: i32,
    pub charged: bool,
    pub charge_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new usage record.
#[derive(Debug, Clone)]
pub struct NewAddressLookup<'a> {
    pub shop: &'a str,
    pub query: &'a str,
    pub context: Option<SearchContext>,
    pub result_count: i32,
    pub charge_amount: Decimal,
}

/// Aggregate usage over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UsageSummary {
    pub lookups: i64,
    pub total_cost: Decimal,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Records one lookup. Records start uncharged; settlement is not handled
/// here.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_address_lookup(
    pool: &PgPool,
    lookup: &NewAddressLookup<'_>,
) -> Result<AddressLookupRow, DbError> {
    let row = sqlx::query_as::<_, AddressLookupRow>(
        "INSERT INTO address_lookups (shop, query, context, result_count, charged, charge_amount) \
         VALUES ($1, $2, $3, $4, false, $5) \
         RETURNING id, public_id, shop, query, context, result_count, charged, \
                   charge_amount, created_at",
    )
    .bind(lookup.shop)
    .bind(lookup.query)
    .bind(lookup.context.map(SearchContext::as_str))
    .bind(lookup.result_count)
    .bind(lookup.charge_amount)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Number of lookups and summed charge for `shop` since `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn usage_summary(
    pool: &PgPool,
    shop: &str,
    since: DateTime<Utc>,
) -> Result<UsageSummary, DbError> {
    let summary = sqlx::query_as::<_, UsageSummary>(
        "SELECT COUNT(*) AS lookups, \
                COALESCE(SUM(charge_amount), 0)::NUMERIC AS total_cost \
         FROM address_lookups \
         WHERE shop = $1 AND created_at >= $2",
    )
    .bind(shop)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

/// Most recent lookups for `shop`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_lookups(
    pool: &PgPool,
    shop: &str,
    limit: i64,
) -> Result<Vec<AddressLookupRow>, DbError> {
    let rows = sqlx::query_as::<_, AddressLookupRow>(
        "SELECT id, public_id, shop, query, context, result_count, charged, \
                charge_amount, created_at \
         FROM address_lookups \
         WHERE shop = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(shop)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
