//! Admin handlers for per-shop settings and usage.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swiftfill_core::{validate_shop_domain, SettingsUpdate, ShopSettings};
use swiftfill_db::UsageSummary;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const USAGE_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct LookupsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SettingsView {
    #[serde(flatten)]
    pub settings: ShopSettings,
    /// `false` when these are defaults for a shop that has not saved yet.
    pub stored: bool,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub usage_30d: UsageSummary,
}

#[derive(Debug, Serialize)]
pub(super) struct LookupItem {
    pub id: Uuid,
    pub query: String,
    pub context: Option<String>,
    pub result_count: i32,
    pub charged: bool,
    pub charge_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

fn shop_or_validation_error(req_id: &str, raw: &str) -> Result<String, ApiError> {
    validate_shop_domain(raw).map_err(|e| ApiError::new(req_id, "validation_error", e.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/{shop}/settings
pub(super) async fn get_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<SettingsView>>, ApiError> {
    let shop = shop_or_validation_error(&req_id.0, &shop)?;

    let row = swiftfill_db::get_shop_settings(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let since = Utc::now() - Duration::days(USAGE_WINDOW_DAYS);
    let usage_30d = swiftfill_db::usage_summary(&state.pool, &shop, since)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let view = match row {
        Some(row) => SettingsView {
            stored: true,
            usage_count: row.usage_count,
            last_used_at: row.last_used_at,
            settings: row.into(),
            usage_30d,
        },
        None => SettingsView {
            settings: ShopSettings::defaults_for(&shop),
            stored: false,
            usage_count: 0,
            last_used_at: None,
            usage_30d,
        },
    };

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/shops/{shop}/settings
pub(super) async fn put_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<ApiResponse<ShopSettings>>, ApiError> {
    let rid = &req_id.0;
    let shop = shop_or_validation_error(rid, &shop)?;
    let settings = body
        .validate(&shop)
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let row = swiftfill_db::upsert_shop_settings(&state.pool, &settings)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tracing::info!(shop = %shop, enabled = row.enabled, "shop settings saved");

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/shops/{shop}/lookups?limit=
pub(super) async fn list_lookups(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Query(params): Query<LookupsQuery>,
) -> Result<Json<ApiResponse<Vec<LookupItem>>>, ApiError> {
    let shop = shop_or_validation_error(&req_id.0, &shop)?;
    let limit = normalize_limit(params.limit);

    let rows = swiftfill_db::list_recent_lookups(&state.pool, &shop, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let items = rows
        .into_iter()
        .map(|row| LookupItem {
            id: row.public_id,
            query: row.query,
            context: row.context,
            result_count: row.result_count,
            charged: row.charged,
            charge_amount: row.charge_amount,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}
