//! Bootstrap config for checkout scripts.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use swiftfill_core::{validate_shop_domain, ClientConfig, ShopSettings};

use super::{app_origin, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct CheckoutConfigParams {
    shop: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckoutConfigResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ClientConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(CheckoutConfigResponse {
            success: false,
            config: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

/// GET /api/checkout-config?shop=
///
/// A shop without stored settings still gets a config, reported disabled.
pub(super) async fn get_checkout_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CheckoutConfigParams>,
) -> Response {
    let Some(raw_shop) = params.shop.filter(|s| !s.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Shop parameter required");
    };
    let shop = match validate_shop_domain(&raw_shop) {
        Ok(shop) => shop,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let settings: Option<ShopSettings> =
        match swiftfill_db::get_shop_settings(&state.pool, &shop).await {
            Ok(row) => row.map(Into::into),
            Err(e) => {
                tracing::error!(shop = %shop, error = %e, "failed to load checkout config");
                return failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch configuration",
                );
            }
        };

    let origin = app_origin(&state.config, &headers);
    let config = ClientConfig::for_checkout(
        &shop,
        settings.as_ref(),
        format!(
            "{}/api/address-autocomplete/search",
            origin.trim_end_matches('/')
        ),
        state.config.min_query_chars,
        state.config.debounce_ms,
    );

    Json(CheckoutConfigResponse {
        success: true,
        config: Some(config),
        error: None,
    })
    .into_response()
}
