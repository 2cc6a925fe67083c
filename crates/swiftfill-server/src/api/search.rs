//! Public address search proxy.
//!
//! Storefront and checkout scripts call this with `shop`, `q` and an
//! optional `context`. The shop's stored API key is used to query the
//! provider, results are normalized here, and one usage record is written
//! per provider call.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use swiftfill_core::{validate_shop_domain, NormalizedAddress, SearchContext, ShopSettings};
use swiftfill_db::NewAddressLookup;
use swiftfill_swiftcomplete::{normalize, LookupQuery};

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    shop: Option<String>,
    q: Option<String>,
    context: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    results: Vec<NormalizedAddress>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// A refusal in the `{results: [], success: false, error}` shape scripts
/// expect.
#[derive(Debug)]
pub(super) struct SearchError {
    status: StatusCode,
    message: String,
}

impl SearchError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = SearchResponse {
            results: Vec::new(),
            success: false,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// GET|POST /api/address-autocomplete/search
pub(super) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, SearchError> {
    run_search(&state, params, None).await
}

/// GET /apps/address-autocomplete/search, reached through the storefront
/// app proxy; context defaults to checkout.
pub(super) async fn app_proxy_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, SearchError> {
    run_search(&state, params, Some(SearchContext::Checkout)).await
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
    default_context: Option<SearchContext>,
) -> Result<Json<SearchResponse>, SearchError> {
    let (shop, query, context) =
        validate_params(params, state.config.min_query_chars, default_context)?;

    let settings: ShopSettings = swiftfill_db::get_shop_settings(&state.pool, &shop)
        .await
        .map_err(|e| {
            tracing::error!(shop = %shop, error = %e, "failed to load shop settings");
            SearchError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch addresses")
        })?
        .ok_or_else(|| SearchError::new(StatusCode::FORBIDDEN, "Service not enabled"))?
        .into();

    settings
        .check_access(context)
        .map_err(|denied| SearchError::new(StatusCode::FORBIDDEN, denied.to_string()))?;

    let lookup = LookupQuery::new(&query)
        .search_for(&state.config.provider_search_for)
        .max_results(state.config.provider_max_results);
    let raw = state
        .provider
        .lookup(&settings.api_key, &lookup)
        .await
        .map_err(|e| {
            tracing::error!(shop = %shop, error = %e, "provider lookup failed");
            SearchError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch addresses")
        })?;

    record_usage(state, &settings, &query, context, raw.len()).await;

    let results: Vec<NormalizedAddress> = raw.iter().map(normalize).collect();
    tracing::debug!(shop = %shop, results = results.len(), "address search served");

    Ok(Json(SearchResponse {
        results,
        success: true,
        error: None,
    }))
}

/// Returns `(shop, trimmed query, context)` or the 400 to send.
fn validate_params(
    params: SearchParams,
    min_query_chars: usize,
    default_context: Option<SearchContext>,
) -> Result<(String, String, Option<SearchContext>), SearchError> {
    let raw_shop = params
        .shop
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SearchError::new(StatusCode::BAD_REQUEST, "Shop parameter required"))?;
    let shop = validate_shop_domain(&raw_shop)
        .map_err(|e| SearchError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.chars().count() < min_query_chars {
        return Err(SearchError::new(StatusCode::BAD_REQUEST, "Query too short"));
    }

    let context = match params.context.as_deref().map(str::trim) {
        None | Some("") => default_context,
        Some(raw) => Some(
            raw.parse::<SearchContext>()
                .map_err(|e| SearchError::new(StatusCode::BAD_REQUEST, e.to_string()))?,
        ),
    };

    Ok((shop, query.to_owned(), context))
}

/// Usage bookkeeping never fails the search; errors are logged.
async fn record_usage(
    state: &AppState,
    settings: &ShopSettings,
    query: &str,
    context: Option<SearchContext>,
    result_count: usize,
) {
    let lookup = NewAddressLookup {
        shop: &settings.shop,
        query,
        context,
        result_count: i32::try_from(result_count).unwrap_or(i32::MAX),
        charge_amount: settings.charge_per_lookup,
    };

    if let Err(e) = swiftfill_db::insert_address_lookup(&state.pool, &lookup).await {
        tracing::warn!(shop = %settings.shop, error = %e, "failed to record address lookup");
    }
    if let Err(e) = swiftfill_db::record_settings_usage(&state.pool, &settings.shop).await {
        tracing::warn!(shop = %settings.shop, error = %e, "failed to bump usage counter");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(shop: Option<&str>, q: Option<&str>, context: Option<&str>) -> SearchParams {
        SearchParams {
            shop: shop.map(str::to_owned),
            q: q.map(str::to_owned),
            context: context.map(str::to_owned),
        }
    }

    fn rejection(result: Result<(String, String, Option<SearchContext>), SearchError>) -> String {
        match result {
            Err(e) => {
                assert_eq!(e.status, StatusCode::BAD_REQUEST);
                e.message
            }
            Ok(ok) => panic!("expected rejection, got {ok:?}"),
        }
    }

    #[test]
    fn missing_shop_is_rejected_first() {
        let msg = rejection(validate_params(params(None, Some("a"), None), 3, None));
        assert_eq!(msg, "Shop parameter required");
        let msg = rejection(validate_params(params(Some("  "), None, None), 3, None));
        assert_eq!(msg, "Shop parameter required");
    }

    #[test]
    fn short_query_is_rejected_after_trimming() {
        let msg = rejection(validate_params(
            params(Some("demo.myshopify.com"), Some("  ab  "), None),
            3,
            None,
        ));
        assert_eq!(msg, "Query too short");
    }

    #[test]
    fn unknown_context_is_rejected() {
        let msg = rejection(validate_params(
            params(Some("demo.myshopify.com"), Some("main"), Some("admin")),
            3,
            None,
        ));
        assert!(msg.contains("admin"));
    }

    #[test]
    fn valid_params_are_normalized() {
        let (shop, query, context) = validate_params(
            params(Some(" Demo.MyShopify.com "), Some("  5th Ave "), Some("profile")),
            3,
            None,
        )
        .expect("valid");
        assert_eq!(shop, "demo.myshopify.com");
        assert_eq!(query, "5th Ave");
        assert_eq!(context, Some(SearchContext::Profile));
    }

    #[test]
    fn default_context_applies_only_when_absent() {
        let (_, _, context) = validate_params(
            params(Some("demo.myshopify.com"), Some("main"), None),
            3,
            Some(SearchContext::Checkout),
        )
        .expect("valid");
        assert_eq!(context, Some(SearchContext::Checkout));

        let (_, _, context) = validate_params(
            params(Some("demo.myshopify.com"), Some("main"), Some("profile")),
            3,
            Some(SearchContext::Checkout),
        )
        .expect("valid");
        assert_eq!(context, Some(SearchContext::Profile));
    }

    #[test]
    fn error_body_has_empty_results() {
        let body = serde_json::to_value(SearchResponse {
            results: Vec::new(),
            success: false,
            error: Some("Query too short".into()),
        })
        .expect("serialize");
        assert_eq!(body["results"], serde_json::json!([]));
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Query too short");
    }
}
