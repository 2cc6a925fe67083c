//! HTTP calls made by the delivery adapters: suggestion search and
//! bootstrap config discovery.

use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::Deserialize;
use swiftfill_core::{ClientConfig, NormalizedAddress, SearchContext};

use crate::error::AutofillError;
use crate::payload::SearchPayload;

const CONFIG_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);
const CONFIG_PATH: &str = "/api/checkout-config";

/// The app's search endpoint, bound to one shop and context.
pub struct SearchEndpoint {
    client: Client,
    endpoint: Url,
    shop: String,
    context: Option<SearchContext>,
}

impl SearchEndpoint {
    /// # Errors
    ///
    /// Returns [`AutofillError::InvalidUrl`] if `endpoint` does not parse, or
    /// [`AutofillError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        shop: &str,
        context: Option<SearchContext>,
        timeout: Duration,
    ) -> Result<Self, AutofillError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| AutofillError::InvalidUrl(endpoint.to_owned()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            shop: shop.to_owned(),
            context,
        })
    }

    /// Builds an endpoint from a discovered [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// See [`SearchEndpoint::new`].
    pub fn from_config(config: &ClientConfig, timeout: Duration) -> Result<Self, AutofillError> {
        Self::new(
            &config.api_endpoint,
            &config.shop,
            Some(config.context),
            timeout,
        )
    }

    /// Fetches suggestions for `query`, normalizing raw provider records.
    ///
    /// # Errors
    ///
    /// - [`AutofillError::Http`] on transport failure.
    /// - [`AutofillError::UnexpectedStatus`] on a non-2xx status, carrying
    ///   the body's `error` message when present.
    /// - [`AutofillError::Deserialize`] on a malformed body.
    /// - [`AutofillError::SearchFailed`] when the body says `success: false`.
    pub async fn search(&self, query: &str) -> Result<Vec<NormalizedAddress>, AutofillError> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("shop", &self.shop).append_pair("q", query);
            if let Some(context) = self.context {
                pairs.append_pair("context", context.as_str());
            }
        }

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<SearchPayload>(&body)
                .ok()
                .and_then(|p| p.error);
            return Err(AutofillError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        SearchPayload::from_json(&body)?.into_addresses()
    }
}

#[derive(Debug, Deserialize)]
struct ConfigEnvelope {
    #[serde(default)]
    success: bool,
    config: Option<ClientConfig>,
}

/// Tries each candidate app URL in order and returns the first
/// configuration served.
///
/// Each attempt has a five second timeout. Unreachable hosts, non-2xx
/// answers, and bodies without `success: true` move on to the next
/// candidate.
///
/// # Errors
///
/// Returns [`AutofillError::ConfigUnavailable`] when no candidate answers,
/// or [`AutofillError::Http`] if the HTTP client cannot be built.
pub async fn discover_config(
    candidates: &[String],
    shop: &str,
) -> Result<ClientConfig, AutofillError> {
    let client = Client::builder()
        .timeout(CONFIG_DISCOVERY_TIMEOUT)
        .build()?;

    for base in candidates {
        match fetch_config(&client, base, shop).await {
            Ok(Some(config)) => {
                tracing::info!(app_url = %base, "client config loaded");
                return Ok(config);
            }
            Ok(None) => tracing::debug!(app_url = %base, "no config at candidate"),
            Err(e) => tracing::debug!(app_url = %base, error = %e, "config candidate failed"),
        }
    }

    tracing::warn!(tried = candidates.len(), shop, "no candidate app URL served a config");
    Err(AutofillError::ConfigUnavailable {
        tried: candidates.len(),
    })
}

async fn fetch_config(
    client: &Client,
    base: &str,
    shop: &str,
) -> Result<Option<ClientConfig>, AutofillError> {
    let raw = format!("{}{CONFIG_PATH}", base.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|_| AutofillError::InvalidUrl(raw.clone()))?;
    url.query_pairs_mut().append_pair("shop", shop);

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let envelope: ConfigEnvelope = serde_json::from_str(&response.text().await?)?;
    Ok(envelope.config.filter(|_| envelope.success))
}

/// Ordered, de-duplicated list of app origins to try for config discovery:
/// the manually configured URL, then the origin of every script served from
/// an `/apps/` path, then the page's own origin (the app proxy).
#[must_use]
pub fn candidate_app_urls(
    manual: Option<&str>,
    script_srcs: &[&str],
    page_origin: &str,
) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let mut push = |url: String| {
        if !url.is_empty() && !urls.contains(&url) {
            urls.push(url);
        }
    };

    if let Some(manual) = manual {
        push(manual.trim().trim_end_matches('/').to_owned());
    }

    for src in script_srcs.iter().filter(|src| src.contains("/apps/")) {
        if let Ok(url) = Url::parse(src) {
            push(url.origin().ascii_serialization());
        }
    }

    push(page_origin.trim_end_matches('/').to_owned());
    urls
}
