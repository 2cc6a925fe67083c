//! HTTP client for the Swiftcomplete `swiftlookup` API.
//!
//! The API key travels as a query parameter, so request URLs are never
//! logged and transport errors are stripped of their URL before they leave
//! this module.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};

use crate::error::ProviderError;
use crate::retry::retry_with_backoff;
use crate::types::RawProviderResult;

const DEFAULT_BASE_URL: &str = "https://api.swiftcomplete.com/";
const LOOKUP_PATH: &str = "v1/swiftlookup/";

/// Parameters for a single autocomplete lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub text: String,
    /// Comma-separated result kinds, e.g. `"address,road"`.
    pub search_for: String,
    pub max_results: u32,
    /// Optional comma-separated ISO country filter, e.g. `"us,ca"`.
    pub countries: Option<String>,
}

impl LookupQuery {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_owned(),
            search_for: "address,road".to_owned(),
            max_results: 5,
            countries: None,
        }
    }

    #[must_use]
    pub fn search_for(mut self, search_for: &str) -> Self {
        search_for.clone_into(&mut self.search_for);
        self
    }

    #[must_use]
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn countries(mut self, countries: Option<&str>) -> Self {
        self.countries = countries.map(str::to_owned);
        self
    }
}

/// Client for the Swiftcomplete address lookup API.
///
/// Use [`SwiftcompleteClient::new`] for production or
/// [`SwiftcompleteClient::with_base_url`] to point at a mock server in tests.
pub struct SwiftcompleteClient {
    client: Client,
    lookup_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SwiftcompleteClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let lookup_url = Url::parse(&normalised)
            .and_then(|base| base.join(LOOKUP_PATH))
            .map_err(|_| ProviderError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            lookup_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches autocomplete suggestions for `query` using the shop's API key.
    ///
    /// A body that is valid JSON but not an array is treated as "no
    /// results"; array elements that are not objects are skipped.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] on HTTP 429 after retries.
    /// - [`ProviderError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProviderError::Http`] on network failure after retries.
    /// - [`ProviderError::Deserialize`] if the body is not JSON.
    pub async fn lookup(
        &self,
        api_key: &str,
        query: &LookupQuery,
    ) -> Result<Vec<RawProviderResult>, ProviderError> {
        let url = self.build_lookup_url(api_key, query);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .header(header::ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|e| ProviderError::Http(e.without_url()))?;

                let status = response.status();
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(ProviderError::RateLimited { retry_after_secs });
                }
                if !status.is_success() {
                    return Err(ProviderError::UnexpectedStatus {
                        status: status.as_u16(),
                    });
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| ProviderError::Http(e.without_url()))?;
                let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
                    ProviderError::Deserialize {
                        context: "swiftlookup response".to_owned(),
                        source: e,
                    }
                })?;

                Ok(parse_results(value))
            }
        })
        .await
    }

    fn build_lookup_url(&self, api_key: &str, query: &LookupQuery) -> Url {
        let mut url = self.lookup_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", api_key)
                .append_pair("text", &query.text)
                .append_pair("searchFor", &query.search_for)
                .append_pair("maxResults", &query.max_results.to_string());
            if let Some(countries) = query.countries.as_deref() {
                pairs.append_pair("countries", countries);
            }
        }
        url
    }
}

/// Decodes a `swiftlookup` body. A non-array body is no results; elements
/// that are not well-formed suggestion objects are skipped.
#[must_use]
pub fn parse_results(value: serde_json::Value) -> Vec<RawProviderResult> {
    let serde_json::Value::Array(items) = value else {
        tracing::debug!("provider returned a non-array body; treating as no results");
        return Vec::new();
    };

    items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|item| match serde_json::from_value::<RawProviderResult>(item) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed provider result");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SwiftcompleteClient {
        SwiftcompleteClient::with_base_url(base, 5, "swiftfill-test/0.1", 0, 0).expect("client")
    }

    #[test]
    fn lookup_url_encodes_parameters() {
        let url = client("https://api.example.com")
            .build_lookup_url("k&y", &LookupQuery::new(" 5th Ave ").countries(Some("us,ca")));
        assert_eq!(url.path(), "/v1/swiftlookup/");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("key".into(), "k&y".into())));
        assert!(pairs.contains(&("text".into(), "5th Ave".into())));
        assert!(pairs.contains(&("searchFor".into(), "address,road".into())));
        assert!(pairs.contains(&("maxResults".into(), "5".into())));
        assert!(pairs.contains(&("countries".into(), "us,ca".into())));
    }

    #[test]
    fn base_url_path_prefix_is_preserved() {
        let url = client("https://proxy.example.com/swift/")
            .build_lookup_url("k", &LookupQuery::new("abc"));
        assert_eq!(url.path(), "/swift/v1/swiftlookup/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = SwiftcompleteClient::with_base_url("not a url", 5, "ua", 0, 0);
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl(_))));
    }

    #[test]
    fn parse_results_skips_non_objects() {
        let value = serde_json::json!([
            {"primary": {"text": "A"}},
            "garbage",
            42,
            {"primary": {"text": "B"}}
        ]);
        let results = parse_results(value);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].primary_text(), "B");
    }

    #[test]
    fn parse_results_treats_object_body_as_empty() {
        assert!(parse_results(serde_json::json!({"error": "nope"})).is_empty());
    }
}
