use thiserror::Error;

/// Errors from the network-facing half of the autofill crate.
///
/// Mapping and normalization never fail; only fetching suggestions and
/// discovering configuration do.
#[derive(Debug, Error)]
pub enum AutofillError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search endpoint returned HTTP {status}")]
    UnexpectedStatus {
        status: u16,
        /// The `error` field of the body, when the endpoint sent one.
        message: Option<String>,
    },

    #[error("malformed search response: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The endpoint answered `success: false`.
    #[error("search failed: {0}")]
    SearchFailed(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("no configuration available from {tried} candidate app URL(s)")]
    ConfigUnavailable { tried: usize },
}
