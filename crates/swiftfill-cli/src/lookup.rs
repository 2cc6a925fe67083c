use anyhow::Context;
use swiftfill_core::NormalizedAddress;
use swiftfill_swiftcomplete::{normalize, parse_results, LookupQuery, SwiftcompleteClient};

const TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "swiftfill-cli/0.1";

/// Queries the provider once and prints normalized suggestions as JSON.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the lookup fails.
pub(crate) async fn run_lookup(
    base_url: &str,
    api_key: &str,
    text: &str,
    countries: Option<&str>,
    max_results: u32,
) -> anyhow::Result<()> {
    let client = SwiftcompleteClient::with_base_url(base_url, TIMEOUT_SECS, USER_AGENT, 1, 250)?;
    let query = LookupQuery::new(text)
        .max_results(max_results)
        .countries(countries);

    let raw = client.lookup(api_key, &query).await?;
    tracing::info!(results = raw.len(), "lookup complete");

    let addresses: Vec<NormalizedAddress> = raw.iter().map(normalize).collect();
    println!("{}", serde_json::to_string_pretty(&addresses)?);
    Ok(())
}

/// Normalizes a saved provider body.
///
/// # Errors
///
/// Returns an error if `body` is not JSON.
pub(crate) fn normalize_document(body: &str) -> anyhow::Result<Vec<NormalizedAddress>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("provider response is not valid JSON")?;
    Ok(parse_results(value).iter().map(normalize).collect())
}
