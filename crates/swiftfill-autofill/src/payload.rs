//! Decoding of search endpoint bodies.
//!
//! `results` may hold suggestions the server already normalized, or raw
//! provider records that still need the normalizer. Both are accepted; a
//! record is treated as raw when it has a `primary` or `container` key.

use serde::Deserialize;
use serde_json::Value;
use swiftfill_core::NormalizedAddress;
use swiftfill_swiftcomplete::{normalize, RawProviderResult};

use crate::error::AutofillError;

/// The `{ results, success, error? }` body returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl SearchPayload {
    /// # Errors
    ///
    /// Returns [`AutofillError::Deserialize`] if `body` is not a JSON object
    /// of the expected shape.
    pub fn from_json(body: &str) -> Result<Self, AutofillError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Normalized suggestions in response order.
    ///
    /// Elements that are neither a raw nor a normalized record are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AutofillError::SearchFailed`] when the body reported
    /// `success: false`.
    pub fn into_addresses(self) -> Result<Vec<NormalizedAddress>, AutofillError> {
        if !self.success {
            return Err(AutofillError::SearchFailed(
                self.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }

        Ok(self.results.into_iter().filter_map(decode_result).collect())
    }
}

fn decode_result(value: Value) -> Option<NormalizedAddress> {
    let Value::Object(map) = &value else {
        tracing::debug!("skipping non-object search result");
        return None;
    };

    let decoded = if map.contains_key("primary") || map.contains_key("container") {
        serde_json::from_value::<RawProviderResult>(value).map(|raw| normalize(&raw))
    } else {
        serde_json::from_value::<NormalizedAddress>(value)
    };

    decoded
        .map_err(|e| tracing::debug!(error = %e, "skipping malformed search result"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normalized_results() {
        let payload = SearchPayload::from_json(
            r#"{"success": true, "results": [
                {"address": "Addison Ave", "city": "Niagara Falls", "state": "ON",
                 "zip": "L2J", "country": "CA", "fullText": "Addison Ave, Niagara Falls"}
            ]}"#,
        )
        .expect("parse");
        let addresses = payload.into_addresses().expect("addresses");
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].zip, "L2J");
        assert_eq!(addresses[0].full_text, "Addison Ave, Niagara Falls");
    }

    #[test]
    fn normalizes_raw_provider_results() {
        let payload = SearchPayload::from_json(
            r#"{"success": true, "results": [
                {"primary": {"text": "5th Ave"}, "secondary": {"text": "New York"},
                 "container": "V1;5th Ave|10001|New York", "countryCode": "US"}
            ]}"#,
        )
        .expect("parse");
        let addresses = payload.into_addresses().expect("addresses");
        assert_eq!(addresses[0].zip, "10001");
        assert_eq!(addresses[0].city, "New York");
        assert_eq!(addresses[0].country, "US");
    }

    #[test]
    fn mixed_and_malformed_results_are_filtered() {
        let payload = SearchPayload::from_json(
            r#"{"results": [
                "junk",
                {"container": "V1;Main St|Springfield|IL|62701"},
                {"address": 5},
                {"address": "Elm St"}
            ]}"#,
        )
        .expect("parse");
        let addresses = payload.into_addresses().expect("success defaults to true");
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].address, "Main St");
        assert_eq!(addresses[0].zip, "62701");
        assert_eq!(addresses[1].address, "Elm St");
    }

    #[test]
    fn failure_body_surfaces_error_message() {
        let payload =
            SearchPayload::from_json(r#"{"success": false, "error": "Service not enabled"}"#)
                .expect("parse");
        match payload.into_addresses() {
            Err(AutofillError::SearchFailed(msg)) => assert_eq!(msg, "Service not enabled"),
            other => panic!("expected SearchFailed, got {other:?}"),
        }
    }

    #[test]
    fn missing_results_is_empty() {
        let payload = SearchPayload::from_json(r#"{"success": true}"#).expect("parse");
        assert!(payload.into_addresses().expect("ok").is_empty());
    }
}
