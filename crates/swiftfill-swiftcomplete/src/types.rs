//! Response types for the Swiftcomplete `swiftlookup` endpoint.
//!
//! ## Observed shape
//!
//! The endpoint returns a bare JSON array of suggestions:
//!
//! ```json
//! [{
//!   "primary":   { "text": "Addison Ave" },
//!   "secondary": { "text": "Niagara Falls" },
//!   "container": "V1;Addison Ave|Niagara Falls|ON|L2J;43.128025;-79.091698",
//!   "countryCode": "CA"
//! }]
//! ```
//!
//! ### `container`
//! An undocumented packed string. The leading `V1;` is a version marker and
//! latitude/longitude may trail the last segment after `;`. The segment count
//! varies by locale; see [`crate::normalize`] for how it is interpreted.
//!
//! ### Nullability
//! Any of the four fields may be missing or `null` in practice (road-level
//! results often have no container). Every field is therefore optional and
//! the accessors return `""` for absent text.

use serde::Deserialize;

/// A `{ "text": ... }` wrapper used for the primary and secondary lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderText {
    #[serde(default)]
    pub text: Option<String>,
}

/// One untrusted suggestion exactly as the provider sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawProviderResult {
    pub primary: Option<ProviderText>,
    pub secondary: Option<ProviderText>,
    pub container: Option<String>,
    pub country_code: Option<String>,
}

impl RawProviderResult {
    /// Builds a result from plain strings; mostly useful for fixtures.
    #[must_use]
    pub fn new(primary: &str, secondary: &str, container: Option<&str>, country_code: &str) -> Self {
        Self {
            primary: Some(ProviderText {
                text: Some(primary.to_owned()),
            }),
            secondary: Some(ProviderText {
                text: Some(secondary.to_owned()),
            }),
            container: container.map(str::to_owned),
            country_code: Some(country_code.to_owned()),
        }
    }

    #[must_use]
    pub fn primary_text(&self) -> &str {
        text_of(self.primary.as_ref())
    }

    #[must_use]
    pub fn secondary_text(&self) -> &str {
        text_of(self.secondary.as_ref())
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        self.country_code.as_deref().unwrap_or("")
    }
}

fn text_of(field: Option<&ProviderText>) -> &str {
    field.and_then(|t| t.text.as_deref()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_record() {
        let raw: RawProviderResult = serde_json::from_str(
            r#"{
                "primary": {"text": "Addison Ave"},
                "secondary": {"text": "Niagara Falls"},
                "container": "V1;Addison Ave|Niagara Falls|ON|L2J;43.1;-79.0",
                "countryCode": "CA"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(raw.primary_text(), "Addison Ave");
        assert_eq!(raw.secondary_text(), "Niagara Falls");
        assert_eq!(raw.country_code(), "CA");
        assert!(raw.container.is_some());
    }

    #[test]
    fn tolerates_nulls_and_missing_fields() {
        let raw: RawProviderResult =
            serde_json::from_str(r#"{"primary": null, "secondary": {"text": null}}"#)
                .expect("deserialize");
        assert_eq!(raw.primary_text(), "");
        assert_eq!(raw.secondary_text(), "");
        assert_eq!(raw.country_code(), "");
        assert!(raw.container.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw: RawProviderResult = serde_json::from_str(
            r#"{"primary": {"text": "A", "highlights": [0, 1]}, "type": "address"}"#,
        )
        .expect("deserialize");
        assert_eq!(raw.primary_text(), "A");
    }
}
