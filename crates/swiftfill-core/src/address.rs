use serde::{Deserialize, Serialize};

/// A provider-independent address suggestion.
///
/// Every field is a plain string; a component the provider did not supply is
/// the empty string rather than absent. `full_text` is the display fallback
/// and is derived from the provider's primary and secondary text, so it is
/// populated even when structured parsing found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedAddress {
    /// Street line, e.g. `"Addison Ave"`.
    pub address: String,
    pub city: String,
    /// Region, province, or state as the provider spelled it.
    pub state: String,
    pub zip: String,
    /// ISO 3166-1 alpha-2 code exactly as the provider returned it.
    pub country: String,
    #[serde(rename = "fullText")]
    pub full_text: String,
}

impl NormalizedAddress {
    /// Value written into the input that triggered the lookup: the street
    /// line, or the full text when no street was parsed.
    #[must_use]
    pub fn primary_line(&self) -> &str {
        if self.address.is_empty() {
            &self.full_text
        } else {
            &self.address
        }
    }

    /// Heading shown for a suggestion in the dropdown.
    #[must_use]
    pub fn display_line(&self) -> &str {
        match self.primary_line() {
            "" => "Unknown Address",
            line => line,
        }
    }

    /// Secondary dropdown line: the non-empty locality components joined
    /// with `", "`.
    #[must_use]
    pub fn locality_line(&self) -> String {
        [&self.city, &self.state, &self.zip, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
