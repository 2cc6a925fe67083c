use serde::{Deserialize, Serialize};

use crate::settings::{SearchContext, ShopSettings};

/// Bootstrap configuration fetched by storefront and checkout scripts before
/// they enhance any address input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub enabled: bool,
    #[serde(default)]
    pub enabled_checkout: bool,
    #[serde(default)]
    pub enabled_profile: bool,
    /// Absolute URL of the search endpoint.
    pub api_endpoint: String,
    pub shop: String,
    pub min_characters: usize,
    /// Debounce between the last keystroke and the search, in milliseconds.
    pub debounce_delay: u64,
    pub context: SearchContext,
}

impl ClientConfig {
    /// Builds the checkout-context config for `shop` from its stored
    /// settings; a shop with no settings is reported as disabled.
    #[must_use]
    pub fn for_checkout(
        shop: &str,
        settings: Option<&ShopSettings>,
        api_endpoint: String,
        min_characters: usize,
        debounce_delay: u64,
    ) -> Self {
        Self {
            enabled: settings.is_some_and(|s| s.enabled),
            enabled_checkout: settings.is_some_and(|s| s.enabled_checkout),
            enabled_profile: settings.is_some_and(|s| s.enabled_profile),
            api_endpoint,
            shop: shop.to_string(),
            min_characters,
            debounce_delay,
            context: SearchContext::Checkout,
        }
    }

    /// `true` when the script should enhance inputs for its own context.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled
            && match self.context {
                SearchContext::Checkout => self.enabled_checkout,
                SearchContext::Profile => self.enabled_profile,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_report_disabled() {
        let config = ClientConfig::for_checkout(
            "demo.myshopify.com",
            None,
            "https://app.example.com/api/address-autocomplete/search".into(),
            3,
            300,
        );
        assert!(!config.enabled);
        assert!(!config.is_active());
    }

    #[test]
    fn serializes_in_camel_case() {
        let settings = ShopSettings::defaults_for("demo.myshopify.com");
        let config = ClientConfig::for_checkout(
            "demo.myshopify.com",
            Some(&settings),
            "https://app.example.com/api/address-autocomplete/search".into(),
            3,
            300,
        );
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["enabledCheckout"], true);
        assert_eq!(json["minCharacters"], 3);
        assert_eq!(json["debounceDelay"], 300);
        assert_eq!(json["context"], "checkout");
        assert!(config.is_active());
    }
}
