//! Per-shop autocomplete settings and the access policy derived from them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Page family a search request originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchContext {
    Checkout,
    Profile,
}

impl SearchContext {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchContext::Checkout => "checkout",
            SearchContext::Profile => "profile",
        }
    }
}

impl fmt::Display for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchContext {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "checkout" => Ok(SearchContext::Checkout),
            "profile" => Ok(SearchContext::Profile),
            other => Err(CoreError::UnknownContext(other.to_string())),
        }
    }
}

/// Why a shop's settings refuse a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// No settings row, or the master toggle is off.
    Disabled,
    ContextDisabled(SearchContext),
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDenied::Disabled => f.write_str("Service not enabled"),
            AccessDenied::ContextDisabled(context) => {
                write!(f, "Service not enabled for {context}")
            }
        }
    }
}

#[must_use]
pub fn default_charge_per_lookup() -> Decimal {
    Decimal::new(3, 2)
}

#[must_use]
pub fn default_max_monthly_charge() -> Decimal {
    Decimal::new(10_000, 2)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSettings {
    pub shop: String,
    pub api_key: String,
    pub enabled: bool,
    pub enabled_checkout: bool,
    pub enabled_profile: bool,
    pub charge_per_lookup: Decimal,
    pub max_monthly_charge: Decimal,
}

impl ShopSettings {
    /// Settings presented for a shop that has never saved any.
    #[must_use]
    pub fn defaults_for(shop: &str) -> Self {
        Self {
            shop: shop.to_string(),
            api_key: String::new(),
            enabled: true,
            enabled_checkout: true,
            enabled_profile: true,
            charge_per_lookup: default_charge_per_lookup(),
            max_monthly_charge: default_max_monthly_charge(),
        }
    }

    /// Decides whether a search from `context` may proceed.
    ///
    /// Without a context only the master toggle is consulted.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessDenied`] reason when the search must be refused.
    pub fn check_access(&self, context: Option<SearchContext>) -> Result<(), AccessDenied> {
        if !self.enabled {
            return Err(AccessDenied::Disabled);
        }
        match context {
            Some(SearchContext::Checkout) if !self.enabled_checkout => {
                Err(AccessDenied::ContextDisabled(SearchContext::Checkout))
            }
            Some(SearchContext::Profile) if !self.enabled_profile => {
                Err(AccessDenied::ContextDisabled(SearchContext::Profile))
            }
            _ => Ok(()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Settings submitted from the admin surface, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub enabled_checkout: bool,
    #[serde(default = "default_true")]
    pub enabled_profile: bool,
    pub charge_per_lookup: Option<Decimal>,
    pub max_monthly_charge: Option<Decimal>,
}

impl SettingsUpdate {
    /// Validates the update and produces the settings to persist for `shop`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSettings`] when the API key is blank or a
    /// charge amount is negative.
    pub fn validate(self, shop: &str) -> Result<ShopSettings, CoreError> {
        let api_key = self.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(CoreError::InvalidSettings("API Key is required".into()));
        }

        let charge_per_lookup = self
            .charge_per_lookup
            .unwrap_or_else(default_charge_per_lookup);
        let max_monthly_charge = self
            .max_monthly_charge
            .unwrap_or_else(default_max_monthly_charge);

        if charge_per_lookup.is_sign_negative() {
            return Err(CoreError::InvalidSettings(
                "charge_per_lookup must not be negative".into(),
            ));
        }
        if max_monthly_charge.is_sign_negative() {
            return Err(CoreError::InvalidSettings(
                "max_monthly_charge must not be negative".into(),
            ));
        }

        Ok(ShopSettings {
            shop: shop.to_string(),
            api_key,
            enabled: self.enabled,
            enabled_checkout: self.enabled_checkout,
            enabled_profile: self.enabled_profile,
            charge_per_lookup,
            max_monthly_charge,
        })
    }
}
