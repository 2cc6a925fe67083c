//! Shopify shop-domain handling.

use std::sync::LazyLock;

use regex::Regex;

use crate::CoreError;

static SHOP_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*\.myshopify\.com$").expect("valid shop domain regex")
});

/// Validates and canonicalizes a `*.myshopify.com` shop domain.
///
/// Surrounding whitespace is trimmed and the result is lowercased, so
/// `" Demo-Store.myshopify.com "` becomes `"demo-store.myshopify.com"`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidShopDomain`] when the value is not a bare
/// myshopify hostname (schemes, paths, and custom domains are rejected).
pub fn validate_shop_domain(raw: &str) -> Result<String, CoreError> {
    let candidate = raw.trim().to_ascii_lowercase();
    if SHOP_DOMAIN_RE.is_match(&candidate) {
        Ok(candidate)
    } else {
        Err(CoreError::InvalidShopDomain(raw.trim().to_string()))
    }
}
