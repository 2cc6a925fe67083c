//! Normalization from raw Swiftcomplete results to [`NormalizedAddress`].
//!
//! The provider's `container` encoding is not a stable, documented format,
//! so everything here is best-effort: no input makes these functions fail,
//! and a component that cannot be recovered is left as an empty string.

use swiftfill_core::NormalizedAddress;

use crate::types::RawProviderResult;

/// Postal codes longer than this (in UTF-16 code units) are read as place names.
const MAX_POSTAL_CODE_LEN: usize = 10;

/// Structured components recovered from a `container` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFields {
    /// Street parsed from the `V1;<street>` head, when present and non-empty.
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Parses the provider's packed `container` string.
///
/// Two shapes are understood:
///
/// - four segments, `V1;<street>|<city>|<region>|<postal>[;lat;lng]`
/// - three segments, `V1;<street>|<a>|<b>[;lat;lng]`, where `<a>` is taken as
///   a postal code (and `<b>` as the city) if it contains an ASCII digit and
///   is at most ten characters long; otherwise `<a>` is the city and `<b>`
///   the region
///
/// Any other segment count yields [`ContainerFields::default`].
#[must_use]
pub fn parse_container(container: &str) -> ContainerFields {
    let parts: Vec<&str> = container.split('|').collect();

    match parts.as_slice() {
        [head, city, region, postal] => ContainerFields {
            street: street_from_head(head),
            city: (*city).to_owned(),
            state: (*region).to_owned(),
            zip: strip_coordinates(postal).to_owned(),
        },
        [head, second, third] => {
            let third = strip_coordinates(third).to_owned();
            let street = street_from_head(head);
            if looks_like_postal_code(second) {
                ContainerFields {
                    street,
                    city: third,
                    zip: (*second).to_owned(),
                    ..ContainerFields::default()
                }
            } else {
                ContainerFields {
                    street,
                    city: (*second).to_owned(),
                    state: third,
                    ..ContainerFields::default()
                }
            }
        }
        _ => ContainerFields::default(),
    }
}

/// Normalizes one provider suggestion. Never fails.
#[must_use]
pub fn normalize(raw: &RawProviderResult) -> NormalizedAddress {
    let primary = raw.primary_text();
    let secondary = raw.secondary_text();

    let ContainerFields {
        street,
        mut city,
        state,
        zip,
    } = raw
        .container
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(parse_container)
        .unwrap_or_default();

    if city.is_empty() {
        secondary.clone_into(&mut city);
    }

    NormalizedAddress {
        address: street.unwrap_or_else(|| primary.to_owned()),
        city,
        state,
        zip,
        country: raw.country_code().to_owned(),
        full_text: full_text(primary, secondary),
    }
}

/// `true` for short strings containing at least one digit.
///
/// Short alphabetic district names are always classified as places.
#[must_use]
pub fn looks_like_postal_code(segment: &str) -> bool {
    segment.chars().any(|c| c.is_ascii_digit())
        && segment.encode_utf16().count() <= MAX_POSTAL_CODE_LEN
}

/// `"V1;Addison Ave"` → `Some("Addison Ave")`; no marker or an empty street → `None`.
fn street_from_head(head: &str) -> Option<String> {
    head.split(';')
        .nth(1)
        .filter(|street| !street.is_empty())
        .map(str::to_owned)
}

/// `"L2J;43.128025;-79.091698"` → `"L2J"`.
fn strip_coordinates(segment: &str) -> &str {
    segment.split(';').next().unwrap_or_default()
}

/// `"{primary}, {secondary}"`, trimmed, with a dangling comma removed.
fn full_text(primary: &str, secondary: &str) -> String {
    let joined = format!("{primary}, {secondary}");
    let trimmed = joined.trim();
    trimmed.strip_suffix(',').unwrap_or(trimmed).to_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
