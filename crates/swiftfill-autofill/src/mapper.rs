//! Field mapper: projects a [`NormalizedAddress`] onto a live form.
//!
//! The street line goes into the input the shopper typed in. Every other
//! component is located by attribute-substring search over a ranked list of
//! candidate patterns. Nothing here fails: a component with no matching
//! field is skipped and reported in the [`FillReport`].

use serde::Serialize;
use swiftfill_core::NormalizedAddress;

use crate::countries::CountryDirectory;
use crate::form::{ElementKind, FormHandle, MatchAttr, SelectOption};

/// Semantic address components the mapper fills, in fill order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKey {
    City,
    State,
    Zip,
    Country,
}

impl AddressKey {
    pub const ALL: [Self; 4] = [Self::City, Self::State, Self::Zip, Self::Country];

    /// Attribute substrings tried in priority order.
    #[must_use]
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::City => &["city", "address_city", "locality", "town"],
            Self::State => &[
                "province",
                "state",
                "region",
                "address_province",
                "address_state",
            ],
            Self::Zip => &["zip", "postal", "postcode", "address_zip", "address_postal"],
            Self::Country => &["country", "address_country", "country_code"],
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::Country => "country",
        }
    }

    fn value(self, address: &NormalizedAddress) -> &str {
        match self {
            Self::City => &address.city,
            Self::State => &address.state,
            Self::Zip => &address.zip,
            Self::Country => &address.country,
        }
    }
}

/// Why a non-empty component was not written anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No candidate pattern matched any element.
    NoField,
    /// Only country selects matched, and none offered the country.
    UnresolvedCountry,
    /// Only selects matched, and none had an option equal to the value.
    NoMatchingOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledField {
    pub key: AddressKey,
    /// Name or id of the element written.
    pub field: String,
    pub value: String,
    /// `false` when the element already held `value`.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedKey {
    pub key: AddressKey,
    pub reason: SkipReason,
}

/// Outcome of one fill, for logging and for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    /// Whether the originating input's value changed; always `false` for
    /// [`apply_to_form`].
    pub origin_changed: bool,
    pub filled: Vec<FilledField>,
    /// Components that were empty, and whose field was cleared.
    pub cleared: Vec<AddressKey>,
    pub skipped: Vec<SkippedKey>,
}

impl FillReport {
    #[must_use]
    pub fn filled_value(&self, key: AddressKey) -> Option<&str> {
        self.filled
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Writes the street line into `origin` and the remaining components into
/// the rest of `form`.
pub fn fill_selection<F: FormHandle>(
    form: &mut F,
    origin: F::Field,
    address: &NormalizedAddress,
) -> FillReport {
    let origin_changed = write_if_changed(form, origin, address.primary_line());
    let mut report = apply_to_form(form, address);
    report.origin_changed = origin_changed;
    report
}

/// Fills city, region, postal code and country fields from `address`.
///
/// For each component:
///
/// - an empty value clears the first matching text input;
/// - otherwise the candidate patterns are tried in order, name before id,
///   input before select, and the first element that can take the value is
///   written;
/// - a country select is resolved through [`resolve_country_option`]; a
///   select for any other component is written only when one of its options
///   equals the value.
///
/// A change notification is dispatched only on elements whose value
/// actually changed, so applying the same address twice is a no-op the
/// second time.
pub fn apply_to_form<F: FormHandle>(form: &mut F, address: &NormalizedAddress) -> FillReport {
    let mut report = FillReport::default();

    for key in AddressKey::ALL {
        let value = key.value(address).trim();

        if value.is_empty() {
            if let Some(field) = find_text_input(form, key) {
                if !form.value(field).is_empty() {
                    write_if_changed(form, field, "");
                    report.cleared.push(key);
                }
            }
            continue;
        }

        match fill_key(form, key, value) {
            Ok(filled) => {
                tracing::debug!(key = key.as_str(), field = %filled.field, value = %filled.value, "filled address field");
                report.filled.push(filled);
            }
            Err(reason) => {
                tracing::debug!(key = key.as_str(), value, ?reason, "address field skipped");
                report.skipped.push(SkippedKey { key, reason });
            }
        }
    }

    report
}

/// Option value to select for a two-letter country code.
///
/// An option whose value or text equals the English name wins; otherwise an
/// option whose value or text equals the upper-cased code. Codes missing from
/// the [`CountryDirectory`] go straight to the code match. Never guesses.
#[must_use]
pub fn resolve_country_option(options: &[SelectOption], code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();

    CountryDirectory::name(&code)
        .and_then(|name| find_option(options, name))
        .or_else(|| find_option(options, &code))
}

fn fill_key<F: FormHandle>(
    form: &mut F,
    key: AddressKey,
    value: &str,
) -> Result<FilledField, SkipReason> {
    let mut rejected: Vec<F::Field> = Vec::new();

    for pattern in key.candidates() {
        for attr in [MatchAttr::Name, MatchAttr::Id] {
            for kind in [ElementKind::Input, ElementKind::Select] {
                let Some(field) = form.find(kind, attr, pattern) else {
                    continue;
                };
                if rejected.contains(&field) {
                    continue;
                }

                let Some(resolved) = resolve_value(form, field, key, value) else {
                    rejected.push(field);
                    continue;
                };

                let changed = write_if_changed(form, field, &resolved);
                return Ok(FilledField {
                    key,
                    field: form.label(field),
                    value: resolved,
                    changed,
                });
            }
        }
    }

    if rejected.is_empty() {
        Err(SkipReason::NoField)
    } else if key == AddressKey::Country {
        Err(SkipReason::UnresolvedCountry)
    } else {
        Err(SkipReason::NoMatchingOption)
    }
}

fn resolve_value<F: FormHandle>(
    form: &F,
    field: F::Field,
    key: AddressKey,
    value: &str,
) -> Option<String> {
    match form.kind(field) {
        ElementKind::Input => Some(value.to_owned()),
        ElementKind::Select if key == AddressKey::Country => {
            resolve_country_option(&form.options(field), value)
        }
        ElementKind::Select => find_option(&form.options(field), value),
    }
}

fn find_option(options: &[SelectOption], wanted: &str) -> Option<String> {
    options
        .iter()
        .find(|o| o.value == wanted || o.text == wanted)
        .map(|o| o.value.clone())
}

fn find_text_input<F: FormHandle>(form: &F, key: AddressKey) -> Option<F::Field> {
    key.candidates().iter().find_map(|pattern| {
        form.find(ElementKind::Input, MatchAttr::Name, pattern)
            .or_else(|| form.find(ElementKind::Input, MatchAttr::Id, pattern))
    })
}

fn write_if_changed<F: FormHandle>(form: &mut F, field: F::Field, value: &str) -> bool {
    if form.value(field) == value {
        return false;
    }
    form.set_value(field, value);
    form.dispatch_change(field);
    true
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod tests;
