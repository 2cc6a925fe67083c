//! Offline form filling, for checking field mappings against a captured form.

use anyhow::Context;
use serde::Serialize;
use swiftfill_autofill::{
    apply_to_form, fill_selection, CountryDirectory, FillReport, MemoryForm, SearchPayload,
};
use swiftfill_core::NormalizedAddress;

#[derive(Debug, Serialize)]
pub(crate) struct AutofillOutput {
    pub address: NormalizedAddress,
    pub form: MemoryForm,
    pub report: FillReport,
}

/// Applies suggestion `pick` from a search body to a form description.
///
/// With `origin`, the street line is written into that input first, as if the
/// suggestion had been picked from it.
///
/// # Errors
///
/// Returns an error if either document is malformed, the search body
/// reported failure, `pick` is out of range, or `origin` names no field.
pub(crate) fn autofill_document(
    results: &str,
    form: &str,
    pick: usize,
    origin: Option<&str>,
) -> anyhow::Result<AutofillOutput> {
    let addresses = SearchPayload::from_json(results)
        .context("search response is malformed")?
        .into_addresses()?;
    let count = addresses.len();
    let address = addresses
        .into_iter()
        .nth(pick)
        .ok_or_else(|| anyhow::anyhow!("suggestion {pick} requested but only {count} present"))?;

    let mut form: MemoryForm =
        serde_json::from_str(form).context("form description is malformed")?;

    let report = match origin {
        Some(name) => {
            let field = form
                .position(name)
                .ok_or_else(|| anyhow::anyhow!("no field named '{name}' in form"))?;
            fill_selection(&mut form, field, &address)
        }
        None => apply_to_form(&mut form, &address),
    };

    Ok(AutofillOutput {
        address,
        form,
        report,
    })
}

/// Prints one country's name, or every code and name.
///
/// # Errors
///
/// Returns an error when `code` is not in the directory.
pub(crate) fn run_countries(code: Option<&str>) -> anyhow::Result<()> {
    match code {
        Some(code) => {
            let name = CountryDirectory::name(code)
                .ok_or_else(|| anyhow::anyhow!("unknown country code '{code}'"))?;
            println!("{name}");
        }
        None => {
            for (code, name) in CountryDirectory::iter() {
                println!("{code}  {name}");
            }
        }
    }
    Ok(())
}
