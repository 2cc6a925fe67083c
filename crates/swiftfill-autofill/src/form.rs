//! The form abstraction the field mapper writes through.
//!
//! Each delivery mechanism (storefront script, checkout pixel, UI extension)
//! supplies its own [`FormHandle`]. [`MemoryForm`] is a plain in-memory form
//! that can be loaded from JSON; the CLI and the tests use it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Input,
    Select,
}

/// Which attribute a candidate pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAttr {
    Name,
    Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: &str, text: &str) -> Self {
        Self {
            value: value.to_owned(),
            text: text.to_owned(),
        }
    }
}

/// A live form the mapper can search and mutate.
pub trait FormHandle {
    /// Opaque reference to one element of the form.
    type Field: Copy + Eq;

    /// First element of `kind`, in document order, whose `attr` contains
    /// `needle` as a substring.
    fn find(&self, kind: ElementKind, attr: MatchAttr, needle: &str) -> Option<Self::Field>;

    fn kind(&self, field: Self::Field) -> ElementKind;

    /// Options of a select element; empty for inputs.
    fn options(&self, field: Self::Field) -> Vec<SelectOption>;

    fn value(&self, field: Self::Field) -> String;

    fn set_value(&mut self, field: Self::Field, value: &str);

    /// Notifies listeners that `field` changed. Adapters must not raise an
    /// input event here; input handlers drive the autocomplete search.
    fn dispatch_change(&mut self, field: Self::Field);

    /// Name, or id when unnamed, for diagnostics.
    fn label(&self, field: Self::Field) -> String;
}

/// One element of a [`MemoryForm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(default = "default_kind")]
    pub kind: ElementKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Number of change notifications dispatched on this field.
    #[serde(default)]
    pub change_events: u32,
}

fn default_kind() -> ElementKind {
    ElementKind::Input
}

impl FormField {
    #[must_use]
    pub fn input(name: &str) -> Self {
        Self {
            kind: ElementKind::Input,
            name: name.to_owned(),
            id: String::new(),
            value: String::new(),
            options: Vec::new(),
            change_events: 0,
        }
    }

    #[must_use]
    pub fn select(name: &str, options: Vec<SelectOption>) -> Self {
        Self {
            kind: ElementKind::Select,
            options,
            ..Self::input(name)
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        id.clone_into(&mut self.id);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        value.clone_into(&mut self.value);
        self
    }

    fn attr(&self, attr: MatchAttr) -> &str {
        match attr {
            MatchAttr::Name => &self.name,
            MatchAttr::Id => &self.id,
        }
    }
}

/// An in-memory form; fields are addressed by their index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryForm {
    pub fields: Vec<FormField>,
}

impl MemoryForm {
    #[must_use]
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// Index of the first field with exactly this name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Value of the first field with exactly this name.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FormHandle for MemoryForm {
    type Field = usize;

    fn find(&self, kind: ElementKind, attr: MatchAttr, needle: &str) -> Option<usize> {
        self.fields.iter().position(|f| {
            f.kind == kind && {
                let haystack = f.attr(attr);
                !haystack.is_empty() && haystack.contains(needle)
            }
        })
    }

    fn kind(&self, field: usize) -> ElementKind {
        self.fields[field].kind
    }

    fn options(&self, field: usize) -> Vec<SelectOption> {
        self.fields[field].options.clone()
    }

    fn value(&self, field: usize) -> String {
        self.fields[field].value.clone()
    }

    fn set_value(&mut self, field: usize, value: &str) {
        value.clone_into(&mut self.fields[field].value);
    }

    fn dispatch_change(&mut self, field: usize) {
        self.fields[field].change_events += 1;
    }

    fn label(&self, field: usize) -> String {
        let f = &self.fields[field];
        if f.name.is_empty() {
            f.id.clone()
        } else {
            f.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_matches_substring_in_document_order() {
        let form = MemoryForm::new(vec![
            FormField::input("checkout[shipping_address][city]"),
            FormField::input("billing_city"),
        ]);
        assert_eq!(form.find(ElementKind::Input, MatchAttr::Name, "city"), Some(0));
        assert_eq!(form.find(ElementKind::Select, MatchAttr::Name, "city"), None);
    }

    #[test]
    fn find_by_id_ignores_fields_without_id() {
        let form = MemoryForm::new(vec![
            FormField::input("a"),
            FormField::input("b").with_id("postal-code"),
        ]);
        assert_eq!(form.find(ElementKind::Input, MatchAttr::Id, "postal"), Some(1));
        assert_eq!(form.find(ElementKind::Input, MatchAttr::Id, ""), Some(1));
    }

    #[test]
    fn deserializes_from_minimal_json() {
        let form: MemoryForm = serde_json::from_str(
            r#"{"fields": [
                {"name": "address[city]"},
                {"kind": "select", "id": "country", "options": [{"value": "US", "text": "United States"}]}
            ]}"#,
        )
        .expect("deserialize");
        assert_eq!(form.fields[0].kind, ElementKind::Input);
        assert_eq!(form.fields[1].kind, ElementKind::Select);
        assert_eq!(form.label(1), "country");
        assert_eq!(form.fields[1].options[0].text, "United States");
    }
}
