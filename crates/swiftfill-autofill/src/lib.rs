//! Client-side address autofill: projecting a chosen suggestion onto a form,
//! the per-input autocomplete state machine, and the HTTP calls the
//! storefront and checkout adapters make.

pub mod countries;
pub mod error;
pub mod form;
pub mod mapper;
pub mod payload;
pub mod registry;
pub mod remote;
pub mod session;

pub use countries::CountryDirectory;
pub use error::AutofillError;
pub use form::{ElementKind, FormField, FormHandle, MatchAttr, MemoryForm, SelectOption};
pub use mapper::{apply_to_form, fill_selection, AddressKey, FillReport, SkipReason};
pub use payload::SearchPayload;
pub use registry::SessionRegistry;
pub use remote::{candidate_app_urls, discover_config, SearchEndpoint};
pub use session::{AutocompleteSession, Effect, Key, SessionConfig, SessionState};
