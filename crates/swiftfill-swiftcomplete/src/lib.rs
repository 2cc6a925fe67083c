pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::{parse_results, LookupQuery, SwiftcompleteClient};
pub use error::ProviderError;
pub use normalize::{normalize, parse_container, ContainerFields};
pub use types::{ProviderText, RawProviderResult};
