//! Form data transformation for media entities
//!
//! The bridge between a submitted form field and the provider system:
//! [`ProviderDataTransformer`] decides whether a value is already a
//! resolved media entity or raw input that must be routed through the
//! provider named on it.

mod transformer;

pub use transformer::{FormValue, ProviderDataTransformer, TransformError, TransformerOptions};
