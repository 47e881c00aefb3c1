//! Feature switch configuration
//!
//! The document is a JSON object with a `features` map and a
//! `validationOptions` block. It is immutable once handed to the registry.

mod loader;
mod model;

pub use loader::*;
pub use model::*;
