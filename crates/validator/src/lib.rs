//! Feature switch validator
//!
//! This crate scans source files for `isFeatureEnabled("...")` call sites and
//! cross-checks the names found against the declared feature switches.

mod error;
mod files;
mod pass;
mod scanner;

pub use error::{Result, ValidatorError};
pub use files::resolve_file_patterns;
pub use pass::{validate, validate_paths, Diagnostic, ValidationReport, Validator};
pub use scanner::{find_feature_usages, FeatureUsage, FeatureUsages};
