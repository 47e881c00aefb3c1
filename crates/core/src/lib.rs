//! Core library for feature switches
//!
//! This crate contains the runtime side of feature switches:
//! - Configuration model, loading and structural validation
//! - Resolution of per-feature enabled/disabled decisions for an environment
//! - The registry that owns one resolved snapshot per process

pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;

pub use config::{
    FeatureDefinition, FeatureSwitchConfig, ValidationOptions, Violation,
    DEFAULT_RESTRICTED_ENVIRONMENTS, DEFAULT_VALID_ENVIRONMENTS,
};
pub use error::{ConfigurationError, Error};
pub use registry::{
    get_feature_def, global, init, is_feature_enabled, FeatureSwitchSlot, FeatureSwitchSnapshot,
    FeatureSwitches, InitOptions,
};
pub use resolver::{resolve, FeatureEnabledMap};

pub type Result<T> = std::result::Result<T, Error>;
