//! Error types for the core library

use std::path::PathBuf;
use thiserror::Error;

use crate::config::Violation;

/// Rule violations found while resolving a configuration for an environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Environment is not in the valid-environment list
    #[error(
        "{}Invalid environment: {environment}. Valid environments are: {}",
        feature_prefix(.feature),
        .valid.join(", ")
    )]
    InvalidEnvironment {
        environment: String,
        valid: Vec<String>,
        feature: Option<String>,
    },

    /// A non-forced feature lists the active environment, which is restricted
    #[error("Feature \"{feature}\": Cannot enable feature in restricted environment: {environment}")]
    RestrictedEnvironmentViolation { feature: String, environment: String },

    /// The restricted-environment list names an environment that is not valid
    #[error(
        "Restricted environment {environment} is not a valid environment. Valid environments are: {}",
        .valid.join(", ")
    )]
    MisconfiguredRestrictedList {
        environment: String,
        valid: Vec<String>,
    },
}

impl ConfigurationError {
    /// Name of the feature the error was raised for, if feature-scoped
    pub fn feature(&self) -> Option<&str> {
        match self {
            Self::InvalidEnvironment { feature, .. } => feature.as_deref(),
            Self::RestrictedEnvironmentViolation { feature, .. } => Some(feature),
            Self::MisconfiguredRestrictedList { .. } => None,
        }
    }

    /// The offending environment value
    pub fn environment(&self) -> &str {
        match self {
            Self::InvalidEnvironment { environment, .. }
            | Self::RestrictedEnvironmentViolation { environment, .. }
            | Self::MisconfiguredRestrictedList { environment, .. } => environment,
        }
    }
}

fn feature_prefix(feature: &Option<String>) -> String {
    match feature {
        Some(name) => format!("Feature \"{}\": ", name),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Feature switches have already been initialized")]
    AlreadyInitialized,

    #[error("Feature switches are not initialized. Call init() first")]
    NotInitialized,

    #[error("Feature \"{feature}\" is not defined in the feature switch configuration")]
    UndefinedFeature { feature: String },

    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {}", format_violations(.0))]
    InvalidConfig(Vec<Violation>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
