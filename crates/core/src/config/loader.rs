//! Loading and structural validation of configuration documents

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::Error;
use crate::Result;

use super::model::FeatureSwitchConfig;

/// One structural problem found in a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FeatureSwitchConfig {
    /// Parse a JSON document and validate its structure
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Loading feature switch configuration from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// Check the constraints serde cannot express.
    ///
    /// Returns every violation found; an empty list means the document is usable.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let options = &self.validation_options;

        if options.file_patterns.is_empty() {
            violations.push(Violation::new(
                "validationOptions.filePatterns",
                "must contain at least 1 element",
            ));
        }
        for (index, pattern) in options.file_patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                violations.push(Violation::new(
                    format!("validationOptions.filePatterns[{}]", index),
                    "must not be blank",
                ));
            }
        }

        if let Some(valid) = &options.valid_environments {
            if valid.is_empty() {
                violations.push(Violation::new(
                    "validationOptions.validEnvironments",
                    "must contain at least 1 element",
                ));
            }
        }

        if self.features.keys().any(|name| name.trim().is_empty()) {
            violations.push(Violation::new(
                "features",
                "feature names must not be blank",
            ));
        }

        violations
    }

    fn ensure_valid(&self) -> Result<()> {
        let violations = self.validate();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConfig(violations))
        }
    }
}
