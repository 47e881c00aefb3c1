//! Configuration model definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Environments accepted when `validEnvironments` is not given
pub const DEFAULT_VALID_ENVIRONMENTS: [&str; 3] = ["development", "test", "production"];

/// Environments a feature may not be enabled in when `restrictedEnvironments` is not given
pub const DEFAULT_RESTRICTED_ENVIRONMENTS: [&str; 1] = ["production"];

/// Declaration of a single feature switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDefinition {
    /// Enable the feature in every environment, restricted ones included
    #[serde(default)]
    pub is_force_enabled: bool,

    /// Environments the feature is enabled in
    pub environments: Vec<String>,

    /// Free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FeatureDefinition {
    /// Create a feature enabled in the given environments
    pub fn new<I, S>(environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_force_enabled: false,
            environments: environments.into_iter().map(Into::into).collect(),
            note: None,
        }
    }

    /// Mark the feature as force-enabled
    pub fn force_enabled(mut self) -> Self {
        self.is_force_enabled = true;
        self
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Options controlling validation, both at runtime and in the static pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Querying an undeclared feature is an error rather than a warning
    #[serde(default = "default_true")]
    pub should_not_use_undefined_feature_switches: bool,

    /// Every declared feature must be referenced somewhere in the scanned files
    #[serde(default = "default_true")]
    pub should_use_all_defined_feature_switches: bool,

    /// Glob patterns selecting the files the static pass scans
    pub file_patterns: Vec<String>,

    /// Environment simulated by the static pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Whitelist of environment names. `None` disables the check.
    #[serde(default = "default_valid_environments")]
    pub valid_environments: Option<Vec<String>>,

    /// Environments where membership never enables a feature. `None` disables the check.
    #[serde(default = "default_restricted_environments")]
    pub restricted_environments: Option<Vec<String>>,
}

impl ValidationOptions {
    /// Create options with defaults for everything except the file patterns
    pub fn new<I, S>(file_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            should_not_use_undefined_feature_switches: true,
            should_use_all_defined_feature_switches: true,
            file_patterns: file_patterns.into_iter().map(Into::into).collect(),
            environment: None,
            valid_environments: default_valid_environments(),
            restricted_environments: default_restricted_environments(),
        }
    }

    /// Set the environment simulated by the static pass
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Replace the valid-environment list
    pub fn with_valid_environments(mut self, environments: Option<Vec<String>>) -> Self {
        self.valid_environments = environments;
        self
    }

    /// Replace the restricted-environment list
    pub fn with_restricted_environments(mut self, environments: Option<Vec<String>>) -> Self {
        self.restricted_environments = environments;
        self
    }

    /// Warn instead of failing on undeclared features
    pub fn allow_undefined(mut self) -> Self {
        self.should_not_use_undefined_feature_switches = false;
        self
    }

    /// Do not report declared features that are never used
    pub fn allow_unused(mut self) -> Self {
        self.should_use_all_defined_feature_switches = false;
        self
    }
}

/// A complete feature switch document.
///
/// Features keep the order they were declared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSwitchConfig {
    pub features: IndexMap<String, FeatureDefinition>,
    pub validation_options: ValidationOptions,
}

impl FeatureSwitchConfig {
    /// Create a configuration without features
    pub fn new(validation_options: ValidationOptions) -> Self {
        Self {
            features: IndexMap::new(),
            validation_options,
        }
    }

    /// Declare a feature
    pub fn with_feature(mut self, name: impl Into<String>, definition: FeatureDefinition) -> Self {
        self.features.insert(name.into(), definition);
        self
    }

    /// Whether a feature with this name is declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Look up a feature declaration
    pub fn feature(&self, name: &str) -> Option<&FeatureDefinition> {
        self.features.get(name)
    }

    /// Declared feature names in declaration order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }
}

fn default_true() -> bool {
    true
}

fn default_valid_environments() -> Option<Vec<String>> {
    Some(DEFAULT_VALID_ENVIRONMENTS.iter().map(|s| s.to_string()).collect())
}

fn default_restricted_environments() -> Option<Vec<String>> {
    Some(DEFAULT_RESTRICTED_ENVIRONMENTS.iter().map(|s| s.to_string()).collect())
}
