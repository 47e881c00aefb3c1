//! Feature switch registry
//!
//! A [`FeatureSwitchSlot`] holds at most one resolved [`FeatureSwitches`]
//! snapshot. The handle can be threaded through the application; call sites
//! that cannot take a handle go through the process-wide slot behind
//! [`init`], [`is_feature_enabled`] and [`get_feature_def`].
//!
//! `init` is meant to be called once, from a single startup path. Racing
//! calls are serialized by the slot: exactly one snapshot is stored and the
//! other callers see [`Error::AlreadyInitialized`].

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use crate::config::{FeatureDefinition, FeatureSwitchConfig};
use crate::error::Error;
use crate::resolver::{resolve, FeatureEnabledMap};
use crate::Result;

/// Options for [`FeatureSwitchSlot::init`]
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Turn a repeated `init` into a logged warning instead of an error
    pub ignore_multiple_init: bool,
}

impl InitOptions {
    pub fn ignore_multiple_init(mut self) -> Self {
        self.ignore_multiple_init = true;
        self
    }
}

/// Serializable view of a resolved registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSwitchSnapshot {
    pub environment: String,
    pub enabled_features: Vec<String>,
    pub disabled_features: Vec<String>,
}

/// Resolved feature switches for one environment.
///
/// Cheap to clone; all clones share the same immutable state.
#[derive(Debug, Clone)]
pub struct FeatureSwitches {
    inner: Arc<FeatureSwitchesInner>,
}

#[derive(Debug)]
struct FeatureSwitchesInner {
    environment: String,
    config: FeatureSwitchConfig,
    enabled: FeatureEnabledMap,
}

impl FeatureSwitches {
    fn build(environment: String, config: FeatureSwitchConfig) -> Result<Self> {
        let enabled = resolve(&config, &environment)?;
        let switches = Self {
            inner: Arc::new(FeatureSwitchesInner {
                environment,
                config,
                enabled,
            }),
        };

        let snapshot = switches.snapshot();
        info!("Current Environment: {}", snapshot.environment);
        info!("Enabled Features: {:?}", snapshot.enabled_features);
        info!("Disabled Features: {:?}", snapshot.disabled_features);

        Ok(switches)
    }

    /// Environment the switches were resolved for
    pub fn environment(&self) -> &str {
        &self.inner.environment
    }

    /// The configuration the switches were resolved from
    pub fn config(&self) -> &FeatureSwitchConfig {
        &self.inner.config
    }

    /// Enabled/disabled decision per declared feature
    pub fn enabled_map(&self) -> &FeatureEnabledMap {
        &self.inner.enabled
    }

    /// Check whether a feature is enabled.
    ///
    /// An undeclared feature is an error when
    /// `shouldNotUseUndefinedFeatureSwitches` is set, otherwise it is
    /// reported as disabled with a warning.
    pub fn is_feature_enabled(&self, name: &str) -> Result<bool> {
        match self.inner.enabled.get(name) {
            Some(true) => {
                info!("Feature \"{}\" is used.", name);
                Ok(true)
            }
            Some(false) => {
                info!("Feature \"{}\" is skipped.", name);
                Ok(false)
            }
            None => {
                let err = Error::UndefinedFeature {
                    feature: name.to_string(),
                };
                if self
                    .inner
                    .config
                    .validation_options
                    .should_not_use_undefined_feature_switches
                {
                    return Err(err);
                }
                warn!("{}", err);
                Ok(false)
            }
        }
    }

    /// Declaration of a feature, `None` when it is not declared
    pub fn get_feature_def(&self, name: &str) -> Option<&FeatureDefinition> {
        self.inner.config.feature(name)
    }

    /// Enabled and disabled feature names, in declaration order
    pub fn snapshot(&self) -> FeatureSwitchSnapshot {
        let (enabled, disabled): (Vec<_>, Vec<_>) =
            self.inner.enabled.iter().partition(|(_, enabled)| **enabled);

        FeatureSwitchSnapshot {
            environment: self.inner.environment.clone(),
            enabled_features: enabled.into_iter().map(|(name, _)| name.clone()).collect(),
            disabled_features: disabled.into_iter().map(|(name, _)| name.clone()).collect(),
        }
    }
}

/// Write-once holder for a [`FeatureSwitches`] snapshot
#[derive(Debug, Default)]
pub struct FeatureSwitchSlot {
    cell: OnceLock<FeatureSwitches>,
}

impl FeatureSwitchSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Resolve `config` for `environment` and store the result.
    ///
    /// A second call fails with [`Error::AlreadyInitialized`], or, with
    /// `ignore_multiple_init`, logs a warning and returns the stored
    /// snapshot unchanged.
    pub fn init(
        &self,
        environment: impl Into<String>,
        config: FeatureSwitchConfig,
        options: InitOptions,
    ) -> Result<FeatureSwitches> {
        if let Some(existing) = self.cell.get() {
            return already_initialized(existing, options);
        }

        let switches = FeatureSwitches::build(environment.into(), config)?;
        match self.cell.set(switches.clone()) {
            Ok(()) => Ok(switches),
            Err(_) => match self.cell.get() {
                Some(existing) => already_initialized(existing, options),
                None => Err(Error::AlreadyInitialized),
            },
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The stored snapshot
    pub fn get(&self) -> Result<&FeatureSwitches> {
        self.cell.get().ok_or(Error::NotInitialized)
    }

    pub fn is_feature_enabled(&self, name: &str) -> Result<bool> {
        self.get()?.is_feature_enabled(name)
    }

    pub fn get_feature_def(&self, name: &str) -> Result<Option<&FeatureDefinition>> {
        Ok(self.get()?.get_feature_def(name))
    }
}

fn already_initialized(existing: &FeatureSwitches, options: InitOptions) -> Result<FeatureSwitches> {
    if options.ignore_multiple_init {
        warn!("{}", Error::AlreadyInitialized);
        return Ok(existing.clone());
    }
    Err(Error::AlreadyInitialized)
}

static GLOBAL: FeatureSwitchSlot = FeatureSwitchSlot::new();

/// Initialize the process-wide feature switches
pub fn init(
    environment: impl Into<String>,
    config: FeatureSwitchConfig,
    options: InitOptions,
) -> Result<FeatureSwitches> {
    GLOBAL.init(environment, config, options)
}

/// The process-wide feature switches
pub fn global() -> Result<&'static FeatureSwitches> {
    GLOBAL.get()
}

/// Check a feature against the process-wide feature switches
pub fn is_feature_enabled(name: &str) -> Result<bool> {
    GLOBAL.is_feature_enabled(name)
}

/// Look up a declaration in the process-wide feature switches
pub fn get_feature_def(name: &str) -> Result<Option<&'static FeatureDefinition>> {
    GLOBAL.get_feature_def(name)
}
