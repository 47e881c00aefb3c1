//! Resolution of feature switches for an environment
//!
//! Precedence, per feature:
//! 1. every listed environment must be valid
//! 2. listing the active environment enables the feature, unless that
//!    environment is restricted (an error, not a silent disable)
//! 3. `isForceEnabled` enables the feature regardless

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::config::FeatureSwitchConfig;
use crate::error::ConfigurationError;

/// Final enabled/disabled decision per declared feature, in declaration order
pub type FeatureEnabledMap = IndexMap<String, bool>;

struct EnvironmentRules<'a> {
    valid: Option<(&'a [String], HashSet<&'a str>)>,
    restricted: Option<HashSet<&'a str>>,
}

impl<'a> EnvironmentRules<'a> {
    fn new(config: &'a FeatureSwitchConfig) -> Self {
        let options = &config.validation_options;
        Self {
            valid: options
                .valid_environments
                .as_deref()
                .map(|list| (list, list.iter().map(String::as_str).collect())),
            restricted: options
                .restricted_environments
                .as_ref()
                .map(|list| list.iter().map(String::as_str).collect()),
        }
    }

    fn is_valid(&self, environment: &str) -> bool {
        match &self.valid {
            Some((_, set)) => set.contains(environment),
            None => true,
        }
    }

    fn is_restricted(&self, environment: &str) -> bool {
        self.restricted
            .as_ref()
            .is_some_and(|set| set.contains(environment))
    }

    fn valid_list(&self) -> Vec<String> {
        self.valid
            .as_ref()
            .map(|(list, _)| list.to_vec())
            .unwrap_or_default()
    }

    fn assert_valid(
        &self,
        environment: &str,
        feature: Option<&str>,
    ) -> Result<(), ConfigurationError> {
        if self.is_valid(environment) {
            return Ok(());
        }
        Err(ConfigurationError::InvalidEnvironment {
            environment: environment.to_string(),
            valid: self.valid_list(),
            feature: feature.map(str::to_string),
        })
    }
}

/// Compute the enabled map for `environment`.
///
/// Fails on the first rule violation; no partial map is produced.
pub fn resolve(
    config: &FeatureSwitchConfig,
    environment: &str,
) -> Result<FeatureEnabledMap, ConfigurationError> {
    let rules = EnvironmentRules::new(config);

    rules.assert_valid(environment, None)?;

    if let Some(restricted) = &config.validation_options.restricted_environments {
        for restricted_env in restricted {
            if !rules.is_valid(restricted_env) {
                return Err(ConfigurationError::MisconfiguredRestrictedList {
                    environment: restricted_env.clone(),
                    valid: rules.valid_list(),
                });
            }
        }
    }

    let mut map = FeatureEnabledMap::with_capacity(config.features.len());
    for (name, definition) in &config.features {
        let mut enabled = false;
        for listed in &definition.environments {
            rules.assert_valid(listed, Some(name.as_str()))?;
            if listed == environment {
                enabled = true;
                if !definition.is_force_enabled && rules.is_restricted(listed) {
                    return Err(ConfigurationError::RestrictedEnvironmentViolation {
                        feature: name.clone(),
                        environment: listed.clone(),
                    });
                }
            }
        }
        map.insert(name.clone(), enabled || definition.is_force_enabled);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatureDefinition, ValidationOptions};

    fn options() -> ValidationOptions {
        ValidationOptions::new(["src/**/*.ts"])
    }

    #[test]
    fn test_enabled_when_environment_listed() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["development", "test"]))
            .with_feature("beta", FeatureDefinition::new(["test"]));

        let map = resolve(&config, "development").unwrap();
        assert_eq!(map.get("alpha"), Some(&true));
        assert_eq!(map.get("beta"), Some(&false));
    }

    #[test]
    fn test_disabled_when_environment_not_listed() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["development"]))
            .with_feature("empty", FeatureDefinition::new(Vec::<String>::new()));

        let map = resolve(&config, "test").unwrap();
        assert!(map.values().all(|enabled| !enabled));
    }

    #[test]
    fn test_force_enabled_in_every_environment() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("forced", FeatureDefinition::new(["development"]).force_enabled());

        for environment in ["development", "test", "production"] {
            let map = resolve(&config, environment).unwrap();
            assert_eq!(map.get("forced"), Some(&true), "environment {}", environment);
        }
    }

    #[test]
    fn test_force_enabled_listing_restricted_environment_is_allowed() {
        let config = FeatureSwitchConfig::new(options()).with_feature(
            "forced",
            FeatureDefinition::new(["production"]).force_enabled(),
        );

        let map = resolve(&config, "production").unwrap();
        assert_eq!(map.get("forced"), Some(&true));
    }

    #[test]
    fn test_force_enabled_still_checks_listed_environments() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("forced", FeatureDefinition::new(["uat"]).force_enabled());

        let err = resolve(&config, "development").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidEnvironment { .. }));
        assert_eq!(err.feature(), Some("forced"));
        assert_eq!(err.environment(), "uat");
    }

    #[test]
    fn test_invalid_active_environment() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["development"]));

        let err = resolve(&config, "staging").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidEnvironment { ref environment, feature: None, .. }
                if environment == "staging"
        ));
    }

    #[test]
    fn test_invalid_listed_environment_is_tagged_with_feature() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["development", "uat"]));

        let err = resolve(&config, "development").unwrap_err();
        assert_eq!(err.feature(), Some("alpha"));
        assert_eq!(err.environment(), "uat");
    }

    #[test]
    fn test_restricted_environment_violation() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["test", "production"]));

        let err = resolve(&config, "production").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::RestrictedEnvironmentViolation {
                feature: "alpha".to_string(),
                environment: "production".to_string(),
            }
        );
    }

    #[test]
    fn test_listing_restricted_environment_is_fine_elsewhere() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("alpha", FeatureDefinition::new(["test", "production"]));

        let map = resolve(&config, "test").unwrap();
        assert_eq!(map.get("alpha"), Some(&true));
    }

    #[test]
    fn test_misconfigured_restricted_list() {
        let config = FeatureSwitchConfig::new(
            options().with_restricted_environments(Some(vec!["live".to_string()])),
        );

        let err = resolve(&config, "development").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MisconfiguredRestrictedList { ref environment, .. } if environment == "live"
        ));
    }

    #[test]
    fn test_no_valid_list_accepts_any_environment() {
        let config = FeatureSwitchConfig::new(
            options()
                .with_valid_environments(None)
                .with_restricted_environments(None),
        )
        .with_feature("alpha", FeatureDefinition::new(["qa", "production"]));

        let map = resolve(&config, "production").unwrap();
        assert_eq!(map.get("alpha"), Some(&true));
    }

    #[test]
    fn test_custom_environments() {
        let config = FeatureSwitchConfig::new(
            options()
                .with_valid_environments(Some(vec![
                    "development".to_string(),
                    "uat".to_string(),
                    "production".to_string(),
                ]))
                .with_restricted_environments(Some(vec![])),
        )
        .with_feature("alpha", FeatureDefinition::new(["uat", "production"]));

        assert_eq!(resolve(&config, "uat").unwrap().get("alpha"), Some(&true));
        assert_eq!(resolve(&config, "production").unwrap().get("alpha"), Some(&true));
        assert_eq!(resolve(&config, "development").unwrap().get("alpha"), Some(&false));
    }

    #[test]
    fn test_map_follows_declaration_order() {
        let config = FeatureSwitchConfig::new(options())
            .with_feature("zeta", FeatureDefinition::new(["test"]))
            .with_feature("alpha", FeatureDefinition::new(["test"]));

        let map = resolve(&config, "test").unwrap();
        let names: Vec<_> = map.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
