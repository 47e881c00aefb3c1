//! Subcommand implementations

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use feature_switch_core::{FeatureSwitchConfig, FeatureSwitchSlot, FeatureSwitches, InitOptions};
use feature_switch_validator::{resolve_file_patterns, validate_paths, ValidationReport};

use crate::cli::{ResolveArgs, ValidateArgs};
use crate::output::Printer;

/// Environment simulated when neither the command line nor the configuration names one
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Run the static check. Returns the report; the caller decides the exit status.
pub async fn validate(args: ValidateArgs, printer: Printer) -> Result<ValidationReport> {
    if !args.json {
        printer.banner();
        printer.step("Loading feature switch configuration...");
    }

    let base_dir = base_dir(args.cwd)?;
    let config = load_config(&base_dir, &args.config).await?;
    let environment = args
        .environment
        .or_else(|| config.validation_options.environment.clone())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

    let slot = FeatureSwitchSlot::new();
    let switches = init_switches(&slot, &environment, config)?;
    let config = switches.config();

    let files = resolve_file_patterns(&base_dir, &config.validation_options.file_patterns)?;
    info!("Scanning {} file(s) under {:?}", files.len(), base_dir);
    if !args.json {
        printer.step(&format!(
            "Starting feature switch validation on {} files...",
            files.len()
        ));
    }

    let report = validate_paths(config, &base_dir, &files).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        printer.report(&report);
    }

    Ok(report)
}

/// Resolve the configuration for one environment and print the result
pub async fn resolve(args: ResolveArgs, printer: Printer) -> Result<FeatureSwitches> {
    let base_dir = base_dir(args.cwd)?;
    let config = load_config(&base_dir, &args.config).await?;

    let slot = FeatureSwitchSlot::new();
    let switches = init_switches(&slot, &args.environment, config)?;

    let snapshot = switches.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        printer.snapshot(&snapshot);
    }

    Ok(switches)
}

fn base_dir(cwd: Option<PathBuf>) -> Result<PathBuf> {
    match cwd {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Failed to determine the current directory"),
    }
}

async fn load_config(base_dir: &Path, config: &Path) -> Result<FeatureSwitchConfig> {
    let path = base_dir.join(config);
    FeatureSwitchConfig::load(&path)
        .await
        .with_context(|| format!("Failed to load feature switch configuration {:?}", path))
}

fn init_switches(
    slot: &FeatureSwitchSlot,
    environment: &str,
    config: FeatureSwitchConfig,
) -> Result<FeatureSwitches> {
    slot.init(environment, config, InitOptions::default())
        .with_context(|| format!("Failed to resolve feature switches for '{}'", environment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "features": {
            "alpha": { "environments": ["development", "test"] },
            "gamma": { "environments": ["test"] }
        },
        "validationOptions": {
            "filePatterns": ["src/**/*.ts"],
            "environment": "test"
        }
    }"#;

    async fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("feature-switch.json"), CONFIG)
            .await
            .unwrap();
        for (relative, content) in files {
            let path = dir.path().join(relative);
            tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
            tokio::fs::write(path, content).await.unwrap();
        }
        dir
    }

    fn validate_args(dir: &TempDir) -> ValidateArgs {
        ValidateArgs {
            config: PathBuf::from("feature-switch.json"),
            cwd: Some(dir.path().to_path_buf()),
            environment: None,
            json: true,
        }
    }

    #[tokio::test]
    async fn test_validate_reports_undefined_and_unused() {
        let dir = project(&[
            ("src/a.ts", "if (isFeatureEnabled('alpha')) {}"),
            ("src/lib/b.ts", "\nisFeatureEnabled('zeta')"),
            ("other/c.ts", "isFeatureEnabled('gamma')"),
        ])
        .await;

        let report = validate(validate_args(&dir), Printer::plain())
            .await
            .unwrap();

        assert_eq!(report.files_checked, 2);
        assert_eq!(report.error_count(), 2);
        let messages: Vec<_> = report.diagnostics.iter().map(|d| d.to_string()).collect();
        assert!(messages[0].starts_with("Undefined feature switch \"zeta\" used in "));
        assert!(messages[0].ends_with(":2"));
        assert_eq!(
            messages[1],
            "Feature switch \"gamma\" is defined but never used."
        );
    }

    #[tokio::test]
    async fn test_validate_passes() {
        let dir = project(&[
            ("src/a.ts", "isFeatureEnabled('alpha')"),
            ("src/b.ts", "isFeatureEnabled<Feature>(\"gamma\")"),
        ])
        .await;

        let report = validate(validate_args(&dir), Printer::plain())
            .await
            .unwrap();
        assert!(report.passed());
    }

    #[tokio::test]
    async fn test_validate_rejects_invalid_environment() {
        let dir = project(&[]).await;
        let mut args = validate_args(&dir);
        args.environment = Some("staging".to_string());

        let err = validate(args, Printer::plain()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid environment: staging"));
    }

    #[tokio::test]
    async fn test_validate_missing_config() {
        let dir = TempDir::new().unwrap();

        let err = validate(validate_args(&dir), Printer::plain())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Configuration file not found"));
    }

    #[tokio::test]
    async fn test_resolve() {
        let dir = project(&[]).await;
        let args = ResolveArgs {
            config: PathBuf::from("feature-switch.json"),
            cwd: Some(dir.path().to_path_buf()),
            environment: "development".to_string(),
            json: true,
        };

        let switches = resolve(args, Printer::plain()).await.unwrap();
        let snapshot = switches.snapshot();
        assert_eq!(snapshot.enabled_features, vec!["alpha"]);
        assert_eq!(snapshot.disabled_features, vec!["gamma"]);
    }

    #[tokio::test]
    async fn test_resolve_restricted_environment() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(
            dir.path().join("feature-switch.json"),
            r#"{
                "features": { "alpha": { "environments": ["production"] } },
                "validationOptions": { "filePatterns": ["**/*.ts"] }
            }"#,
        )
        .await
        .unwrap();
        let args = ResolveArgs {
            config: PathBuf::from("feature-switch.json"),
            cwd: Some(dir.path().to_path_buf()),
            environment: "production".to_string(),
            json: true,
        };

        let err = resolve(args, Printer::plain()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("restricted environment: production"));
    }
}
