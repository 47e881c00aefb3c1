//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Configuration file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "feature-switch.json";

#[derive(Debug, Parser)]
#[command(name = "feature-switch", version, about = "Feature switch validation and resolution")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check feature switch usages in source files against the configuration
    Validate(ValidateArgs),
    /// Show which features are enabled in an environment
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Configuration file, relative to the base directory
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Base directory for the configuration and file patterns
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Environment to resolve the configuration for
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Configuration file, relative to the base directory
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Base directory for the configuration
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Environment to resolve the configuration for
    #[arg(short, long, env = "FEATURE_SWITCH_ENV")]
    pub environment: String,

    /// Print the resolved switches as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["feature-switch", "validate"]).unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };

        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(args.cwd.is_none());
        assert!(args.environment.is_none());
        assert!(!args.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_validate_with_options() {
        let cli = Cli::try_parse_from([
            "feature-switch",
            "validate",
            "config/switches.json",
            "--cwd",
            "/repo",
            "-e",
            "test",
            "--json",
            "-v",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };

        assert_eq!(args.config, PathBuf::from("config/switches.json"));
        assert_eq!(args.cwd, Some(PathBuf::from("/repo")));
        assert_eq!(args.environment.as_deref(), Some("test"));
        assert!(args.json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_resolve_with_environment() {
        let cli = Cli::try_parse_from([
            "feature-switch",
            "resolve",
            "--environment",
            "production",
        ])
        .unwrap();
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };

        assert_eq!(args.environment, "production");
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }
}
