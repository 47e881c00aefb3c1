//! Console output

use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;

use feature_switch_core::FeatureSwitchSnapshot;
use feature_switch_validator::ValidationReport;

/// Parse a boolean environment variable, falling back to `default`
fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => parse_flag(&raw).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Writes progress and results, colored when the terminal allows it
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    /// Color is on for terminals unless `NO_COLOR` is set;
    /// `FEATURE_SWITCH_COLOR` overrides both.
    pub fn from_env() -> Self {
        let default = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            color: env_flag("FEATURE_SWITCH_COLOR", default),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn banner(&self) {
        println!(
            "{}",
            self.paint("\n=== Feature Switch Validator ===\n", Style::new().blue())
        );
    }

    pub fn step(&self, message: &str) {
        println!("{}", self.paint(message, Style::new().yellow()));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(message, Style::new().red()));
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.paint(message, Style::new().green()));
    }

    /// Every diagnostic followed by the verdict line
    pub fn report(&self, report: &ValidationReport) {
        for diagnostic in &report.diagnostics {
            self.error(&format!("Error: {}", diagnostic));
        }

        if report.passed() {
            self.success(&format!(
                "Feature switch validation passed without errors. Checked {} files.",
                report.files_checked
            ));
        } else {
            self.error(&format!(
                "Feature switch validation failed with {} error(s). Checked {} files.",
                report.error_count(),
                report.files_checked
            ));
        }
    }

    pub fn snapshot(&self, snapshot: &FeatureSwitchSnapshot) {
        println!("Current Environment: {}", snapshot.environment);
        println!(
            "{}",
            self.paint(
                &format!("Enabled Features: {:?}", snapshot.enabled_features),
                Style::new().green()
            )
        );
        println!(
            "{}",
            self.paint(
                &format!("Disabled Features: {:?}", snapshot.disabled_features),
                Style::new().red()
            )
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        for raw in ["1", "true", " YES ", "on"] {
            assert_eq!(parse_flag(raw), Some(true), "{}", raw);
        }
        for raw in ["0", "False", "no", "off"] {
            assert_eq!(parse_flag(raw), Some(false), "{}", raw);
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_env_flag_default_when_unset() {
        assert!(env_flag("FEATURE_SWITCH_TEST_UNSET_FLAG", true));
        assert!(!env_flag("FEATURE_SWITCH_TEST_UNSET_FLAG", false));
    }

    #[test]
    fn test_plain_printer_does_not_color() {
        let printer = Printer::plain();
        assert_eq!(printer.paint("ok", Style::new().green()), "ok");
    }

    #[test]
    fn test_colored_printer_emits_escape_codes() {
        let printer = Printer { color: true };
        let painted = printer.paint("ok", Style::new().green());
        assert!(painted.contains("ok"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
