//! Cross-check of feature switch usages against declarations

use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use feature_switch_core::FeatureSwitchConfig;

use crate::error::{Result, ValidatorError};
use crate::scanner::find_feature_usages;

/// Files read concurrently by [`validate_paths`]
const READ_CONCURRENCY: usize = 16;

/// A problem found by the validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A call site names a feature that is not declared
    #[serde(rename_all = "camelCase")]
    UndefinedFeature {
        feature: String,
        path: String,
        line_number: usize,
    },
    /// A declared feature is never referenced
    UnusedFeature { feature: String },
}

impl Diagnostic {
    pub fn feature(&self) -> &str {
        match self {
            Self::UndefinedFeature { feature, .. } | Self::UnusedFeature { feature } => feature,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedFeature {
                feature,
                path,
                line_number,
            } => write!(
                f,
                "Undefined feature switch \"{}\" used in {}:{}",
                feature, path, line_number
            ),
            Self::UnusedFeature { feature } => write!(
                f,
                "Feature switch \"{}\" is defined but never used.",
                feature
            ),
        }
    }
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Findings in the order they were produced
    pub diagnostics: Vec<Diagnostic>,
    pub files_checked: usize,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the run found no errors
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Incremental validation over a sequence of files
pub struct Validator<'c> {
    config: &'c FeatureSwitchConfig,
    unused: IndexSet<String>,
    diagnostics: Vec<Diagnostic>,
    files_checked: usize,
}

impl<'c> Validator<'c> {
    pub fn new(config: &'c FeatureSwitchConfig) -> Self {
        Self {
            config,
            unused: config.feature_names().map(str::to_string).collect(),
            diagnostics: Vec::new(),
            files_checked: 0,
        }
    }

    /// Scan one file and record its findings.
    ///
    /// `path` is only used in diagnostics. Returns the number of errors the
    /// file contributed.
    pub fn check_file(&mut self, path: &str, content: &str) -> usize {
        let forbid_undefined = self
            .config
            .validation_options
            .should_not_use_undefined_feature_switches;
        let before = self.diagnostics.len();
        let mut usages = 0;

        for usage in find_feature_usages(content, self.config) {
            usages += 1;
            if usage.is_defined {
                self.unused.shift_remove(&usage.feature_name);
            } else if forbid_undefined {
                self.diagnostics.push(Diagnostic::UndefinedFeature {
                    feature: usage.feature_name,
                    path: path.to_string(),
                    line_number: usage.line_number,
                });
            }
        }

        self.files_checked += 1;
        let errors = self.diagnostics.len() - before;
        debug!("Checked {}: {} usage(s), {} error(s)", path, usages, errors);
        errors
    }

    /// Close the run, reporting declared features no file referenced
    pub fn finish(mut self) -> ValidationReport {
        if self
            .config
            .validation_options
            .should_use_all_defined_feature_switches
        {
            for feature in self.unused.drain(..) {
                self.diagnostics.push(Diagnostic::UnusedFeature { feature });
            }
        }

        ValidationReport {
            diagnostics: self.diagnostics,
            files_checked: self.files_checked,
        }
    }
}

/// Validate in-memory files, given as `(path, content)` pairs
pub fn validate<I, P, C>(config: &FeatureSwitchConfig, files: I) -> ValidationReport
where
    I: IntoIterator<Item = (P, C)>,
    P: AsRef<str>,
    C: AsRef<str>,
{
    let mut validator = Validator::new(config);
    for (path, content) in files {
        validator.check_file(path.as_ref(), content.as_ref());
    }
    validator.finish()
}

/// Read and validate files from disk.
///
/// Files are read concurrently but checked in the order given. Paths in
/// diagnostics are relative to `base_dir` when possible.
pub async fn validate_paths(
    config: &FeatureSwitchConfig,
    base_dir: &Path,
    paths: &[PathBuf],
) -> Result<ValidationReport> {
    let mut reads = stream::iter(paths.iter().cloned())
        .map(|path| async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok((path, String::from_utf8_lossy(&bytes).into_owned())),
                Err(e) => Err(ValidatorError::read_failed(path, e)),
            }
        })
        .buffered(READ_CONCURRENCY);

    let mut validator = Validator::new(config);
    while let Some(read) = reads.next().await {
        let (path, content) = read?;
        validator.check_file(&display_path(base_dir, &path), &content);
    }

    Ok(validator.finish())
}

fn display_path(base_dir: &Path, path: &Path) -> String {
    path.strip_prefix(base_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
