//! Detection of feature switch call sites in source text
//!
//! Matching is purely textual: call sites inside comments or string literals
//! are reported too, and calls whose argument is not a string literal are
//! not.

use regex::{CaptureMatches, Regex};
use serde::Serialize;
use std::sync::LazyLock;

use feature_switch_core::FeatureSwitchConfig;

/// `isFeatureEnabled`, an optional `<Type>` argument, then a quoted name
static FEATURE_USAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"isFeatureEnabled(?:<[A-Za-z0-9_-]+>)?\(\s*['"`]([A-Za-z0-9_-]+)['"`]\s*\)"#)
        .expect("feature usage pattern is valid")
});

/// A single call site found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUsage {
    pub feature_name: String,
    /// 1-based line of the start of the call
    pub line_number: usize,
    /// Whether the name is declared in the configuration
    pub is_defined: bool,
}

/// Iterator over the call sites of one text, in order of appearance
pub struct FeatureUsages<'c, 't> {
    matches: CaptureMatches<'static, 't>,
    content: &'t str,
    config: &'c FeatureSwitchConfig,
    cursor: usize,
    line: usize,
}

impl Iterator for FeatureUsages<'_, '_> {
    type Item = FeatureUsage;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.matches.next()?;
        let start = captures.get(0)?.start();
        let feature_name = captures.get(1)?.as_str();

        // Only the text since the previous match is counted.
        self.line += self.content[self.cursor..start]
            .bytes()
            .filter(|b| *b == b'\n')
            .count();
        self.cursor = start;

        Some(FeatureUsage {
            feature_name: feature_name.to_string(),
            line_number: self.line,
            is_defined: self.config.is_declared(feature_name),
        })
    }
}

/// Scan `content` for feature switch call sites.
///
/// The returned iterator is lazy and independent of any other scan.
pub fn find_feature_usages<'c, 't>(
    content: &'t str,
    config: &'c FeatureSwitchConfig,
) -> FeatureUsages<'c, 't> {
    FeatureUsages {
        matches: FEATURE_USAGE_PATTERN.captures_iter(content),
        content,
        config,
        cursor: 0,
        line: 1,
    }
}
