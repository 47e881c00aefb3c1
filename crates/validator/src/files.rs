//! File enumeration from glob patterns

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ValidatorError};

/// Resolve glob patterns relative to `base_dir` into a sorted file list.
///
/// - `*` stays within one path segment, `**` spans directories
/// - a leading `!` turns a pattern into an exclusion
/// - hidden files and directories are skipped; ignore files are not consulted
/// - symbolic links are followed; loops are reported as walk errors
///
/// Returned paths are `base_dir` joined with the matched relative path.
pub fn resolve_file_patterns(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut include = GlobSetBuilder::new();
    let mut exclude = GlobSetBuilder::new();

    for raw in patterns {
        match raw.strip_prefix('!') {
            Some(negated) => exclude.add(build_glob(raw, negated)?),
            None => include.add(build_glob(raw, raw)?),
        };
    }

    let include = build_set(include, patterns)?;
    let exclude = build_set(exclude, patterns)?;

    let walker = WalkBuilder::new(base_dir)
        .standard_filters(false)
        .hidden(true)
        .follow_links(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| ValidatorError::Walk {
            root: base_dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(base_dir) else {
            continue;
        };
        if include.is_match(relative) && !exclude.is_match(relative) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(
        "Resolved {} file(s) under {:?} from {:?}",
        files.len(),
        base_dir,
        patterns
    );
    Ok(files)
}

fn build_glob(raw: &str, pattern: &str) -> Result<Glob> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ValidatorError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })
}

fn build_set(builder: GlobSetBuilder, patterns: &[String]) -> Result<GlobSet> {
    builder
        .build()
        .map_err(|source| ValidatorError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })
}
