//! Path predicates for walk filtering.

use std::borrow::Cow;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::WalkError;

/// A set of glob patterns with OR semantics: a path matches the set
/// when any single pattern matches it.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: GlobSet,
    patterns: Vec<String>,
}

impl PatternSet {
    /// Build a pattern set, validating every pattern eagerly.
    pub fn new<I, S>(patterns: I) -> Result<Self, WalkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| WalkError::InvalidOptions {
                message: format!("bad pattern {pattern:?}: {e}"),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| WalkError::InvalidOptions {
            message: e.to_string(),
        })?;
        Ok(Self { set, patterns })
    }

    /// Check whether any pattern matches the path. Matching uses the
    /// forward-slash normalized form of the path.
    pub fn is_match(&self, path: &Path) -> bool {
        self.set.is_match(normalized_path(path).as_ref())
    }

    /// The source patterns this set was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check if the set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Normalize a path to forward slashes for comparison. On Unix this
/// is a borrow; on Windows backslash separators are rewritten.
pub fn normalized_path(path: &Path) -> Cow<'_, str> {
    let s = path.to_string_lossy();
    if s.contains('\\') {
        Cow::Owned(s.replace('\\', "/"))
    } else {
        s
    }
}
