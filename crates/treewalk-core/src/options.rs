//! Walk configuration types.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use derive_builder::Builder;

use crate::error::WalkError;
use crate::filter::{normalized_path, PatternSet};

/// Callback invoked with every traversal error when installed.
pub type ErrorHandler = Arc<dyn Fn(&WalkError) + Send + Sync>;

/// Configuration for a walk invocation.
///
/// All fields are optional; the default walks the whole tree, does
/// not follow symlinks, and yields every entry.
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct WalkOptions {
    /// Maximum depth to yield and descend to (None = unlimited).
    /// The root is depth 0, so its direct children are depth 1.
    #[builder(default, setter(into, strip_option))]
    pub max_depth: Option<usize>,

    /// Suffix allow-list. When non-empty, an entry is yielded only if
    /// its path ends with one of these suffixes. A missing leading
    /// dot is added at build time.
    #[builder(default, setter(custom))]
    pub exts: Vec<String>,

    /// Inclusion patterns. When present, an entry is yielded only if
    /// at least one pattern matches its path.
    #[builder(default, setter(into, strip_option))]
    pub include: Option<PatternSet>,

    /// Exclusion patterns. An entry matching any pattern is never
    /// yielded. A skipped directory is still descended into; skip
    /// suppresses the entry, not its subtree.
    #[builder(default, setter(into, strip_option))]
    pub skip: Option<PatternSet>,

    /// Follow symbolic links, with cycle detection over canonical
    /// real paths.
    #[builder(default = "false")]
    pub follow_symlinks: bool,

    /// Error callback. When installed, every traversal error is
    /// delivered here and the walk continues.
    #[builder(default, setter(into, strip_option))]
    pub on_error: Option<ErrorHandler>,
}

impl WalkOptionsBuilder {
    /// Set the suffix allow-list, normalizing each suffix to carry a
    /// leading dot.
    pub fn exts<I, S>(&mut self, exts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exts = Some(
            exts.into_iter()
                .map(|e| {
                    let e = e.into();
                    if e.starts_with('.') { e } else { format!(".{e}") }
                })
                .collect(),
        );
        self
    }
}

impl WalkOptions {
    /// Create a new options builder.
    pub fn builder() -> WalkOptionsBuilder {
        WalkOptionsBuilder::default()
    }

    /// Check whether an entry at the given path passes the filter
    /// pipeline: skip, then exts, then include. Filters gate yield
    /// eligibility only; recursion is gated by `max_depth` alone.
    pub fn is_eligible(&self, path: &Path) -> bool {
        if let Some(skip) = &self.skip {
            if skip.is_match(path) {
                return false;
            }
        }
        if !self.exts.is_empty() {
            let normalized = normalized_path(path);
            if !self.exts.iter().any(|ext| normalized.ends_with(ext.as_str())) {
                return false;
            }
        }
        if let Some(include) = &self.include {
            if !include.is_match(path) {
                return false;
            }
        }
        true
    }

    /// Check whether a directory at the given depth may be expanded.
    /// Its children live one level deeper, so expansion requires
    /// `depth < max_depth`.
    pub fn can_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            exts: Vec::new(),
            include: None,
            skip: None,
            follow_symlinks: false,
            on_error: None,
        }
    }
}

impl fmt::Debug for WalkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("max_depth", &self.max_depth)
            .field("exts", &self.exts)
            .field("include", &self.include)
            .field("skip", &self.skip)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("on_error", &self.on_error.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = WalkOptions::default();
        assert!(opts.max_depth.is_none());
        assert!(opts.exts.is_empty());
        assert!(!opts.follow_symlinks);
        assert!(opts.on_error.is_none());
        assert!(opts.is_eligible(Path::new("anything")));
    }

    #[test]
    fn test_builder() {
        let opts = WalkOptions::builder()
            .max_depth(3usize)
            .follow_symlinks(true)
            .build()
            .unwrap();
        assert_eq!(opts.max_depth, Some(3));
        assert!(opts.follow_symlinks);
    }

    #[test]
    fn test_ext_normalization() {
        let opts = WalkOptions::builder()
            .exts(["rs", ".ts"])
            .build()
            .unwrap();
        assert_eq!(opts.exts, vec![".rs".to_string(), ".ts".to_string()]);
        assert!(opts.is_eligible(Path::new("a/main.rs")));
        assert!(opts.is_eligible(Path::new("a/main.ts")));
        assert!(!opts.is_eligible(Path::new("a/main.py")));
    }

    #[test]
    fn test_skip_wins_over_include() {
        let opts = WalkOptions::builder()
            .include(PatternSet::new(["**/x*"]).unwrap())
            .skip(PatternSet::new(["**/x.secret"]).unwrap())
            .build()
            .unwrap();
        assert!(opts.is_eligible(Path::new("root/x.txt")));
        assert!(!opts.is_eligible(Path::new("root/x.secret")));
        assert!(!opts.is_eligible(Path::new("root/y.txt")));
    }

    #[test]
    fn test_can_descend() {
        let unbounded = WalkOptions::default();
        assert!(unbounded.can_descend(0));
        assert!(unbounded.can_descend(100));

        let bounded = WalkOptions::builder().max_depth(1usize).build().unwrap();
        assert!(bounded.can_descend(0));
        assert!(!bounded.can_descend(1));

        let zero = WalkOptions::builder().max_depth(0usize).build().unwrap();
        assert!(!zero.can_descend(0));
    }
}
