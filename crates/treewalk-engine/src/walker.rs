//! Blocking depth-first walker.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use treewalk_core::{Entry, EntryKind, WalkError, WalkOptions};

use crate::common::{dispatch, kind_of, Frame, RawChild};

/// Blocking walker over a directory tree.
///
/// Yields `Result<Entry, WalkError>` depth-first in directory-listing
/// order. The root itself is never yielded. Without an `on_error`
/// handler, a non-suppressible error is yielded once as `Err` and the
/// walker is fused afterwards. Dropping the walker mid-walk abandons
/// it cleanly; the sequence is not restartable.
pub struct Walker {
    options: WalkOptions,
    start: Option<PathBuf>,
    stack: Vec<Frame>,
    visited: HashSet<PathBuf>,
    done: bool,
}

impl Walker {
    /// Walk `root` with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    /// Walk `root` with the given options.
    pub fn with_options(root: impl Into<PathBuf>, options: WalkOptions) -> Self {
        Self {
            options,
            start: Some(root.into()),
            stack: Vec::new(),
            visited: HashSet::new(),
            done: false,
        }
    }

    /// Route an error through the shared policy. Returns the error
    /// back when it must terminate the walk.
    fn report(&mut self, err: WalkError) -> Option<WalkError> {
        dispatch(&self.options, err)
    }

    /// List `path` and push its children as a new frame, at `depth`.
    /// The listing is consumed eagerly so no directory handle stays
    /// open between yielded entries. Returns a fatal error, if any.
    fn open_dir(&mut self, path: &Path, depth: usize) -> Option<WalkError> {
        let read = match fs::read_dir(path) {
            Ok(read) => read,
            Err(e) => return self.report(WalkError::io(path, e)),
        };

        let mut children = Vec::new();
        for dent in read {
            let dent = match dent {
                Ok(dent) => dent,
                // A failing listing ends this directory; whatever was
                // listed so far is still walked.
                Err(e) => match self.report(WalkError::io(path, e)) {
                    Some(fatal) => return Some(fatal),
                    None => break,
                },
            };
            let child_path = dent.path();
            let file_type = match dent.file_type() {
                Ok(file_type) => file_type,
                Err(e) => match self.report(WalkError::io(&child_path, e)) {
                    Some(fatal) => return Some(fatal),
                    None => continue,
                },
            };
            children.push(RawChild {
                path: child_path,
                depth,
                file_type,
            });
        }

        self.stack.push(Frame::new(children));
        None
    }

    /// Cycle guard for symlink following. Returns `false` when the
    /// directory's canonical real path was already entered.
    fn enter_dir(&mut self, path: &Path) -> Result<bool, WalkError> {
        if !self.options.follow_symlinks {
            return Ok(true);
        }
        match fs::canonicalize(path) {
            Ok(real) => {
                if self.visited.insert(real) {
                    Ok(true)
                } else {
                    tracing::debug!(path = %path.display(), "already visited, skipping descent");
                    Ok(false)
                }
            }
            Err(e) => match self.report(WalkError::io(path, e)) {
                Some(fatal) => Err(fatal),
                None => Ok(false),
            },
        }
    }

    /// Classify one child, descend into it when it is a directory
    /// within the depth cutoff, and decide whether it is yielded.
    fn advance(&mut self, child: RawChild) -> Result<Option<Entry>, WalkError> {
        let RawChild {
            path,
            depth,
            file_type,
        } = child;

        let kind = if file_type.is_symlink() && self.options.follow_symlinks {
            // Classify through the link target.
            match fs::metadata(&path) {
                Ok(meta) => kind_of(&meta.file_type()),
                Err(e) => {
                    return match self.report(WalkError::broken_symlink(&path, e)) {
                        Some(fatal) => Err(fatal),
                        None => Ok(None),
                    };
                }
            }
        } else {
            kind_of(&file_type)
        };

        // Descend before yielding so contents follow their directory
        // and precede its next sibling. Filters never gate descent.
        if kind == EntryKind::Directory && self.options.can_descend(depth) {
            if self.enter_dir(&path)? {
                if let Some(fatal) = self.open_dir(&path, depth + 1) {
                    return Err(fatal);
                }
            }
        }

        if self.options.is_eligible(&path) {
            Ok(Some(Entry::new(path, depth, kind)))
        } else {
            Ok(None)
        }
    }
}

impl Iterator for Walker {
    type Item = Result<Entry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(root) = self.start.take() {
            let mut proceed = true;
            if self.options.follow_symlinks {
                match fs::canonicalize(&root) {
                    Ok(real) => {
                        self.visited.insert(real);
                    }
                    // The root itself cannot be resolved; its subtree
                    // is gone, so the listing is not attempted.
                    Err(e) => {
                        proceed = false;
                        if let Some(fatal) = self.report(WalkError::io(&root, e)) {
                            self.done = true;
                            return Some(Err(fatal));
                        }
                    }
                }
            }
            if proceed && self.options.can_descend(0) {
                if let Some(fatal) = self.open_dir(&root, 1) {
                    self.done = true;
                    return Some(Err(fatal));
                }
            }
        }

        loop {
            let child = {
                let frame = self.stack.last_mut()?;
                match frame.children.next() {
                    Some(child) => child,
                    None => {
                        self.stack.pop();
                        continue;
                    }
                }
            };
            match self.advance(child) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(fatal) => {
                    self.done = true;
                    return Some(Err(fatal));
                }
            }
        }
    }
}
