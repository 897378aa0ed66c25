//! Pieces shared by the blocking and suspending walkers.

use std::fs::FileType;
use std::path::PathBuf;

use treewalk_core::{EntryKind, WalkError, WalkOptions};

/// A child discovered by a directory listing, not yet classified for
/// symlink following.
#[derive(Debug)]
pub(crate) struct RawChild {
    pub path: PathBuf,
    pub depth: usize,
    pub file_type: FileType,
}

/// Pending children of one expanded directory. The listing handle is
/// consumed before the frame is created, so an abandoned walk holds
/// no open handles between steps.
#[derive(Debug)]
pub(crate) struct Frame {
    pub children: std::vec::IntoIter<RawChild>,
}

impl Frame {
    pub fn new(children: Vec<RawChild>) -> Self {
        Self {
            children: children.into_iter(),
        }
    }
}

/// Map a listing's type hint to an entry kind, without following links.
pub(crate) fn kind_of(file_type: &FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::Other
    }
}

/// Apply the error policy shared by both forms: an installed handler
/// receives every error and the walk continues; otherwise suppressible
/// errors only omit their subtree and anything else is fatal.
///
/// Returns the error back when it must terminate the walk.
pub(crate) fn dispatch(options: &WalkOptions, err: WalkError) -> Option<WalkError> {
    if let Some(handler) = &options.on_error {
        handler(&err);
        None
    } else if err.is_suppressible() {
        tracing::debug!(error = %err, "suppressed traversal error");
        None
    } else {
        Some(err)
    }
}
