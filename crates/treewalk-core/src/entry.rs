//! Filesystem entry types yielded during a walk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Type of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (only reported when links are not followed).
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink)
    }
}

/// A single filesystem object discovered during a walk.
///
/// Entries are immutable values owned by the consumer once yielded.
/// The path is the caller's root joined with the relative segments
/// discovered during descent; it is never rewritten to an absolute or
/// canonical form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Root-relative path of the entry, as discovered.
    pub path: PathBuf,

    /// Number of path segments below the walk root (direct children
    /// of the root are depth 1).
    pub depth: usize,

    /// Entry type as reported by the directory listing, or by the
    /// link target when symlinks are followed.
    pub kind: EntryKind,
}

impl Entry {
    /// Create a new entry.
    pub fn new(path: impl Into<PathBuf>, depth: usize, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            depth,
            kind,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this entry is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Final component of the entry's path.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// The entry's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_discrimination() {
        assert!(EntryKind::File.is_file());
        assert!(!EntryKind::File.is_dir());
        assert!(!EntryKind::File.is_symlink());

        assert!(EntryKind::Directory.is_dir());
        assert!(!EntryKind::Directory.is_file());

        assert!(EntryKind::Symlink.is_symlink());
        assert!(!EntryKind::Symlink.is_dir());

        assert!(!EntryKind::Other.is_file());
        assert!(!EntryKind::Other.is_dir());
        assert!(!EntryKind::Other.is_symlink());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::new("root/sub/file.txt", 2, EntryKind::File);
        assert!(entry.is_file());
        assert!(!entry.is_dir());
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.file_name(), "file.txt");
        assert_eq!(entry.path(), Path::new("root/sub/file.txt"));
    }
}
