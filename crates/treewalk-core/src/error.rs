//! Error types for walk operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Path vanished or never existed.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// A symlink target could not be resolved while following links.
    #[error("Broken symlink: {path}: {source}")]
    BrokenSymlink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid walk options.
    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },
}

impl WalkError {
    /// Create an I/O error with path context, classified by kind.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a symlink-resolution error with path context.
    pub fn broken_symlink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::BrokenSymlink {
            path: path.into(),
            source,
        }
    }

    /// The path the error occurred at, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::BrokenSymlink { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidOptions { .. } => None,
        }
    }

    /// Whether this error is suppressed when no error handler is
    /// installed. Missing paths only omit their subtree; a broken
    /// symlink whose target is gone is the same condition seen
    /// through the link.
    pub fn is_suppressible(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::BrokenSymlink { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
