//! Directory-tree traversal engine for treewalk.
//!
//! This crate provides the walker in two forms that agree on results:
//!
//! - [`Walker`] — blocking, an `Iterator<Item = Result<Entry, WalkError>>`
//! - [`AsyncWalker`] — suspending, driven by `next_entry().await` or
//!   converted into a `Stream` with [`AsyncWalker::into_stream`]
//!
//! Both forms share the same descent and filter logic; they differ
//! only in which filesystem calls they make. Traversal is depth-first
//! in directory-listing order, the root itself is never yielded, and
//! filters never prevent recursion (only `max_depth` prunes subtrees).
//!
//! # Example
//!
//! ```rust,no_run
//! use treewalk_engine::{walk, WalkOptions};
//!
//! let options = WalkOptions::builder().exts(["rs"]).build().unwrap();
//! for entry in walk("src", options) {
//!     let entry = entry.unwrap();
//!     println!("{}", entry.path.display());
//! }
//! ```
//!
//! # Async
//!
//! ```rust,no_run
//! use treewalk_engine::{walk_async, WalkOptions};
//!
//! # async fn run() {
//! let mut walker = walk_async("src", WalkOptions::default());
//! while let Some(entry) = walker.next_entry().await {
//!     println!("{}", entry.unwrap().path.display());
//! }
//! # }
//! ```

mod common;
mod stream;
mod walker;

pub use stream::AsyncWalker;
pub use walker::Walker;

// Re-export core types for convenience
pub use treewalk_core::{
    Entry, EntryKind, ErrorHandler, PatternSet, WalkError, WalkOptions, WalkOptionsBuilder,
};

use std::path::PathBuf;

/// Walk `root` in blocking form with the given options.
pub fn walk(root: impl Into<PathBuf>, options: WalkOptions) -> Walker {
    Walker::with_options(root, options)
}

/// Walk `root` in suspending form with the given options.
pub fn walk_async(root: impl Into<PathBuf>, options: WalkOptions) -> AsyncWalker {
    AsyncWalker::with_options(root, options)
}
