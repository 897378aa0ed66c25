//! Core types and configuration for treewalk.
//!
//! This crate provides the value types shared by the blocking and
//! asynchronous walkers: discovered entries, walk options, path
//! predicates, and error classification.

mod entry;
mod error;
mod filter;
mod options;

pub use entry::{Entry, EntryKind};
pub use error::WalkError;
pub use filter::{normalized_path, PatternSet};
pub use options::{ErrorHandler, WalkOptions, WalkOptionsBuilder};
