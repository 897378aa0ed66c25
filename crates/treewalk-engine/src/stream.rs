//! Suspending depth-first walker.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::Stream;
use tokio::fs;

use treewalk_core::{Entry, EntryKind, WalkError, WalkOptions};

use crate::common::{dispatch, kind_of, Frame, RawChild};

/// Suspending walker over a directory tree.
///
/// Identical descent, filter, and error semantics to [`crate::Walker`];
/// the walker suspends at every filesystem-operation boundary so a
/// cooperative scheduler can interleave other work. Drive it with
/// [`AsyncWalker::next_entry`] or convert it into a `Stream` with
/// [`AsyncWalker::into_stream`]. Dropping it mid-walk abandons the
/// walk cleanly; there is no background task behind it.
pub struct AsyncWalker {
    options: WalkOptions,
    start: Option<PathBuf>,
    stack: Vec<Frame>,
    visited: HashSet<PathBuf>,
    done: bool,
}

impl AsyncWalker {
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

    /// Produce the next entry, or `None` once the walk is complete.
    /// After a fatal `Err` the walker is fused.
    pub async fn next_entry(&mut self) -> Option<Result<Entry, WalkError>> {
        if self.done {
            return None;
        }

        if let Some(root) = self.start.take() {
            let mut proceed = true;
            if self.options.follow_symlinks {
                match fs::canonicalize(&root).await {
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
                if let Some(fatal) = self.open_dir(&root, 1).await {
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
            match self.advance(child).await {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(fatal) => {
                    self.done = true;
                    return Some(Err(fatal));
                }
            }
        }
    }

    /// Convert the walker into a `Stream` of entries.
    pub fn into_stream(self) -> impl Stream<Item = Result<Entry, WalkError>> {
        futures::stream::unfold(self, |mut walker| async move {
            walker.next_entry().await.map(|item| (item, walker))
        })
    }

    fn report(&mut self, err: WalkError) -> Option<WalkError> {
        dispatch(&self.options, err)
    }

    /// List `path` and push its children as a new frame, at `depth`.
    /// Each `next_entry` on the listing is a suspension point; the
    /// handle is consumed before the frame is created.
    async fn open_dir(&mut self, path: &Path, depth: usize) -> Option<WalkError> {
        let mut read = match fs::read_dir(path).await {
            Ok(read) => read,
            Err(e) => return self.report(WalkError::io(path, e)),
        };

        let mut children = Vec::new();
        loop {
            let dent = match read.next_entry().await {
                Ok(Some(dent)) => dent,
                Ok(None) => break,
                // A failing listing ends this directory; whatever was
                // listed so far is still walked.
                Err(e) => match self.report(WalkError::io(path, e)) {
                    Some(fatal) => return Some(fatal),
                    None => break,
                },
            };
            let child_path = dent.path();
            let file_type = match dent.file_type().await {
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
    async fn enter_dir(&mut self, path: &Path) -> Result<bool, WalkError> {
        if !self.options.follow_symlinks {
            return Ok(true);
        }
        match fs::canonicalize(path).await {
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
    async fn advance(&mut self, child: RawChild) -> Result<Option<Entry>, WalkError> {
        let RawChild {
            path,
            depth,
            file_type,
        } = child;

        let kind = if file_type.is_symlink() && self.options.follow_symlinks {
            // Classify through the link target.
            match fs::metadata(&path).await {
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
            if self.enter_dir(&path).await? {
                if let Some(fatal) = self.open_dir(&path, depth + 1).await {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as sync_fs;
    use tempfile::TempDir;
    use tokio_stream::StreamExt;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        sync_fs::create_dir(root.join("dir1")).unwrap();
        sync_fs::create_dir(root.join("dir1/subdir")).unwrap();
        sync_fs::write(root.join("file1.txt"), "hello").unwrap();
        sync_fs::write(root.join("dir1/file2.rs"), "fn main() {}").unwrap();
        sync_fs::write(root.join("dir1/subdir/file3.txt"), "deep").unwrap();

        temp
    }

    async fn collect_sorted(mut walker: AsyncWalker) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        while let Some(entry) = walker.next_entry().await {
            paths.push(entry.unwrap().path);
        }
        paths.sort();
        paths
    }

    #[tokio::test]
    async fn test_async_full_walk() {
        let temp = create_test_tree();
        let paths = collect_sorted(AsyncWalker::new(temp.path())).await;
        assert_eq!(paths.len(), 5);
        assert!(paths.contains(&temp.path().join("dir1/subdir/file3.txt")));
    }

    #[tokio::test]
    async fn test_async_matches_blocking_walk() {
        let temp = create_test_tree();
        let options = WalkOptions::builder().exts(["txt", "rs"]).build().unwrap();

        let mut blocking: Vec<PathBuf> =
            crate::Walker::with_options(temp.path(), options.clone())
                .map(|e| e.unwrap().path)
                .collect();
        blocking.sort();

        let suspended =
            collect_sorted(AsyncWalker::with_options(temp.path(), options)).await;
        assert_eq!(blocking, suspended);
    }

    #[tokio::test]
    async fn test_stream_form() {
        let temp = create_test_tree();
        let options = WalkOptions::builder().max_depth(1usize).build().unwrap();
        let stream = AsyncWalker::with_options(temp.path(), options).into_stream();
        tokio::pin!(stream);

        let mut paths = Vec::new();
        while let Some(entry) = stream.next().await {
            paths.push(entry.unwrap().path);
        }
        paths.sort();
        assert_eq!(
            paths,
            vec![temp.path().join("dir1"), temp.path().join("file1.txt")]
        );
    }

    #[tokio::test]
    async fn test_abandoning_stream_early() {
        let temp = create_test_tree();
        let mut walker = AsyncWalker::new(temp.path());
        let first = walker.next_entry().await;
        assert!(first.is_some());
        drop(walker); // no task or handle outlives the walker
    }

    #[tokio::test]
    async fn test_missing_root_is_silent_without_handler() {
        let temp = TempDir::new().unwrap();
        let mut walker = AsyncWalker::new(temp.path().join("no-such-dir"));
        assert!(walker.next_entry().await.is_none());
    }
}
