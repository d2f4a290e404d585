//! CHADTree Host Interface: what the editor lends to a transition
//!
//! Transitions never query editor state ad hoc. Everything they need from the
//! host is expressed as a capability trait and injected at construction:
//!
//! 1. **Selection**: the node(s) under the cursor, or covered by a visual selection
//! 2. **Working directory**: the editor's current `cwd`
//! 3. **Message area**: where user-facing messages end up (UI thread only)
//!
//! # Example
//!
//! ```rust
//! use chadtree_host::{HostError, Node, SelectionProvider};
//! use std::path::PathBuf;
//!
//! struct Fixed(Vec<Node>);
//!
//! impl SelectionProvider for Fixed {
//!     fn indices(&self, _is_visual: bool) -> Result<Vec<Node>, HostError> {
//!         Ok(self.0.clone())
//!     }
//!
//!     fn cwd(&self) -> Result<PathBuf, HostError> {
//!         Ok(PathBuf::from("/home/u"))
//!     }
//! }
//!
//! let host = Fixed(vec![Node::new("/home/u/file.txt")]);
//! let first = host.indices(false).unwrap().into_iter().next();
//! assert_eq!(first.unwrap().path, PathBuf::from("/home/u/file.txt"));
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Editor state unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid working directory: {0}")]
    InvalidCwd(PathBuf),
}

pub type Result<T> = std::result::Result<T, HostError>;

/// A file-tree entry
///
/// Only the path is needed by transitions that act on the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Absolute path of the entry
    pub path: PathBuf,
}

impl Node {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read access to the file-tree view's selection
///
/// Implementations are called from the RPC dispatch thread and must be
/// `Send + Sync` so a host can share one provider across handlers.
pub trait SelectionProvider: Send + Sync {
    /// Nodes currently selected, in view order
    ///
    /// With `is_visual` set, this is every node covered by the visual
    /// selection; otherwise it is at most the node under the cursor.
    fn indices(&self, is_visual: bool) -> Result<Vec<Node>>;

    /// The editor's current working directory
    fn cwd(&self) -> Result<PathBuf>;
}

/// The editor's message area
///
/// Not thread safe on purpose: only the UI thread writes here. Background
/// work reaches it through a dispatch handle instead.
pub trait MessageArea {
    fn write(&mut self, message: &str, error: bool);
}

impl MessageArea for Vec<(String, bool)> {
    fn write(&mut self, message: &str, error: bool) {
        self.push((message.to_string(), error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_constructor() {
        let node = Node::new("/data/test.txt");
        assert_eq!(node.path(), Path::new("/data/test.txt"));
    }

    #[test]
    fn test_vec_message_area() {
        let mut seen: Vec<(String, bool)> = Vec::new();
        seen.write("boom", true);
        seen.write("fine", false);
        assert_eq!(
            seen,
            vec![("boom".to_string(), true), ("fine".to_string(), false)]
        );
    }

    #[test]
    fn test_error_display() {
        let err = HostError::InvalidCwd(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Invalid working directory: /nope");
    }
}
