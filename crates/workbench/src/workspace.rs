//! The base directory every relative tool path resolves against.

use std::path::{Component, Path, PathBuf};

use crate::error::ToolError;

/// Fixed filesystem root for one tool set.
///
/// Injected into each tool at construction and never reassigned. Paths
/// handed to [`resolve`](Self::resolve) must be relative and may not climb
/// out of the root with `..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `relative` onto the root.
    ///
    /// An empty string or `.` resolves to the root itself.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ToolError> {
        let rel = Path::new(relative);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ToolError::PathTraversal {
                path: relative.to_string(),
            });
        }
        Ok(self.root.join(rel))
    }
}
