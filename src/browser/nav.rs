//! Lexical path transitions for the explorer.

use crate::error::{ScratchError, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Spelling of the parent-directory target.
pub const PARENT: &str = "..";

/// Where a navigation request points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// The parent of the current directory.
    Parent,
    /// A direct child of the current directory.
    Child(String),
}

impl NavTarget {
    /// Interprets `..` as [`NavTarget::Parent`] and anything else as a child name.
    pub fn parse(name: &str) -> Self {
        if name == PARENT {
            Self::Parent
        } else {
            Self::Child(name.to_string())
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str(PARENT),
            Self::Child(name) => f.write_str(name),
        }
    }
}

/// Computes the parent of `path` without touching the file system.
///
/// `./docs` goes to `.`, `.` goes to `..`, `..` goes to `../..`. A
/// filesystem root has no parent.
pub fn parent_of(path: &Path) -> Option<PathBuf> {
    match path.components().next_back() {
        Some(Component::Normal(_)) => {
            let parent = path.parent()?;
            if parent.as_os_str().is_empty() {
                Some(PathBuf::from("."))
            } else {
                Some(parent.to_path_buf())
            }
        }
        Some(Component::CurDir) if path.components().count() == 1 => Some(PathBuf::from(PARENT)),
        Some(Component::CurDir) | Some(Component::ParentDir) => Some(path.join(PARENT)),
        Some(Component::RootDir) | Some(Component::Prefix(_)) => None,
        None => Some(PathBuf::from(PARENT)),
    }
}

/// Joins `name` onto `path`, accepting only a single plain component.
pub fn child_of(path: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path.join(name)),
        _ => Err(ScratchError::directory(format!(
            "'{name}' is not a valid entry name"
        ))),
    }
}

/// Resolves `target` relative to `path`.
pub fn resolve(path: &Path, target: &NavTarget) -> Result<PathBuf> {
    match target {
        NavTarget::Parent => parent_of(path).ok_or_else(|| {
            ScratchError::directory(format!("{} has no parent directory", path.display()))
        }),
        NavTarget::Child(name) => child_of(path, name),
    }
}
