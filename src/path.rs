// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository-relative path handling.
//!
//! Every markdown file is identified by its path relative to the repository
//! root. That path doubles as the sort key of the index and as the link
//! target, so it must look the same no matter which host produced it.

use std::{
    ffi::OsStr,
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Component, Path, PathBuf},
};

/// Forward-slash normalized path relative to the repository root.
///
/// # Invariant
///
/// - Never empty.
/// - Segments are joined with `/` regardless of host path conventions.
/// - Contains no `.` or `..` segments, and never escapes the root.
///
/// Ordering is plain byte-wise comparison of the normalized string. Names
/// that are not valid UTF-8 are shown lossily, but the host form is kept
/// alongside, so two such names never compare equal by accident.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    text: String,
    host: PathBuf,
}

impl RelativePath {
    /// Normalize a relative path given as a string.
    ///
    /// Returns `None` if the path is empty, absolute, or escapes its root.
    pub fn new(path: impl AsRef<str>) -> Option<Self> {
        Self::from_relative(Path::new(path.as_ref()))
    }

    /// Normalize `path` relative to `root`.
    ///
    /// Both sides are normalized lexically first, so `.` and `..` segments do
    /// not get in the way. Returns `None` if `path` does not live under `root`.
    pub fn from_path(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<Self> {
        let root = lexical(root.as_ref());
        let path = lexical(path.as_ref());
        path.strip_prefix(root).ok().and_then(Self::from_relative)
    }

    /// Normalize an already relative path.
    ///
    /// Returns `None` if the path is empty, absolute, or escapes its root.
    pub fn from_relative(path: impl AsRef<Path>) -> Option<Self> {
        let mut segments: Vec<&OsStr> = Vec::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(segment) => segments.push(segment),
                Component::CurDir => continue,
                Component::ParentDir => {
                    segments.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if segments.is_empty() {
            return None;
        }

        let text = segments
            .iter()
            .map(|segment| segment.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let host = segments.iter().collect::<PathBuf>();

        Some(Self { text, host })
    }

    /// Treat relative path as string slice.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Relative path as the host file system spells it.
    pub fn as_path(&self) -> &Path {
        self.host.as_path()
    }

    /// Final segment of the path.
    pub fn file_name(&self) -> &str {
        self.text
            .rsplit_once('/')
            .map_or(self.text.as_str(), |(_, name)| name)
    }
}

/// Resolve `.` and `..` segments without touching the file system.
fn lexical(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir
                if matches!(resolved.components().next_back(), Some(Component::Normal(_))) =>
            {
                resolved.pop();
            }
            component => resolved.push(component),
        }
    }

    resolved
}

impl Display for RelativePath {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
