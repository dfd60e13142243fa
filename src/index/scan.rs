// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Markdown file discovery.
//!
//! The scanner walks the repository tree and yields the relative path of every
//! markdown file it finds. Directories whose name begins with a dot are never
//! entered, so `.git`, `.github`, and friends stay out of the index. Symbolic
//! links are never followed.

use crate::{
    config::IndexConfig,
    fs::{FileSystem, WalkOptions},
    index::{IndexError, Result},
    path::RelativePath,
};

use std::{ffi::OsStr, path::Path};
use tracing::{debug, instrument};

/// Walk repository tree for markdown files.
#[derive(Debug)]
pub struct Scanner<'a, F>
where
    F: FileSystem,
{
    fs: &'a F,
    root: &'a Path,
    extensions: &'a [String],
    respect_gitignore: bool,
}

impl<'a, F> Scanner<'a, F>
where
    F: FileSystem,
{
    /// Construct new scanner over the repository root of configuration.
    pub fn new(fs: &'a F, config: &'a IndexConfig) -> Self {
        Self {
            fs,
            root: config.root(),
            extensions: config.extensions.as_slice(),
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Lazily list markdown files under repository root.
    ///
    /// Paths come out in whatever order the file system walks them.
    ///
    /// # Errors
    ///
    /// - Return [`IndexError::RootNotFound`] up front if the repository root
    ///   is missing or not a directory.
    /// - Yield [`IndexError::ScanFailed`] if part of the tree cannot be
    ///   walked.
    #[instrument(skip(self), fields(root = ?self.root.display()), level = "debug")]
    pub fn scan(&self) -> Result<impl Iterator<Item = Result<RelativePath>> + 'a> {
        if !self.fs.is_dir(self.root) {
            return Err(IndexError::RootNotFound {
                root: self.root.to_path_buf(),
            });
        }

        let fs = self.fs;
        let root = self.root;
        let extensions = self.extensions;
        let options = WalkOptions {
            skip_dir: is_skipped_dir,
            respect_gitignore: self.respect_gitignore,
        };

        Ok(fs
            .walk(root, options)
            .filter_map(move |entry| match entry {
                Ok(path) if has_markdown_extension(&path, extensions) => {
                    let relative = RelativePath::from_path(root, &path);
                    if relative.is_none() {
                        debug!("skip {:?}, not under root", path.display());
                    }
                    relative.map(Ok)
                }
                Ok(_) => None,
                Err(source) => Some(Err(IndexError::ScanFailed {
                    root: root.to_path_buf(),
                    source,
                })),
            }))
    }
}

/// Directory names that are never entered.
pub fn is_skipped_dir(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Check if path carries one of the markdown extensions, ignoring ASCII case.
pub fn has_markdown_extension(path: impl AsRef<Path>, extensions: &[String]) -> bool {
    path.as_ref()
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
