// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Index document generation.
//!
//! The __index document__ is a single markdown file at the repository root
//! that links to every other markdown file in the repository. It is fully
//! regenerated on every run, never patched in place.
//!
//! # Pipeline
//!
//! Generation is one linear pass with no state carried between runs except
//! the index file itself:
//!
//! 1. [`scan`] walks the repository tree for markdown files.
//! 2. [`entry`] gives each file a title, and drops the ones that must not be
//!    listed, like the index document itself.
//! 3. [`render`] sorts the entries by path and renders the document.
//! 4. [`write`] replaces the index file, but only if its contents changed.
//!
//! Any failure aborts the whole run before the index file is touched. Either
//! a complete, correct index is in place afterwards, or the previous one is
//! left as it was.

pub mod entry;
pub mod render;
pub mod scan;
pub mod write;

pub use entry::{EntryBuilder, MarkdownFile};
pub use render::IndexDocument;
pub use scan::Scanner;

use crate::{config::IndexConfig, fs::FileSystem};

use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Generate index document for repository described by configuration.
///
/// Performs no writes.
///
/// # Errors
///
/// - Return [`IndexError::InvalidPattern`] if an ignore glob is invalid.
/// - Return [`IndexError::RootNotFound`] if the repository root is missing.
/// - Return [`IndexError::ScanFailed`] if the tree cannot be walked.
/// - Return [`IndexError::FileUnreadable`] if a markdown file cannot be read.
#[instrument(skip(fs, config), fields(root = ?config.root().display()), level = "debug")]
pub fn generate<F>(fs: &F, config: &IndexConfig) -> Result<IndexDocument>
where
    F: FileSystem,
{
    let builder = EntryBuilder::new(fs, config)?;
    let mut document = IndexDocument::new(config.header.as_str(), config.footer.as_str());
    if let Some(prefix) = &config.link_prefix {
        document = document.with_link_prefix(prefix.as_str());
    }

    for path in Scanner::new(fs, config).scan()? {
        let file = builder.build(path?)?;
        debug!("found {} as {:?}", file.path, file.title);
        document.insert(file);
    }

    info!("index {} markdown files", document.len());

    Ok(document)
}

/// Regenerate index document, and write it back if it changed.
///
/// Returns `true` if the index file was written.
///
/// # Errors
///
/// - Return any error of [`generate`].
/// - Return [`IndexError::FileUnreadable`] if the current index file exists
///   but cannot be read.
/// - Return [`IndexError::WriteFailed`] if the index file cannot be written.
pub fn update<F>(fs: &F, config: &IndexConfig) -> Result<bool>
where
    F: FileSystem,
{
    let rendered = generate(fs, config)?.to_string();
    write::write_if_changed(fs, &config.index_path(), &rendered)
}

/// Regenerate index document, and report if the index file is out of date.
///
/// Never writes.
///
/// # Errors
///
/// - Return any error of [`generate`].
/// - Return [`IndexError::FileUnreadable`] if the current index file exists
///   but cannot be read.
pub fn check<F>(fs: &F, config: &IndexConfig) -> Result<bool>
where
    F: FileSystem,
{
    let rendered = generate(fs, config)?.to_string();
    write::is_stale(fs, &config.index_path(), &rendered)
}

/// Index generation error types.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Repository root does not exist, or is not a directory.
    #[error("repository root {:?} not found", root.display())]
    RootNotFound { root: PathBuf },

    /// Repository tree cannot be walked.
    #[error("failed to scan repository tree at {:?}", root.display())]
    ScanFailed {
        #[source]
        source: std::io::Error,
        root: PathBuf,
    },

    /// Markdown file or current index file cannot be read.
    #[error("failed to read {:?}", path.display())]
    FileUnreadable {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Index file cannot be written.
    #[error("failed to write index to {:?}", path.display())]
    WriteFailed {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Ignore glob cannot be parsed.
    #[error("invalid ignore pattern {pattern:?}")]
    InvalidPattern {
        #[source]
        source: glob::PatternError,
        pattern: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = IndexError> = std::result::Result<T, E>;
