// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Index document persistence.
//!
//! The rendered document replaces the index file only when the bytes differ,
//! so runs over an unchanged repository never touch the file. Callers use the
//! returned "changed" signal to decide whether there is anything to commit.

use crate::{
    fs::FileSystem,
    index::{IndexError, Result},
};

use std::{io::ErrorKind, path::Path};
use tracing::{debug, info, instrument};

/// Write rendered document to path if its current contents differ.
///
/// Returns `true` if the file was written.
///
/// # Errors
///
/// - Return [`IndexError::FileUnreadable`] if the current file exists but
///   cannot be read.
/// - Return [`IndexError::WriteFailed`] if the file cannot be replaced.
#[instrument(skip(fs, rendered), level = "debug")]
pub fn write_if_changed<F>(fs: &F, path: &Path, rendered: &str) -> Result<bool>
where
    F: FileSystem,
{
    if !is_stale(fs, path, rendered)? {
        debug!("{:?} is up to date", path.display());
        return Ok(false);
    }

    fs.write(path, rendered.as_bytes())
        .map_err(|source| IndexError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    info!("update {:?}", path.display());

    Ok(true)
}

/// Check if file at path differs from rendered document.
///
/// A missing file is always stale. So is a path that cannot hold a file at
/// all, which is left for the write itself to report.
///
/// # Errors
///
/// - Return [`IndexError::FileUnreadable`] if the current file exists but
///   cannot be read.
pub fn is_stale<F>(fs: &F, path: &Path, rendered: &str) -> Result<bool>
where
    F: FileSystem,
{
    match fs.read(path) {
        Ok(current) => Ok(current != rendered.as_bytes()),
        Err(error) if error.kind() == ErrorKind::NotFound || !fs.is_file(path) => Ok(true),
        Err(source) => Err(IndexError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}
