// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the optional `mdindex.toml` file that tunes index
//! generation. File I/O is left to the caller to figure out.
//!
//! # General Layout
//!
//! Every key is optional. Missing keys fall back to the defaults of
//! [`IndexConfig::default`]:
//!
//! ```toml
//! index = "index.md"
//! ignore = ["drafts/**"]
//! extensions = ["md"]
//! header = "# Index\n\n"
//! footer = ""
//! link_prefix = "https://example.org/blob/main/"
//! respect_gitignore = false
//! ```
//!
//! The repository root is never read from the file. It is whatever the
//! caller decides to scan.

use crate::path::RelativePath;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{absolute, Path, PathBuf},
    str::FromStr,
};

/// Name of the configuration file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "mdindex.toml";

/// Default name of the index document at the repository root.
pub const DEFAULT_INDEX: &str = "index.md";

/// Default header placed above the entry listing.
pub const DEFAULT_HEADER: &str = "# Index\n\n";

/// Index generation settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Repository root to scan.
    #[serde(skip, default = "default_root")]
    pub root: PathBuf,

    /// Index document path, relative to the repository root.
    pub index: PathBuf,

    /// Globs of repository-relative paths to leave out of the index.
    pub ignore: Vec<String>,

    /// File extensions that mark a file as markdown.
    pub extensions: Vec<String>,

    /// Static text placed above the entry listing.
    pub header: String,

    /// Static text placed below the entry listing.
    pub footer: String,

    /// Prefix prepended verbatim to every link target.
    pub link_prefix: Option<String>,

    /// Honor `.gitignore` and `.ignore` rules while scanning.
    pub respect_gitignore: bool,
}

impl IndexConfig {
    /// Use `root` as the repository root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Path of the index document on the file system.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }

    /// Path of the index document as it would appear in a scan.
    ///
    /// Returns `None` if the index document lives outside of the repository
    /// root, in which case it can never be listed as its own entry.
    pub fn index_entry(&self) -> Option<RelativePath> {
        // INVARIANT: Resolve root and index path against the same base.
        let root = absolute(&self.root).ok()?;
        let index = absolute(self.index_path()).ok()?;
        RelativePath::from_path(root, index)
    }

    /// Treat repository root as [`Path`] slice.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index: PathBuf::from(DEFAULT_INDEX),
            ignore: Vec::new(),
            extensions: vec!["md".into()],
            header: DEFAULT_HEADER.into(),
            footer: String::new(),
            link_prefix: None,
            respect_gitignore: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl FromStr for IndexConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: IndexConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on index path field.
        config.index = PathBuf::from(
            shellexpand::full(config.index.to_string_lossy().as_ref())
                .map_err(ConfigError::ShellExpansion)?
                .into_owned(),
        );

        Ok(config)
    }
}

impl Display for IndexConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}
