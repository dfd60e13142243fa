// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Keep a markdown index document in sync with the markdown files of a
//! repository.
//!
//! The whole job is one linear pass: scan the repository tree for markdown
//! files, build a titled entry for each, render the index document, and write
//! it back only when its contents changed. See [`index`] for the pipeline
//! itself.

pub mod config;
pub mod fs;
pub mod index;
pub mod path;

pub use config::{ConfigError, IndexConfig};
pub use fs::{DiskFs, FileSystem, MemoryFs};
pub use index::{check, generate, update, IndexDocument, IndexError, MarkdownFile};
pub use path::RelativePath;
