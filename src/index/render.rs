// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Index document rendering.
//!
//! # Document Layout
//!
//! ```text
//! <header>
//! - [<title>](<link>)
//! - [<title>](<link>)
//! <footer>
//! ```
//!
//! One list line per entry, ordered by relative path. Line endings are
//! always `\n`, and a non-empty document always ends with exactly one
//! newline. The same set of entries always renders to the same bytes.

use crate::{index::MarkdownFile, path::RelativePath};

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult, Write},
};

/// Index document listing markdown files.
///
/// # Invariant
///
/// - Entries are unique and ordered by relative path.
/// - Excluded files never make it in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    header: String,
    footer: String,
    link_prefix: Option<String>,
    entries: BTreeMap<RelativePath, String>,
}

impl IndexDocument {
    /// Construct new empty index document.
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
            ..Self::default()
        }
    }

    /// Prepend prefix to every link target.
    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = Some(prefix.into());
        self
    }

    /// Insert a markdown file as an entry.
    ///
    /// Excluded files are dropped. Returns `true` if the entry was added.
    pub fn insert(&mut self, file: MarkdownFile) -> bool {
        if file.excluded {
            return false;
        }

        self.entries.insert(file.path, file.title).is_none()
    }

    /// Ordered listing of `(path, title)` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.entries
            .iter()
            .map(|(path, title)| (path, title.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if document lists no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn link_target(&self, path: &RelativePath) -> String {
        let target = match &self.link_prefix {
            Some(prefix) => format!("{prefix}{path}"),
            None => path.to_string(),
        };

        if target.contains([' ', '\t', '(', ')']) {
            format!("<{target}>")
        } else {
            target
        }
    }
}

impl Display for IndexDocument {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let mut out = String::new();
        push_block(&mut out, &self.header);
        for (path, title) in self.entries() {
            writeln!(out, "- [{}]({})", escape_title(title), self.link_target(path))?;
        }
        push_block(&mut out, &self.footer);

        // INVARIANT: Exactly one trailing newline, or nothing at all.
        let body = out.trim_end_matches('\n');
        if body.is_empty() {
            return Ok(());
        }

        writeln!(fmt, "{body}")
    }
}

fn push_block(out: &mut String, block: &str) {
    if block.is_empty() {
        return;
    }

    out.push_str(&block.replace("\r\n", "\n"));
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

fn escape_title(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for ch in title.chars() {
        if matches!(ch, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}
