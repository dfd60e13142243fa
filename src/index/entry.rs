// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Index entry construction.
//!
//! Turns a scanned path into a [`MarkdownFile`] by deciding whether it belongs
//! in the index, and what title it gets.
//!
//! # Title Policy
//!
//! The first rule that applies wins:
//!
//! 1. A leading byte order mark is dropped. If the first line is `---`, a
//!    front matter block up to the next `---` or `...` line is skipped
//!    without looking at its contents.
//! 2. If the first non-blank line that remains is a level one heading, i.e.,
//!    a single `#` followed by a space or tab and some text, that text is the
//!    title. An optional closing run of `#` is dropped. Deeper headings like
//!    `## Usage` never count.
//! 3. Otherwise the title comes from the file name: extension stripped, split
//!    on hyphens, underscores, and whitespace, joined with single spaces.
//!    Only the first character of each word is upper-cased, the rest is kept
//!    as is, so `API-reference.md` becomes "API Reference".
//! 4. If nothing is left of the file name after that, the file name itself is
//!    the title.
//!
//! # Exclusion Policy
//!
//! A file is excluded if it is the index document itself, or if its relative
//! path matches any of the configured ignore globs. Globs are matched against
//! the whole relative path. A `*` never crosses a `/`, use `**` for that.

use crate::{
    config::IndexConfig,
    fs::FileSystem,
    index::{IndexError, Result},
    path::RelativePath,
};

use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::{debug, instrument};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Candidate entry of the index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFile {
    /// Location relative to repository root.
    pub path: RelativePath,

    /// Display title, never empty.
    pub title: String,

    /// Leave out of the index.
    pub excluded: bool,
}

/// Build index entries for scanned markdown files.
#[derive(Debug)]
pub struct EntryBuilder<'a, F>
where
    F: FileSystem,
{
    fs: &'a F,
    root: &'a Path,
    index: Option<RelativePath>,
    ignore: Vec<Pattern>,
}

impl<'a, F> EntryBuilder<'a, F>
where
    F: FileSystem,
{
    /// Construct new entry builder.
    ///
    /// # Errors
    ///
    /// - Return [`IndexError::InvalidPattern`] if an ignore glob cannot be
    ///   parsed.
    pub fn new(fs: &'a F, config: &'a IndexConfig) -> Result<Self> {
        let ignore = config
            .ignore
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| IndexError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fs,
            root: config.root(),
            index: config.index_entry(),
            ignore,
        })
    }

    /// Build entry for markdown file at relative path.
    ///
    /// Excluded files are never read.
    ///
    /// # Errors
    ///
    /// - Return [`IndexError::FileUnreadable`] if the file cannot be read.
    #[instrument(skip(self), level = "debug")]
    pub fn build(&self, path: RelativePath) -> Result<MarkdownFile> {
        let fallback = title_from_file_name(path.file_name());
        if self.is_excluded(&path) {
            debug!("exclude {path}");
            return Ok(MarkdownFile {
                path,
                title: fallback,
                excluded: true,
            });
        }

        let full_path = self.root.join(path.as_path());
        let contents = self
            .fs
            .read(&full_path)
            .map_err(|source| IndexError::FileUnreadable {
                path: full_path,
                source,
            })?;
        let title = title_from_content(&String::from_utf8_lossy(&contents)).unwrap_or(fallback);

        Ok(MarkdownFile {
            path,
            title,
            excluded: false,
        })
    }

    /// Check if relative path is the index document or matches an ignore glob.
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.index.as_ref() == Some(path)
            || self
                .ignore
                .iter()
                .any(|pattern| pattern.matches_with(path.as_str(), MATCH_OPTIONS))
    }
}

/// Extract title from level one heading at the top of markdown content.
pub fn title_from_content(content: &str) -> Option<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    skip_front_matter(content)
        .lines()
        .find(|line| !line.trim().is_empty())
        .and_then(heading_text)
}

/// Derive title from file name.
///
/// `getting-started.md` becomes "Getting Started".
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    let title = stem
        .split(|ch: char| ch == '-' || ch == '_' || ch.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        file_name.to_owned()
    } else {
        title
    }
}

fn skip_front_matter(content: &str) -> &str {
    let mut lines = content.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if first.trim_end() == "---" => first.len(),
        _ => return content,
    };

    for line in lines {
        offset += line.len();
        if matches!(line.trim_end(), "---" | "...") {
            return &content[offset..];
        }
    }

    // Never closed, so it was not front matter after all.
    content
}

fn heading_text(line: &str) -> Option<String> {
    let rest = line.strip_prefix('#')?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = strip_closing_sequence(rest.trim());
    if text.is_empty() {
        return None;
    }

    Some(text.to_owned())
}

fn strip_closing_sequence(text: &str) -> &str {
    let stripped = text.trim_end_matches('#');
    if stripped.len() == text.len() {
        return text;
    }

    if stripped.is_empty() {
        return stripped;
    }

    // Closing run must be set apart by whitespace, e.g., "C#" stays as is.
    if stripped.ends_with([' ', '\t']) {
        stripped.trim_end()
    } else {
        text
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
