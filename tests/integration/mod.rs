// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::RepoFixture;

use anyhow::Result;
use indoc::indoc;
use mdindex::{check, update, DiskFs, IndexConfig, IndexError};
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::path::{absolute, Path, PathBuf};

#[sealed_test]
fn update_repository_on_disk() -> Result<()> {
    let repo = RepoFixture::new("repo")?;
    repo.add_file("a.md", "# Alpha\n\nFirst.\n")?;
    repo.add_file("sub/b.md", "Plain text.\n")?;
    repo.add_file("docs/getting-started.md", "---\ntitle: x\n---\nWelcome.\n")?;
    repo.add_file(".github/CONTRIBUTING.md", "# Contributing\n")?;
    repo.add_file("assets/logo.svg", "<svg/>")?;

    let fs = DiskFs::new();
    let config = repo.config();
    assert!(check(&fs, &config)?);
    assert!(update(&fs, &config)?);

    let result = repo.read_file("index.md")?;
    let expect = indoc! {r#"
        # Index

        - [Alpha](a.md)
        - [Getting Started](docs/getting-started.md)
        - [B](sub/b.md)
    "#};
    assert_eq!(result, expect);

    // Second run over the same tree is a no-op.
    assert!(!update(&fs, &config)?);
    assert!(!check(&fs, &config)?);
    assert_eq!(repo.read_file("index.md")?, expect);

    // Adding a document changes the index again.
    repo.add_file("c.md", "# Gamma\n")?;
    assert!(check(&fs, &config)?);
    assert!(update(&fs, &config)?);
    assert!(repo.read_file("index.md")?.contains("- [Gamma](c.md)\n"));

    Ok(())
}

#[sealed_test]
fn config_file_drives_generation() -> Result<()> {
    let repo = RepoFixture::new("repo")?;
    repo.add_file("post.md", "# Post\n")?;
    repo.add_file("drafts/wip.md", "# WIP\n")?;
    repo.add_file("build/generated.md", "# Generated\n")?;
    repo.add_file(".gitignore", "build/\n")?;
    repo.add_file(
        "mdindex.toml",
        indoc! {r##"
            index = "docs/INDEX.md"
            ignore = ["drafts/**"]
            header = "# Posts\n\n"
            footer = "\n_Maintained by mdindex._\n"
            respect_gitignore = true
        "##},
    )?;

    let config = IndexConfig {
        root: PathBuf::from("repo"),
        ..repo.read_file("mdindex.toml")?.parse::<IndexConfig>()?
    };
    assert!(update(&DiskFs::new(), &config)?);

    let result = repo.read_file("docs/INDEX.md")?;
    let expect = indoc! {r#"
        # Posts

        - [Post](post.md)

        _Maintained by mdindex._
    "#};
    assert_eq!(result, expect);

    Ok(())
}

#[sealed_test]
fn empty_repository_keeps_matching_index() -> Result<()> {
    let repo = RepoFixture::new("repo")?;
    repo.add_file("index.md", "# Index\n")?;

    let fs = DiskFs::new();
    assert!(!update(&fs, &repo.config())?);
    assert_eq!(repo.read_file("index.md")?, "# Index\n");

    Ok(())
}

#[sealed_test]
fn missing_root_writes_nothing() -> Result<()> {
    let config = IndexConfig::default().with_root("nowhere");

    let result = update(&DiskFs::new(), &config);
    assert!(matches!(result, Err(IndexError::RootNotFound { .. })));
    assert!(!Path::new("nowhere").exists());

    Ok(())
}

#[sealed_test]
fn blocked_index_path_fails_to_write() -> Result<()> {
    let repo = RepoFixture::new("repo")?;
    repo.add_file("a.md", "# Alpha\n")?;
    repo.add_file("docs", "a file where a directory should be")?;

    let config = IndexConfig {
        index: PathBuf::from("docs/index.md"),
        ..repo.config()
    };

    let result = update(&DiskFs::new(), &config);
    assert!(matches!(result, Err(IndexError::WriteFailed { .. })));
    assert_eq!(repo.read_file("docs")?, "a file where a directory should be");

    Ok(())
}

#[sealed_test]
fn absolute_index_path_is_excluded() -> Result<()> {
    let repo = RepoFixture::new("repo")?;
    repo.add_file("a.md", "# Alpha\n")?;

    let config = IndexConfig {
        index: absolute("repo/index.md")?,
        ..repo.config()
    };
    let fs = DiskFs::new();
    assert!(update(&fs, &config)?);
    assert!(!update(&fs, &config)?);

    let expect = indoc! {r#"
        # Index

        - [Alpha](a.md)
    "#};
    assert_eq!(repo.read_file("index.md")?, expect);

    Ok(())
}

#[cfg(target_os = "linux")]
#[sealed_test]
fn non_utf8_file_names_are_indexed() -> Result<()> {
    use std::{ffi::OsStr, fs::write, os::unix::ffi::OsStrExt};

    let repo = RepoFixture::new("repo")?;
    repo.add_file("a.md", "# Alpha\n")?;
    write(
        Path::new("repo").join(OsStr::from_bytes(b"caf\xe9.md")),
        "# Cafe\n",
    )?;

    assert!(update(&DiskFs::new(), &repo.config())?);

    let expect = indoc! {"
        # Index

        - [Alpha](a.md)
        - [Cafe](caf\u{fffd}.md)
    "};
    assert_eq!(repo.read_file("index.md")?, expect);

    Ok(())
}
