// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! File system access.
//!
//! Index generation never touches the disk directly. Every walk, read, and
//! write goes through the [`FileSystem`] trait, so the scan, build, and render
//! stages stay pure functions of whatever tree they are handed.
//!
//! Two implementations exist:
//!
//! 1. [`DiskFs`], the real file system, walked through the `ignore` crate.
//! 2. [`MemoryFs`], an in-memory tree for deterministic testing.

use ignore::WalkBuilder;
use std::{
    cell::RefCell,
    collections::BTreeSet,
    ffi::OsStr,
    fs::{read, remove_file, rename, write},
    io::{Error, ErrorKind, Result},
    path::{Component, Path, PathBuf},
};
use tracing::{debug, instrument};

/// Lazy sequence of file paths produced by [`FileSystem::walk`].
pub type Walk<'a> = Box<dyn Iterator<Item = Result<PathBuf>> + 'a>;

/// Tuning knobs for a file system walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Directory names to prune from the walk. Never applied to the root.
    pub skip_dir: fn(&OsStr) -> bool,

    /// Honor `.gitignore` and `.ignore` rules found in the tree.
    pub respect_gitignore: bool,
}

/// Layer of indirection for file system access.
pub trait FileSystem {
    /// Check that path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check that path exists and is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Recursively list regular files under root.
    ///
    /// Yielded paths are root joined with the file's location. Symbolic links
    /// are never followed, nor yielded.
    fn walk<'a>(&'a self, root: &'a Path, options: WalkOptions) -> Walk<'a>;

    /// Read entire contents of file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace entire contents of file, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl DiskFs {
    /// Construct new disk file system handle.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for DiskFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn walk<'a>(&'a self, root: &'a Path, options: WalkOptions) -> Walk<'a> {
        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false).follow_links(false);
        if options.respect_gitignore {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .ignore(true)
                .parents(true)
                .require_git(false);
        }

        let skip_dir = options.skip_dir;
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|kind| kind.is_dir());
            !(entry.depth() > 0 && is_dir && skip_dir(entry.file_name()))
        });

        Box::new(builder.build().filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_some_and(|kind| kind.is_file()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(error) => Some(Err(Error::other(error))),
        }))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        read(path)
    }

    /// Replace file contents in one step.
    ///
    /// Contents are written to a temporary sibling first, which is then
    /// renamed over the target. An interrupted write never leaves a partial
    /// file behind at the target path.
    #[instrument(skip(self, contents), level = "debug")]
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let file_name = path.file_name().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("{:?} does not name a file", path.display()),
            )
        })?;
        let parent = path.parent().unwrap_or(Path::new(""));

        if !parent.as_os_str().is_empty() {
            mkdirp::mkdirp(parent)?;
        }

        let mut temp_name = OsStr::new(".").to_os_string();
        temp_name.push(file_name);
        temp_name.push(".tmp");
        let temp_path = parent.join(temp_name);

        debug!("stage contents at {:?}", temp_path.display());
        write(&temp_path, contents)?;
        if let Err(error) = rename(&temp_path, path) {
            let _ = remove_file(&temp_path);
            return Err(error);
        }

        Ok(())
    }
}

/// In-memory file system.
///
/// Files are kept in insertion order, and walked in that order. Callers that
/// depend on a particular ordering have to sort for themselves.
///
/// Directories exist implicitly as the ancestors of any file, or explicitly
/// through [`MemoryFs::with_dir`].
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: RefCell<BTreeSet<PathBuf>>,
    files: RefCell<Vec<(PathBuf, Option<Vec<u8>>)>>,
}

impl MemoryFs {
    /// Construct new empty in-memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    /// Add a file with given contents.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path.into(), Some(contents.as_ref().to_vec()));
        self
    }

    /// Add a file whose contents cannot be read, nor replaced.
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), None);
        self
    }

    /// Current contents of file, if any.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .borrow()
            .iter()
            .find(|(file, _)| file == path.as_ref())
            .and_then(|(_, contents)| contents.clone())
    }

    fn insert(&self, path: PathBuf, contents: Option<Vec<u8>>) {
        let mut files = self.files.borrow_mut();
        match files.iter_mut().find(|(file, _)| *file == path) {
            Some((_, current)) => *current = contents,
            None => files.push((path, contents)),
        }
    }
}

impl FileSystem for MemoryFs {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().iter().any(|dir| dir.starts_with(path))
            || self
                .files
                .borrow()
                .iter()
                .any(|(file, _)| file != path && file.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().iter().any(|(file, _)| file == path)
    }

    /// Walk files under root.
    ///
    /// `.gitignore` rules are not modeled, so `respect_gitignore` has no
    /// effect here.
    fn walk<'a>(&'a self, root: &'a Path, options: WalkOptions) -> Walk<'a> {
        let paths = self
            .files
            .borrow()
            .iter()
            .filter(|(file, _)| {
                let Ok(relative) = file.strip_prefix(root) else {
                    return false;
                };

                // INVARIANT: Prune files that sit below a skipped directory.
                relative
                    .parent()
                    .into_iter()
                    .flat_map(Path::components)
                    .all(|component| match component {
                        Component::Normal(name) => !(options.skip_dir)(name),
                        _ => true,
                    })
            })
            .map(|(file, _)| file.clone())
            .collect::<Vec<_>>();

        Box::new(paths.into_iter().map(Ok))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let files = self.files.borrow();
        match files.iter().find(|(file, _)| file == path) {
            Some((_, Some(contents))) => Ok(contents.clone()),
            Some((_, None)) => Err(Error::new(
                ErrorKind::PermissionDenied,
                format!("{:?} is unreadable", path.display()),
            )),
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("{:?} does not exist", path.display()),
            )),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let files = self.files.borrow();
        if files.iter().any(|(file, current)| file == path && current.is_none()) {
            return Err(Error::new(
                ErrorKind::PermissionDenied,
                format!("{:?} is read-only", path.display()),
            ));
        }

        // INVARIANT: A file cannot be written below another file.
        if files.iter().any(|(file, _)| path != file && path.starts_with(file)) {
            return Err(Error::other(format!(
                "{:?} has a file as an ancestor",
                path.display()
            )));
        }
        drop(files);

        self.insert(path.to_path_buf(), Some(contents.to_vec()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::fs::{create_dir_all, read_dir, read_to_string};

    fn skip_dotted(name: &OsStr) -> bool {
        name.to_string_lossy().starts_with('.')
    }

    const OPTIONS: WalkOptions = WalkOptions {
        skip_dir: skip_dotted,
        respect_gitignore: false,
    };

    fn sorted(walk: Walk<'_>) -> Result<Vec<PathBuf>> {
        let mut paths = walk.collect::<Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }

    #[sealed_test]
    fn disk_walk_prunes_skipped_dirs() -> anyhow::Result<()> {
        create_dir_all("repo/.git/refs")?;
        create_dir_all("repo/docs/.drafts")?;
        write("repo/.git/refs/notes.md", "")?;
        write("repo/docs/.drafts/wip.md", "")?;
        write("repo/docs/guide.md", "")?;
        write("repo/.hidden.md", "")?;
        write("repo/README.md", "")?;

        let root = Path::new("repo");
        let result = sorted(DiskFs::new().walk(root, OPTIONS))?;
        let expect = vec![
            PathBuf::from("repo/.hidden.md"),
            PathBuf::from("repo/README.md"),
            PathBuf::from("repo/docs/guide.md"),
        ];
        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test]
    fn disk_walk_keeps_dotted_root() -> anyhow::Result<()> {
        create_dir_all(".repo/sub")?;
        write(".repo/sub/a.md", "")?;

        let result = sorted(DiskFs::new().walk(Path::new(".repo"), OPTIONS))?;
        assert_eq!(result, vec![PathBuf::from(".repo/sub/a.md")]);

        Ok(())
    }

    #[sealed_test]
    fn disk_walk_honors_gitignore_when_asked() -> anyhow::Result<()> {
        create_dir_all("repo/build")?;
        write("repo/.gitignore", "build/\n")?;
        write("repo/build/out.md", "")?;
        write("repo/a.md", "")?;

        let root = Path::new("repo");
        let result = sorted(DiskFs::new().walk(root, OPTIONS))?;
        assert!(result.contains(&PathBuf::from("repo/build/out.md")));

        let options = WalkOptions {
            respect_gitignore: true,
            ..OPTIONS
        };
        let result = sorted(DiskFs::new().walk(root, options))?;
        assert!(!result.contains(&PathBuf::from("repo/build/out.md")));
        assert!(result.contains(&PathBuf::from("repo/a.md")));

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn disk_walk_never_follows_symlinks() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        create_dir_all("repo/sub")?;
        write("repo/sub/a.md", "")?;
        symlink("..", "repo/sub/loop")?;
        symlink("a.md", "repo/sub/alias.md")?;

        let result = sorted(DiskFs::new().walk(Path::new("repo"), OPTIONS))?;
        assert_eq!(result, vec![PathBuf::from("repo/sub/a.md")]);

        Ok(())
    }

    #[sealed_test]
    fn disk_write_replaces_whole_file() -> anyhow::Result<()> {
        let fs = DiskFs::new();
        let path = Path::new("repo/docs/index.md");

        fs.write(path, b"first version\nwith two lines\n")?;
        fs.write(path, b"second\n")?;
        assert_eq!(read_to_string(path)?, "second\n");

        // No staging leftovers.
        let names = read_dir("repo/docs")?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(names, vec![OsStr::new("index.md").to_os_string()]);

        Ok(())
    }

    #[sealed_test]
    fn disk_write_fails_below_file() -> anyhow::Result<()> {
        write("blocker", "")?;
        let result = DiskFs::new().write(Path::new("blocker/index.md"), b"");
        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn memory_walk_prunes_skipped_dirs() -> Result<()> {
        let fs = MemoryFs::new()
            .with_file("/repo/b.md", "")
            .with_file("/repo/.github/template.md", "")
            .with_file("/repo/docs/a.md", "")
            .with_file("/other/c.md", "");

        let result = sorted(fs.walk(Path::new("/repo"), OPTIONS))?;
        let expect = vec![PathBuf::from("/repo/b.md"), PathBuf::from("/repo/docs/a.md")];
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn memory_directories() {
        let fs = MemoryFs::new()
            .with_dir("/empty")
            .with_file("/repo/docs/a.md", "");

        assert!(fs.is_dir(Path::new("/empty")));
        assert!(fs.is_dir(Path::new("/repo")));
        assert!(fs.is_dir(Path::new("/repo/docs")));
        assert!(!fs.is_dir(Path::new("/repo/docs/a.md")));
        assert!(!fs.is_dir(Path::new("/missing")));
        assert!(fs.is_file(Path::new("/repo/docs/a.md")));
        assert!(!fs.is_file(Path::new("/repo/docs")));
    }

    #[test]
    fn memory_read_and_write() -> Result<()> {
        let fs = MemoryFs::new()
            .with_file("/repo/a.md", "# Alpha\n")
            .with_unreadable("/repo/locked.md");

        assert_eq!(fs.read(Path::new("/repo/a.md"))?, b"# Alpha\n");

        let error = fs.read(Path::new("/repo/missing.md")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = fs.read(Path::new("/repo/locked.md")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::PermissionDenied);
        assert!(fs.write(Path::new("/repo/locked.md"), b"").is_err());
        assert!(fs.write(Path::new("/repo/a.md/index.md"), b"").is_err());

        fs.write(Path::new("/repo/a.md"), b"# Beta\n")?;
        assert_eq!(fs.contents("/repo/a.md"), Some(b"# Beta\n".to_vec()));

        Ok(())
    }
}
