//! Filesystem effects used by the extractor.
//!
//! Extraction only ever creates directories, creates files, removes a partial
//! file, and resolves the destination root. Keeping that surface behind a trait
//! lets tests inject failures (disk full, permission denied, short writes)
//! without touching real disk state.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// Create `path` and any missing parents. `mode` applies on Unix only.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Open `path` write-only, creating it if missing and truncating it otherwise.
    fn create_file(&self, path: &Path, mode: u32) -> io::Result<Box<dyn Write>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Resolve `path` to an absolute path with symlinks followed.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn create_dir_all(&self, path: &Path, _mode: u32) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(_mode);
        }
        builder.create(path)
    }

    fn create_file(&self, path: &Path, _mode: u32) -> io::Result<Box<dyn Write>> {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(_mode);
        }
        Ok(Box::new(options.open(path)?))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> { std::fs::remove_file(path) }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> { std::fs::canonicalize(path) }
}
