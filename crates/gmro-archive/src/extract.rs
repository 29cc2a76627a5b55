//! Bounded extraction of untrusted zip archives.
//!
//! A call moves through two phases. Validation scans entry metadata and can
//! reject the archive before anything touches disk. Extraction then walks the
//! entries in archive order and, for each one:
//!
//! 1. cleans the raw name and rejects absolute or `..`-escaping paths,
//! 2. rejects names nested deeper than the depth limit,
//! 3. joins the name onto the canonical destination and re-checks containment,
//! 4. creates the directory, or copies the file through a hard byte ceiling of
//!    `max_file_size + 1` that ignores the declared size,
//! 5. adds the bytes actually written to a running total checked against
//!    `max_total_size`.
//!
//! The first failure aborts the call. Entries already written stay on disk;
//! only the failing entry's partial file is removed.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::effects::{FileSystem, OsFileSystem};
use crate::entry::{ArchiveEntry, DEFAULT_DIR_MODE, EntryKind, ExtractedEntry, ExtractionReport};
use crate::error::{Error, Result};
use crate::limits::ExtractionLimits;
use crate::sanitize::{resolve_within, sanitize_entry_name};
use crate::source::{EntrySource, ZipSource};
use crate::validate::validate;

/// Per-call bookkeeping. Never outlives one extraction.
#[derive(Debug, Default)]
struct ExtractionState {
    total_written:     u64,
    entries_processed: usize,
}

/// Extract the zip archive at `archive` into `destination` using the real
/// filesystem.
pub fn extract(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    limits: &ExtractionLimits,
) -> Result<ExtractionReport> {
    extract_with(archive, destination, limits, &OsFileSystem)
}

/// Extract the zip archive at `archive` through the given filesystem.
pub fn extract_with<F: FileSystem>(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    limits: &ExtractionLimits,
    fs: &F,
) -> Result<ExtractionReport> {
    let archive = archive.as_ref();
    let mut source = ZipSource::open_path(archive)?;
    debug!(archive = %archive.display(), entries = source.entries().len(), "opened archive");
    extract_source(&mut source, destination, limits, fs)
}

/// Extract every entry of an already-open source.
pub fn extract_source<S: EntrySource, F: FileSystem>(
    source: &mut S,
    destination: impl AsRef<Path>,
    limits: &ExtractionLimits,
    fs: &F,
) -> Result<ExtractionReport> {
    limits.check()?;
    let summary = validate(source.entries(), limits)?;
    debug!(
        entries = summary.entry_count,
        declared_total = summary.declared_total,
        "archive passed validation"
    );

    let root = prepare_destination(destination.as_ref(), fs)?;

    let mut state = ExtractionState::default();
    let mut extracted = Vec::with_capacity(summary.entry_count);
    for index in 0..summary.entry_count {
        let entry = source.entries()[index].clone();
        let done = extract_entry(source, index, &entry, &root, limits, fs, &mut state)?;
        extracted.push(done);
    }

    info!(
        destination = %root.display(),
        entries = state.entries_processed,
        bytes = state.total_written,
        "extraction complete"
    );

    Ok(ExtractionReport {
        destination: root,
        entries: extracted,
        total_bytes: state.total_written,
    })
}

/// Make the destination absolute, create it, and resolve symlinks so the
/// containment check compares against the real location.
fn prepare_destination<F: FileSystem>(destination: &Path, fs: &F) -> Result<PathBuf> {
    let destination_failed = |source: io::Error| Error::DestinationFailed {
        path: destination.to_path_buf(),
        source,
    };

    let absolute = std::path::absolute(destination).map_err(destination_failed)?;
    fs.create_dir_all(&absolute, DEFAULT_DIR_MODE)
        .map_err(destination_failed)?;
    fs.canonicalize(&absolute).map_err(destination_failed)
}

fn extract_entry<S: EntrySource, F: FileSystem>(
    source: &mut S,
    index: usize,
    entry: &ArchiveEntry,
    root: &Path,
    limits: &ExtractionLimits,
    fs: &F,
    state: &mut ExtractionState,
) -> Result<ExtractedEntry> {
    let target = sanitize_entry_name(&entry.name, limits.get_max_depth())
        .and_then(|sanitized| resolve_within(root, &sanitized, &entry.name, entry.is_directory()))
        .inspect_err(|e| warn!(entry = %entry.name, error = %e, "rejected entry path"))?;

    let bytes_written = match entry.kind {
        EntryKind::Directory => {
            debug!(entry = %entry.name, target = %target.display(), "creating directory");
            fs.create_dir_all(&target, entry.sanitized_mode())
                .map_err(|source| Error::DirectoryCreationFailed {
                    path: target.clone(),
                    source,
                })?;
            0
        }
        EntryKind::File => {
            if let Some(parent) = target.parent() {
                fs.create_dir_all(parent, DEFAULT_DIR_MODE)
                    .map_err(|source| Error::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }

            let written = copy_bounded(source, index, entry, &target, limits, fs)?;
            debug!(entry = %entry.name, target = %target.display(), bytes = written, "extracted file");

            state.total_written = state.total_written.saturating_add(written);
            if state.total_written > limits.get_max_total_size() {
                warn!(
                    entry = %entry.name,
                    total = state.total_written,
                    limit = limits.get_max_total_size(),
                    "running total exceeded"
                );
                discard_partial(fs, &target);
                return Err(Error::TotalSizeExceeded {
                    name: entry.name.clone(),
                    total: state.total_written,
                    limit: limits.get_max_total_size(),
                });
            }
            written
        }
    };

    state.entries_processed += 1;
    Ok(ExtractedEntry {
        name: entry.name.clone(),
        target_path: target,
        kind: entry.kind,
        bytes_written,
    })
}

/// Stream one entry to disk, reading at most `max_file_size + 1` bytes.
///
/// Reading one byte past the limit is how an oversized stream is told apart
/// from one that is exactly at the limit.
fn copy_bounded<S: EntrySource, F: FileSystem>(
    source: &mut S,
    index: usize,
    entry: &ArchiveEntry,
    target: &Path,
    limits: &ExtractionLimits,
    fs: &F,
) -> Result<u64> {
    let max = limits.get_max_file_size();
    let reader = source.open(index)?;

    let mut out = fs
        .create_file(target, entry.sanitized_mode())
        .map_err(|source| Error::FileCreationFailed {
            path: target.to_path_buf(),
            source,
        })?;

    let mut limited = reader.take(max.saturating_add(1));
    let copied = pump(&mut limited, &mut out);
    drop(out);

    let written = match copied {
        Ok(n) => n,
        Err(failure) => {
            discard_partial(fs, target);
            return Err(match failure {
                CopyFailure::Read(source) => Error::EntryRead {
                    name: entry.name.clone(),
                    source,
                },
                CopyFailure::Write(source) => Error::ExtractionFailed {
                    path: target.to_path_buf(),
                    source,
                },
            });
        }
    };

    if written > max {
        warn!(entry = %entry.name, declared = entry.size, limit = max, "entry stream exceeded max size");
        discard_partial(fs, target);
        return Err(Error::SizeExceeded {
            name: entry.name.clone(),
            limit: max,
        });
    }

    Ok(written)
}

/// Which side of the copy failed. A read error means the entry stream is
/// corrupt; a write error belongs to the filesystem.
enum CopyFailure {
    Read(io::Error),
    Write(io::Error),
}

fn pump<R: Read, W: Write>(
    reader: &mut R,
    out: &mut W,
) -> std::result::Result<u64, CopyFailure> {
    let mut buf = [0u8; 8 * 1024];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyFailure::Read(e)),
        };
        out.write_all(&buf[..n]).map_err(CopyFailure::Write)?;
        written += n as u64;
    }
    out.flush().map_err(CopyFailure::Write)?;
    Ok(written)
}

fn discard_partial<F: FileSystem>(fs: &F, path: &Path) {
    if let Err(e) = fs.remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}
