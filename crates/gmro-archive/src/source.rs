use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use crate::entry::{ArchiveEntry, EntryKind};
use crate::error::{Error, Result};

/// Read access to an archive: a metadata listing plus per-entry streams.
pub trait EntrySource {
    type Reader<'a>: Read
    where
        Self: 'a;

    /// Every entry in archive order, taken from metadata only.
    fn entries(&self) -> &[ArchiveEntry];

    /// Open a decompressing stream for the entry at `index`.
    fn open(&mut self, index: usize) -> Result<Self::Reader<'_>>;
}

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    entries: Vec<ArchiveEntry>,
}

impl ZipSource<BufReader<File>> {
    /// Open a zip file on local disk, read-only.
    pub fn open_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::ArchiveOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file)).map_err(|e| match e {
            Error::EntryRead { source, .. } => Error::ArchiveOpen {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

impl<R: Read + Seek> ZipSource<R> {
    /// Parse the central directory and collect entry metadata without
    /// decompressing anything.
    pub fn new(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader).map_err(|e| Error::EntryRead {
            name: "<central directory>".to_owned(),
            source: io::Error::from(e),
        })?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index_raw(index).map_err(|e| Error::EntryRead {
                name: format!("#{index}"),
                source: io::Error::from(e),
            })?;

            let kind = if file.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(ArchiveEntry {
                name: file.name().to_owned(),
                size: file.size(),
                mode: file.unix_mode(),
                kind,
            });
        }

        Ok(Self { archive, entries })
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    type Reader<'a>
        = Box<dyn Read + 'a>
    where
        Self: 'a;

    fn entries(&self) -> &[ArchiveEntry] { &self.entries }

    fn open(&mut self, index: usize) -> Result<Self::Reader<'_>> {
        let name = self
            .entries
            .get(index)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        let file = self
            .archive
            .by_index(index)
            .map_err(|e| Error::EntryRead {
                name,
                source: io::Error::from(e),
            })?;
        Ok(Box::new(file))
    }
}
