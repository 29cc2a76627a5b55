use std::path::PathBuf;

/// Mode used for files whose archive entry carries no permission bits.
pub const DEFAULT_FILE_MODE: u32 = 0o644;
/// Mode used for directories whose archive entry carries no permission bits.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Metadata for one entry as declared by the archive.
///
/// Everything here is attacker-controlled: `name` may contain `..`, a leading
/// separator or backslashes, and `size` may not match the decompressed stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl ArchiveEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mode: None,
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: None,
            kind: EntryKind::Directory,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn is_directory(&self) -> bool { matches!(self.kind, EntryKind::Directory) }

    /// Permission bits to create this entry with.
    ///
    /// Only the `0o777` bits of the declared mode survive (no setuid, setgid
    /// or sticky), and the owner always keeps read/write on files and
    /// read/write/search on directories so later entries can be written.
    pub fn sanitized_mode(&self) -> u32 {
        match (self.kind, self.mode) {
            (EntryKind::File, Some(mode)) => (mode & 0o777) | 0o600,
            (EntryKind::Directory, Some(mode)) => (mode & 0o777) | 0o700,
            (EntryKind::File, None) => DEFAULT_FILE_MODE,
            (EntryKind::Directory, None) => DEFAULT_DIR_MODE,
        }
    }
}

/// An entry that made it to disk.
#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    pub name: String,
    pub target_path: PathBuf,
    pub kind: EntryKind,
    /// Bytes actually written, which may differ from the declared size.
    pub bytes_written: u64,
}

/// Outcome of a successful extraction.
#[derive(Clone, Debug)]
pub struct ExtractionReport {
    /// Canonical destination root.
    pub destination: PathBuf,
    pub entries: Vec<ExtractedEntry>,
    pub total_bytes: u64,
}

impl ExtractionReport {
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_constructors() {
        let file = ArchiveEntry::file("bin/tool", 1024).with_mode(0o755);
        assert_eq!(file.name, "bin/tool");
        assert_eq!(file.size, 1024);
        assert_eq!(file.mode, Some(0o755));
        assert!(!file.is_directory());

        let dir = ArchiveEntry::directory("bin/");
        assert!(dir.is_directory());
        assert_eq!(dir.size, 0);
    }

    #[test]
    fn sanitized_mode_strips_special_bits() {
        let entry = ArchiveEntry::file("tool", 1).with_mode(0o104755);
        assert_eq!(entry.sanitized_mode(), 0o755);

        let entry = ArchiveEntry::directory("d/").with_mode(0o41777);
        assert_eq!(entry.sanitized_mode(), 0o777);
    }

    #[test]
    fn sanitized_mode_keeps_owner_access() {
        let entry = ArchiveEntry::file("ro.txt", 1).with_mode(0o444);
        assert_eq!(entry.sanitized_mode(), 0o644);

        let entry = ArchiveEntry::directory("locked/").with_mode(0o000);
        assert_eq!(entry.sanitized_mode(), 0o700);
    }

    #[test]
    fn sanitized_mode_defaults() {
        assert_eq!(ArchiveEntry::file("a", 0).sanitized_mode(), DEFAULT_FILE_MODE);
        assert_eq!(ArchiveEntry::directory("a/").sanitized_mode(), DEFAULT_DIR_MODE);
    }

    #[test]
    fn report_counts_files_only() {
        let report = ExtractionReport {
            destination: PathBuf::from("/opt/out"),
            entries: vec![
                ExtractedEntry {
                    name: "dir/".into(),
                    target_path: PathBuf::from("/opt/out/dir"),
                    kind: EntryKind::Directory,
                    bytes_written: 0,
                },
                ExtractedEntry {
                    name: "dir/a.txt".into(),
                    target_path: PathBuf::from("/opt/out/dir/a.txt"),
                    kind: EntryKind::File,
                    bytes_written: 1,
                },
            ],
            total_bytes: 1,
        };
        assert_eq!(report.file_count(), 1);
    }
}
