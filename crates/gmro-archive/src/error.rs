use std::io;
use std::path::PathBuf;

/// Coarse classification of extraction failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Archive missing, unreadable, or not a valid container.
    ArchiveOpen,
    /// Rejected by the pre-flight metadata scan (or unusable limits).
    Validation,
    /// Entry path escapes the destination or nests too deeply.
    PathSecurity,
    /// Bytes actually written exceeded a limit.
    SizeExceeded,
    /// Directory creation, file open, write, or delete failed.
    Filesystem,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    ArchiveOpen { path: PathBuf, source: io::Error },

    #[error("failed to read archive entry '{name}': {source}")]
    EntryRead { name: String, source: io::Error },

    #[error("invalid extraction limits: {field} must be greater than zero")]
    InvalidLimits { field: &'static str },

    #[error("zip contains too many files: {count} (max {limit})")]
    TooManyFiles { count: usize, limit: usize },

    #[error("file '{name}' exceeds max size: {size} bytes (max {limit})")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("total extracted size exceeds limit: {total} bytes declared (max {limit})")]
    DeclaredTotalTooLarge { total: u64, limit: u64 },

    #[error("invalid file path in zip: '{name}'")]
    InvalidPath { name: String },

    #[error("file path too deep: '{name}' (depth {depth}, max {limit})")]
    PathTooDeep {
        name: String,
        depth: usize,
        limit: usize,
    },

    #[error("path traversal detected: entry '{name}' resolves to '{resolved}'")]
    PathEscape { name: String, resolved: PathBuf },

    #[error("file '{name}' exceeds max size during extraction (max {limit} bytes)")]
    SizeExceeded { name: String, limit: u64 },

    #[error("total extracted size exceeds limit: {total} bytes written after '{name}' (max {limit})")]
    TotalSizeExceeded { name: String, total: u64, limit: u64 },

    #[error("failed to create destination '{path}': {source}")]
    DestinationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create file '{path}': {source}")]
    FileCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArchiveOpen { .. } | Self::EntryRead { .. } => ErrorKind::ArchiveOpen,
            Self::InvalidLimits { .. }
            | Self::TooManyFiles { .. }
            | Self::FileTooLarge { .. }
            | Self::DeclaredTotalTooLarge { .. } => ErrorKind::Validation,
            Self::InvalidPath { .. } | Self::PathTooDeep { .. } | Self::PathEscape { .. } => {
                ErrorKind::PathSecurity
            }
            Self::SizeExceeded { .. } | Self::TotalSizeExceeded { .. } => ErrorKind::SizeExceeded,
            Self::DestinationFailed { .. }
            | Self::DirectoryCreationFailed { .. }
            | Self::FileCreationFailed { .. }
            | Self::ExtractionFailed { .. } => ErrorKind::Filesystem,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
