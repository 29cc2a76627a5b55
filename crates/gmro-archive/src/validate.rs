use tracing::warn;

use crate::entry::ArchiveEntry;
use crate::error::{Error, Result};
use crate::limits::ExtractionLimits;

/// What the pre-flight scan saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationSummary {
    pub entry_count:    usize,
    pub declared_total: u64,
}

/// Reject an archive from its metadata alone, before anything is written.
///
/// Catches entry-count floods and entries that declare enormous sizes. It does
/// not bound what decompression actually produces; the extractor enforces
/// that separately while copying.
pub fn validate(entries: &[ArchiveEntry], limits: &ExtractionLimits) -> Result<ValidationSummary> {
    let count = entries.len();
    if count > limits.get_max_file_count() {
        warn!(count, limit = limits.get_max_file_count(), "archive rejected: too many files");
        return Err(Error::TooManyFiles {
            count,
            limit: limits.get_max_file_count(),
        });
    }

    let mut declared_total = 0u64;
    for entry in entries {
        if entry.size > limits.get_max_file_size() {
            warn!(entry = %entry.name, size = entry.size, "archive rejected: entry too large");
            return Err(Error::FileTooLarge {
                name: entry.name.clone(),
                size: entry.size,
                limit: limits.get_max_file_size(),
            });
        }
        declared_total = declared_total.saturating_add(entry.size);
    }

    if declared_total > limits.get_max_total_size() {
        warn!(declared_total, limit = limits.get_max_total_size(), "archive rejected: total too large");
        return Err(Error::DeclaredTotalTooLarge {
            total: declared_total,
            limit: limits.get_max_total_size(),
        });
    }

    Ok(ValidationSummary {
        entry_count: count,
        declared_total,
    })
}
