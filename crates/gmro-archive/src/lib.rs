//! Bounded, attack-resistant zip extraction for downloaded attachments.
//!
//! # Architecture
//!
//! - `limits.rs` - Extraction ceilings and their defaults
//! - `validate.rs` - Pre-flight metadata scan
//! - `sanitize.rs` - Path cleaning and containment (zip-slip prevention)
//! - `extract.rs` - Per-entry extraction with a hard byte ceiling
//! - `source.rs` - Archive reading (`EntrySource`, zip implementation)
//! - `effects.rs` - Injectable filesystem
//! - `detect.rs` - Attachment classification helpers

pub use detect::{FALLBACK_EXTRACTION_DIR, extraction_dir, has_zip_signature, is_zip_attachment};
pub use effects::{FileSystem, OsFileSystem};
pub use entry::{ArchiveEntry, EntryKind, ExtractedEntry, ExtractionReport};
pub use error::{Error, ErrorKind, Result};
pub use extract::{extract, extract_source, extract_with};
pub use limits::ExtractionLimits;
pub use sanitize::{SanitizedPath, resolve_within, sanitize_entry_name};
pub use source::{EntrySource, ZipSource};
pub use validate::{ValidationSummary, validate};

mod detect;
pub mod effects;
pub mod entry;
mod error;
mod extract;
pub mod limits;
mod sanitize;
pub mod source;
mod validate;
