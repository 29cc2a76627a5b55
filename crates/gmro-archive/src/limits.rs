use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest single entry accepted by default (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Largest archive-wide uncompressed total accepted by default (500 MiB).
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;
pub const DEFAULT_MAX_FILE_COUNT: usize = 1000;
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Resource ceilings applied to one extraction.
///
/// Built from [`Default`] and adjusted with the consuming setters. Every field
/// must be non-zero; [`ExtractionLimits::check`] rejects a zero limit before
/// any archive data is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    max_file_size:  u64,
    max_total_size: u64,
    max_file_count: usize,
    max_depth:      usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self { Self::new() }
}

impl ExtractionLimits {
    pub fn new() -> Self {
        Self {
            max_file_size:  DEFAULT_MAX_FILE_SIZE,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            max_depth:      DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn max_total_size(mut self, bytes: u64) -> Self {
        self.max_total_size = bytes;
        self
    }

    pub fn max_file_count(mut self, count: usize) -> Self {
        self.max_file_count = count;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn get_max_file_size(&self) -> u64 { self.max_file_size }

    pub fn get_max_total_size(&self) -> u64 { self.max_total_size }

    pub fn get_max_file_count(&self) -> usize { self.max_file_count }

    pub fn get_max_depth(&self) -> usize { self.max_depth }

    /// Reject limits that would make extraction meaningless.
    pub fn check(&self) -> Result<()> {
        let field = if self.max_file_size == 0 {
            "max_file_size"
        } else if self.max_total_size == 0 {
            "max_total_size"
        } else if self.max_file_count == 0 {
            "max_file_count"
        } else if self.max_depth == 0 {
            "max_depth"
        } else {
            return Ok(());
        };
        Err(Error::InvalidLimits { field })
    }
}
