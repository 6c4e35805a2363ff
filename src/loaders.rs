//! Input loading
//!
//! Reports are read in one bounded pass into memory before parsing.

use crate::error::Result;
use crate::limits::Limits;
use log::trace;
use std::io::Read;

/// Buffers a report stream under the configured size limit
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Read the whole stream into memory
    ///
    /// At most one byte past the size limit is read, so an oversized
    /// stream is rejected without being buffered in full.
    pub fn load_bytes<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        let cap = (self.limits.max_report_size as u64).saturating_add(1);
        let mut content = Vec::new();
        reader.take(cap).read_to_end(&mut content)?;

        self.limits.check_report_size(content.len())?;

        trace!("loaded {} bytes of report input", content.len());
        Ok(content)
    }
}
