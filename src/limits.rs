//! Limits for report decoding
//!
//! Reports are buffered in full before parsing, so the size cap bounds
//! memory use. The depth cap bounds the element stack.

use crate::error::{Error, Result};

/// Limits applied while loading and parsing a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum report size in bytes
    pub max_report_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_report_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 64,
            max_report_size: 10 * 1024 * 1024, // 10 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10000,
            max_report_size: 1024 * 1024 * 1024, // 1 GB
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if report size is within limits
    pub fn check_report_size(&self, size: usize) -> Result<()> {
        if size > self.max_report_size {
            Err(Error::LimitExceeded(format!(
                "report size {} bytes exceeds maximum {} bytes",
                size, self.max_report_size
            )))
        } else {
            Ok(())
        }
    }
}
