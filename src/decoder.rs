//! Report decoding
//!
//! Ties loading, XML parsing and schema binding together:
//! bytes in, [`Report`] out.

use crate::documents::Document;
use crate::error::{DecodeError, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::schema::{FromElement, Report, ROOT_ELEMENT};
use log::debug;
use std::io::Read;

/// How an input stream without any content is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyInput {
    /// Empty or whitespace-only input decodes to an empty report
    #[default]
    Lenient,
    /// Empty or whitespace-only input is a decode error
    Reject,
}

/// Configurable decoder for xUnit v2+ reports
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    loader: Loader,
    empty_input: EmptyInput,
}

impl Decoder {
    /// Create a decoder with default limits and lenient empty-input handling
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.loader = self.loader.with_limits(limits);
        self
    }

    /// Set the empty-input policy
    pub fn with_empty_input(mut self, policy: EmptyInput) -> Self {
        self.empty_input = policy;
        self
    }

    /// Read the whole stream and decode it
    pub fn decode<R: Read>(&self, reader: R) -> Result<Report> {
        let bytes = self.loader.load_bytes(reader)?;
        self.decode_bytes(&bytes)
    }

    /// Decode an in-memory document
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Report> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return match self.empty_input {
                EmptyInput::Lenient => {
                    debug!("empty report input, returning an empty report");
                    Ok(Report::default())
                }
                EmptyInput::Reject => Err(DecodeError::new("unexpected end of input")
                    .with_position(bytes.len())
                    .into()),
            };
        }

        let doc = Document::parse(bytes, self.loader.limits())?;
        let root = doc
            .root
            .ok_or_else(|| DecodeError::new("no root element").with_position(bytes.len()))?;

        if root.local_name() != ROOT_ELEMENT {
            return Err(DecodeError::new(format!(
                "expected element <{}> but found <{}>",
                ROOT_ELEMENT,
                root.local_name()
            ))
            .with_position(root.position)
            .into());
        }

        let report = Report::from_element(&root)?;
        debug!(
            "decoded report with {} assemblies",
            report.assemblies.len()
        );
        Ok(report)
    }
}

/// Decode a report with the default [`Decoder`]
pub fn decode<R: Read>(reader: R) -> Result<Report> {
    Decoder::new().decode(reader)
}
