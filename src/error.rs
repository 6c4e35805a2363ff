//! Error types for xunit-report
//!
//! Decoding is the only fallible stage. Projection over a decoded report
//! always succeeds, so there is no error kind for it here.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xunit-report operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a usable xUnit v2+ XML document
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error while reading the input stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the decode diagnostic if this is a decode failure
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(err) => Some(err),
            _ => None,
        }
    }
}

/// A failure to decode the input document
///
/// `message` holds the underlying parser diagnostic unchanged. The byte
/// offset and the element being processed are attached when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Parser diagnostic
    pub message: String,
    /// Byte offset into the input
    pub position: Option<usize>,
    /// Name of the element being decoded
    pub element: Option<String>,
}

impl DecodeError {
    /// Create a new decode error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            element: None,
        }
    }

    /// Set the byte offset
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the element name
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref element) = self.element {
            write!(f, " (in <{}>)", element)?;
        }

        if let Some(position) = self.position {
            write!(f, " at position {}", position)?;
        }

        Ok(())
    }
}

impl std::error::Error for DecodeError {}
