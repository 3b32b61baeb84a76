//! Error types for SAC reading, writing, conversion and validation.
//!
//! Every [`SacError`] belongs to one of three kinds (see [`ErrorKind`]):
//! malformed or unreadable files, caller mistakes, and well-formed files
//! whose header content is inconsistent.

use std::fmt;

use thiserror::Error;

use crate::types::ByteOrder;

#[derive(Debug, Error)]
pub enum SacError {
    #[error("cannot read all header values: expected {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    #[error("incorrect byte order: {0}")]
    IncorrectByteOrder(ByteOrder),

    #[error("invalid npts in header: {0}")]
    InvalidNpts(i32),

    #[error(
        "actual and theoretical file size are inconsistent: actual {actual}, theoretical {expected}"
    )]
    FileSizeMismatch { actual: u64, expected: u64 },

    #[error("cannot read all data points: header says {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("invalid SAC ASCII content: {0}")]
    InvalidAscii(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unrecognized header name: {0}")]
    UnknownHeader(String),

    #[error("data array is missing or empty, cannot check data headers")]
    MissingData,

    #[error("invalid content: {0}")]
    InvalidContent(String),
}

/// The three failure classes a SAC operation can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O failure, truncated or size-inconsistent file, wrong byte order.
    Format,
    /// Unknown field or test name, unusable argument.
    InvalidArgument,
    /// The file parsed but its header content is inconsistent.
    Content,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format error"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::Content => write!(f, "invalid content"),
        }
    }
}

impl SacError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HeaderTooShort { .. }
            | Self::IncorrectByteOrder(_)
            | Self::InvalidNpts(_)
            | Self::FileSizeMismatch { .. }
            | Self::SampleCountMismatch { .. }
            | Self::InvalidAscii(_)
            | Self::Io { .. } => ErrorKind::Format,
            Self::InvalidArgument(_) | Self::UnknownHeader(_) | Self::MissingData => {
                ErrorKind::InvalidArgument
            }
            Self::InvalidContent(_) => ErrorKind::Content,
        }
    }

    /// Wrap an I/O error with the name of the file or stream it came from.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn content(message: impl Into<String>) -> Self {
        Self::InvalidContent(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SacError>;
