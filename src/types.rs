//! Shared types: [`ByteOrder`], [`ReadOptions`], [`WriteOptions`] and
//! the non-fatal [`Warning`]s returned by writers and converters.

use std::fmt;
use std::str::FromStr;

use crate::{Result, SacError};

/// Byte order of the float/int header arrays and the data array.
///
/// String headers are plain bytes and have no byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Byte order of the host.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// The opposite byte order.
    pub fn swapped(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => write!(f, "big"),
            Self::Little => write!(f, "little"),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = SacError;

    /// Accepts `little`/`big`, the `<`/`>` shorthands and `=`/`native`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "little" | "<" => Ok(Self::Little),
            "big" | ">" => Ok(Self::Big),
            "native" | "=" => Ok(Self::native()),
            other => Err(SacError::invalid_argument(format!(
                "unrecognized byte order '{other}', use 'little' or 'big'"
            ))),
        }
    }
}

/// Options for reading SAC files.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Read only the header arrays and skip the data section.
    pub headonly: bool,
    /// Expected byte order. `None` auto-detects, starting from native order.
    pub byte_order: Option<ByteOrder>,
    /// Check that the stream length equals `632 + 4 * npts` (binary only).
    pub checksize: bool,
}

impl ReadOptions {
    /// Create reader options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the data section.
    pub fn headonly(mut self) -> Self {
        self.headonly = true;
        self
    }

    /// Pin the byte order; a file in the other order then fails to read.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }

    /// Verify the file size against the header.
    pub fn checksize(mut self) -> Self {
        self.checksize = true;
        self
    }
}

/// Options for writing SAC files.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Output byte order. `None` writes in the record's own byte order.
    pub byte_order: Option<ByteOrder>,
}

impl WriteOptions {
    /// Create writer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast headers and data to this byte order before writing.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }
}

/// A non-fatal anomaly noticed while writing or converting headers.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Header-only write to a destination that holds no data region.
    HeaderOnlyWithoutData { destination: String },
    /// Header-only write in a byte order different from the existing file.
    ByteOrderMismatch {
        destination: String,
        existing: ByteOrder,
        written: ByteOrder,
    },
    /// A non-integral value was stored into an integer header.
    IntegerTruncated { name: String, value: f64 },
    /// Text longer than its header slot was cut.
    StringTruncated { name: String, value: String },
}

impl Warning {
    /// Log this warning and hand it back.
    pub(crate) fn emit(self) -> Self {
        tracing::warn!("{self}");
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderOnlyWithoutData { destination } => write!(
                f,
                "writing header-only file to {destination}: no existing data region to update"
            ),
            Self::ByteOrderMismatch {
                destination,
                existing,
                written,
            } => write!(
                f,
                "writing {written}-endian header over {existing}-endian file {destination}"
            ),
            Self::IntegerTruncated { name, value } => {
                write!(f, "non-integers may be truncated: {name} = {value}")
            }
            Self::StringTruncated { name, value } => {
                write!(f, "header '{name}' truncated: {value:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_parse() {
        assert_eq!("little".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert_eq!(">".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("=".parse::<ByteOrder>().unwrap(), ByteOrder::native());
        assert!("middle".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn test_byte_order_swapped() {
        assert_eq!(ByteOrder::Big.swapped(), ByteOrder::Little);
        assert_eq!(ByteOrder::Little.swapped().swapped(), ByteOrder::Little);
    }

    #[test]
    fn test_read_options_builder() {
        let opts = ReadOptions::new()
            .headonly()
            .checksize()
            .with_byte_order(ByteOrder::Big);
        assert!(opts.headonly);
        assert!(opts.checksize);
        assert_eq!(opts.byte_order, Some(ByteOrder::Big));

        let defaults = ReadOptions::default();
        assert!(!defaults.headonly);
        assert_eq!(defaults.byte_order, None);
    }

    #[test]
    fn test_warning_display() {
        let w = Warning::IntegerTruncated {
            name: "npts".into(),
            value: 10.5,
        };
        assert_eq!(w.to_string(), "non-integers may be truncated: npts = 10.5");
    }
}
