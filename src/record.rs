//! In-memory SAC content: the three header arrays, the data array and
//! the byte order they were read in or are to be written in.
//!
//! [`HeaderArrays::new`] is the factory for null-initialized headers;
//! [`init_header_arrays`] builds individual arrays by kind.

use std::fmt;
use std::str::FromStr;

use crate::header::{
    self, FNULL, INULL, LOGICAL_HEADERS, NFLOAT, NINT, NSTRING, SNULL, STRING_WIDTH, idx,
};
use crate::time::RefTime;
use crate::types::ByteOrder;
use crate::{Result, SacError};

/// The float, integer and string header arrays of one SAC file.
///
/// Values are held in host order; the on-disk byte order is a codec
/// parameter (see [`SacRecord::byte_order`]).
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderArrays {
    pub float: [f32; NFLOAT],
    pub int: [i32; NINT],
    pub string: [[u8; STRING_WIDTH]; NSTRING],
}

impl HeaderArrays {
    /// Create null header arrays.
    ///
    /// Every field holds its null value, except the logical headers, which
    /// start at 0, and `lcalda`, which starts at 1 (calculate distances).
    pub fn new() -> Self {
        Self {
            float: null_float_array(),
            int: null_int_array(),
            string: null_string_array(),
        }
    }

    /// Number of data points declared by the header.
    pub fn npts(&self) -> i32 {
        self.int[idx::NPTS]
    }

    /// Header version, also the byte-order oracle.
    pub fn nvhdr(&self) -> i32 {
        self.int[idx::NVHDR]
    }

    /// Sampling interval in seconds.
    pub fn delta(&self) -> f32 {
        self.float[idx::DELTA]
    }

    /// Float header value by name.
    pub fn float(&self, name: &str) -> Option<f32> {
        header::float_index(name).map(|i| self.float[i])
    }

    /// Integer header value by name.
    pub fn int(&self, name: &str) -> Option<i32> {
        header::int_index(name).map(|i| self.int[i])
    }

    /// Raw 8-byte string slot by name.
    pub fn string(&self, name: &str) -> Option<&[u8; STRING_WIDTH]> {
        header::string_index(name).map(|i| &self.string[i])
    }

    /// Set a float header by name.
    pub fn set_float(&mut self, name: &str, value: f32) -> Result<()> {
        let i = header::float_index(name).ok_or_else(|| SacError::UnknownHeader(name.into()))?;
        self.float[i] = value;
        Ok(())
    }

    /// Set an integer header by name.
    pub fn set_int(&mut self, name: &str, value: i32) -> Result<()> {
        let i = header::int_index(name).ok_or_else(|| SacError::UnknownHeader(name.into()))?;
        self.int[i] = value;
        Ok(())
    }

    /// Reference time from the `nz*` headers.
    ///
    /// Fails with a content error if any of them is null or the combination
    /// is not a calendar time.
    pub fn reference_time(&self) -> Result<RefTime> {
        let fields = [
            idx::NZYEAR,
            idx::NZJDAY,
            idx::NZHOUR,
            idx::NZMIN,
            idx::NZSEC,
            idx::NZMSEC,
        ]
        .map(|i| self.int[i]);
        if fields.contains(&INULL) {
            return Err(SacError::content("null reference time values detected"));
        }
        let [year, day, hour, minute, second, millisecond] = fields;
        RefTime::new(year, day, hour, minute, second, millisecond)
    }
}

impl Default for HeaderArrays {
    fn default() -> Self {
        Self::new()
    }
}

fn null_float_array() -> [f32; NFLOAT] {
    [FNULL; NFLOAT]
}

fn null_int_array() -> [i32; NINT] {
    let mut hi = [INULL; NINT];
    for name in LOGICAL_HEADERS {
        if let Some(i) = header::int_index(name) {
            hi[i] = 0;
        }
    }
    hi[idx::LCALDA] = 1;
    hi
}

fn null_string_array() -> [[u8; STRING_WIDTH]; NSTRING] {
    [SNULL; NSTRING]
}

/// Which of the three header arrays to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Float,
    Int,
    Str,
}

impl FromStr for ArrayKind {
    type Err = SacError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "float" => Ok(Self::Float),
            "int" => Ok(Self::Int),
            "str" => Ok(Self::Str),
            other => Err(SacError::invalid_argument(format!(
                "unrecognized header array type {other}"
            ))),
        }
    }
}

/// A single null-initialized header array, as built by [`init_header_arrays`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderArray {
    Float([f32; NFLOAT]),
    Int([i32; NINT]),
    Str([[u8; STRING_WIDTH]; NSTRING]),
}

/// Build null header arrays of the requested kinds, in the requested order.
///
/// Kinds are `"float"`, `"int"` and `"str"`; anything else is an invalid
/// argument.
///
/// ```
/// use sac_rs::{HeaderArray, init_header_arrays};
///
/// let arrays = init_header_arrays(&["int", "float"]).unwrap();
/// assert!(matches!(arrays[0], HeaderArray::Int(_)));
/// assert!(init_header_arrays(&["double"]).is_err());
/// ```
pub fn init_header_arrays<S: AsRef<str>>(kinds: &[S]) -> Result<Vec<HeaderArray>> {
    kinds
        .iter()
        .map(|kind| {
            Ok(match kind.as_ref().parse::<ArrayKind>()? {
                ArrayKind::Float => HeaderArray::Float(null_float_array()),
                ArrayKind::Int => HeaderArray::Int(null_int_array()),
                ArrayKind::Str => HeaderArray::Str(null_string_array()),
            })
        })
        .collect()
}

/// Data samples in the precision the caller holds them.
///
/// Reads always produce [`Samples::Float`]; writes cast every variant to
/// f32.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Float(Vec<f32>),
    Double(Vec<f64>),
    Int(Vec<i32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Float(v) => v.len(),
            Samples::Double(v) => v.len(),
            Samples::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The samples as single-precision floats, as they are stored on disk.
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            Samples::Float(v) => v.clone(),
            Samples::Double(v) => v.iter().map(|&x| x as f32).collect(),
            Samples::Int(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }
}

impl From<Vec<f32>> for Samples {
    fn from(v: Vec<f32>) -> Self {
        Samples::Float(v)
    }
}

impl From<Vec<f64>> for Samples {
    fn from(v: Vec<f64>) -> Self {
        Samples::Double(v)
    }
}

/// A SAC file's content: headers, optional data and byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct SacRecord {
    pub header: HeaderArrays,
    /// `None` for header-only reads and header-only writes.
    pub data: Option<Samples>,
    /// Byte order detected on read, or the default output order on write.
    pub byte_order: ByteOrder,
}

impl SacRecord {
    /// Create a record with null headers, no data and native byte order.
    pub fn new() -> Self {
        Self {
            header: HeaderArrays::new(),
            data: None,
            byte_order: ByteOrder::native(),
        }
    }

    /// Set the header arrays.
    pub fn with_header(mut self, header: HeaderArrays) -> Self {
        self.header = header;
        self
    }

    /// Set the data samples.
    pub fn with_data(mut self, data: impl Into<Samples>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}

impl Default for SacRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SacRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = match &self.data {
            Some(samples) => format!("{} samples", samples.len()),
            None => "header only".to_string(),
        };
        write!(
            f,
            "SAC v{} | npts {} | delta {} | {} | {}-endian",
            self.header.nvhdr(),
            self.header.npts(),
            self.header.delta(),
            data,
            self.byte_order,
        )
    }
}
