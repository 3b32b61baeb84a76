//! Conversion between header arrays and a keyed header map.
//!
//! [`SacHeader`] keeps schema order: float fields, then integer fields,
//! then string fields. The event name is a single `kevnm` entry of up to
//! 16 characters even though it occupies two string slots on disk.

use std::fmt;

use indexmap::IndexMap;

use crate::header::{
    FLOAT_HEADERS, FNULL, INT_HEADERS, INULL, SNULL, STRING_HEADERS, STRING_WIDTH, idx,
};
use crate::record::HeaderArrays;
use crate::types::Warning;
use crate::{Result, SacError};

/// Header values keyed by lowercase field name.
pub type SacHeader = IndexMap<String, HeaderValue>;

/// A single header value.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Float(f32),
    Int(i32),
    Str(String),
}

impl HeaderValue {
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            HeaderValue::Float(v) => Some(v),
            HeaderValue::Int(v) => Some(v as f32),
            HeaderValue::Str(_) => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            HeaderValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Int(v) => write!(f, "{v}"),
            HeaderValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<f32> for HeaderValue {
    fn from(v: f32) -> Self {
        HeaderValue::Float(v)
    }
}

impl From<i32> for HeaderValue {
    fn from(v: i32) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Int(i32::from(v))
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Str(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Str(v)
    }
}

/// Collect header arrays into a keyed map.
///
/// Null values are left out unless `include_nulls` is set. Text has
/// trailing blanks and NULs removed. `kevnm2` never appears as a key: it
/// is appended to `kevnm`, or takes its place when `kevnm` is null.
pub fn arrays_to_dict(header: &HeaderArrays, include_nulls: bool) -> SacHeader {
    let mut out = SacHeader::with_capacity(FLOAT_HEADERS.len() + INT_HEADERS.len());

    for (&name, &value) in FLOAT_HEADERS.iter().zip(header.float.iter()) {
        if include_nulls || value != FNULL {
            out.insert(name.to_string(), HeaderValue::Float(value));
        }
    }
    for (&name, &value) in INT_HEADERS.iter().zip(header.int.iter()) {
        if include_nulls || value != INULL {
            out.insert(name.to_string(), HeaderValue::Int(value));
        }
    }

    let present = |slot: &[u8; STRING_WIDTH]| include_nulls || *slot != SNULL;
    for (i, (&name, slot)) in STRING_HEADERS.iter().zip(header.string.iter()).enumerate() {
        match i {
            idx::KEVNM => {
                let second = &header.string[idx::KEVNM2];
                let raw: Vec<u8> = match (present(slot), present(second)) {
                    (true, true) => [slot.as_slice(), second.as_slice()].concat(),
                    (true, false) => slot.to_vec(),
                    (false, true) => second.to_vec(),
                    (false, false) => continue,
                };
                out.insert(name.to_string(), HeaderValue::Str(decode_text(&raw)));
            }
            idx::KEVNM2 => {}
            _ if present(slot) => {
                out.insert(name.to_string(), HeaderValue::Str(decode_text(slot)));
            }
            _ => {}
        }
    }
    out
}

fn decode_text(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |p| p + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Build header arrays from a keyed map.
///
/// Fields not in the map stay null. Keys match case-insensitively.
/// `kevnm` is split into two space-padded 8-character slots; supplying
/// `kevnm2` directly is an error. Non-integral floats stored into integer
/// fields are truncated and over-long text is cut to fit; both produce a
/// warning.
pub fn dict_to_arrays(header: &SacHeader) -> Result<(HeaderArrays, Vec<Warning>)> {
    let mut arrays = HeaderArrays::new();
    let mut warnings = Vec::new();

    for (key, value) in header {
        let name = key.to_ascii_lowercase();
        if let Some(i) = crate::header::float_index(&name) {
            arrays.float[i] = value.as_f32().ok_or_else(|| type_mismatch(&name, value))?;
        } else if let Some(i) = crate::header::int_index(&name) {
            arrays.int[i] = match *value {
                HeaderValue::Int(v) => v,
                HeaderValue::Float(v) => {
                    if v.fract() != 0.0 {
                        warnings.push(
                            Warning::IntegerTruncated {
                                name: name.clone(),
                                value: f64::from(v),
                            }
                            .emit(),
                        );
                    }
                    v as i32
                }
                HeaderValue::Str(_) => return Err(type_mismatch(&name, value)),
            };
        } else if let Some(i) = crate::header::string_index(&name) {
            let HeaderValue::Str(text) = value else {
                return Err(type_mismatch(&name, value));
            };
            if !text.is_ascii() {
                return Err(SacError::invalid_argument(format!(
                    "header '{name}' must be ASCII text: {text:?}"
                )));
            }
            match i {
                idx::KEVNM => {
                    let slots = pad_text(text, 2 * STRING_WIDTH, &name, &mut warnings);
                    arrays.string[idx::KEVNM].copy_from_slice(&slots[..STRING_WIDTH]);
                    arrays.string[idx::KEVNM2].copy_from_slice(&slots[STRING_WIDTH..]);
                }
                idx::KEVNM2 => {
                    return Err(SacError::invalid_argument(
                        "'kevnm2' cannot be set directly; give the full event name as 'kevnm'",
                    ));
                }
                _ => {
                    let slot = pad_text(text, STRING_WIDTH, &name, &mut warnings);
                    arrays.string[i].copy_from_slice(&slot);
                }
            }
        } else {
            return Err(SacError::UnknownHeader(key.clone()));
        }
    }
    Ok((arrays, warnings))
}

fn type_mismatch(name: &str, value: &HeaderValue) -> SacError {
    SacError::invalid_argument(format!("header '{name}' cannot hold value {value:?}"))
}

fn pad_text(text: &str, width: usize, name: &str, warnings: &mut Vec<Warning>) -> Vec<u8> {
    let bytes = text.as_bytes();
    if bytes.len() > width {
        warnings.push(
            Warning::StringTruncated {
                name: name.to_string(),
                value: text.to_string(),
            }
            .emit(),
        );
    }
    let mut out = vec![b' '; width];
    let n = bytes.len().min(width);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}
