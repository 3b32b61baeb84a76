//! Pure Rust reader and writer for SAC (Seismic Analysis Code) files.
//!
//! Binary and alphanumeric (ASCII) formats, automatic byte-order
//! detection, header/map conversion and semantic content checks.
//!
//! # Writing and reading a binary file
//!
//! ```
//! use std::io::Cursor;
//! use sac_rs::{ByteOrder, HeaderArrays, ReadOptions, SacRecord, WriteOptions};
//! use sac_rs::{read_sac, write_sac};
//!
//! let mut header = HeaderArrays::new();
//! header.set_float("delta", 0.01).unwrap();
//! header.set_int("npts", 3).unwrap();
//! header.set_int("nvhdr", 6).unwrap();
//!
//! let record = SacRecord::new()
//!     .with_header(header)
//!     .with_data(vec![1.0f32, 2.0, 3.0])
//!     .with_byte_order(ByteOrder::Big);
//!
//! let mut buf = Cursor::new(Vec::new());
//! write_sac(&mut buf, &record, &WriteOptions::new()).unwrap();
//! assert_eq!(buf.get_ref().len(), 632 + 3 * 4);
//!
//! buf.set_position(0);
//! let decoded = read_sac(&mut buf, &ReadOptions::new().checksize()).unwrap();
//! assert_eq!(decoded.byte_order, ByteOrder::Big);
//! assert_eq!(decoded.header.npts(), 3);
//! assert_eq!(decoded.data, record.data);
//! ```
//!
//! # Header maps
//!
//! ```
//! use sac_rs::{SacHeader, arrays_to_dict, dict_to_arrays};
//!
//! let mut header = SacHeader::new();
//! header.insert("kevnm".into(), "Tohoku M9 2011".into());
//! header.insert("delta".into(), 0.05f32.into());
//!
//! let (arrays, warnings) = dict_to_arrays(&header).unwrap();
//! assert!(warnings.is_empty());
//!
//! let back = arrays_to_dict(&arrays, false);
//! assert_eq!(back["kevnm"], header["kevnm"]);
//! assert!(!back.contains_key("kevnm2"));
//! ```
//!
//! # Content checks
//!
//! ```
//! use sac_rs::{ErrorKind, HeaderArrays, validate_content_by_name};
//!
//! let header = HeaderArrays::new();
//! let err = validate_content_by_name(&header, None, &["reftime"]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Content);
//! ```

pub mod ascii;
pub mod binary;
pub mod convert;
pub mod error;
pub mod header;
pub mod record;
pub mod time;
pub mod types;
pub mod validate;

pub use error::{ErrorKind, Result, SacError};
pub use record::{ArrayKind, HeaderArray, HeaderArrays, SacRecord, Samples, init_header_arrays};
pub use time::RefTime;
pub use types::{ByteOrder, ReadOptions, Warning, WriteOptions};

pub use ascii::{read_sac_ascii, read_sac_ascii_file, write_sac_ascii, write_sac_ascii_file};
pub use binary::{is_valid_byteorder, read_sac, read_sac_file, write_sac, write_sac_file};
pub use convert::{HeaderValue, SacHeader, arrays_to_dict, dict_to_arrays};
pub use validate::{ValidationTest, validate_content, validate_content_by_name};
