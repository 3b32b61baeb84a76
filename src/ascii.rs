//! Read and write SAC ASCII (alphanumeric) files.
//!
//! The text layout mirrors the binary one: 14 lines of 5 floats, 8 lines
//! of 5 integers, 8 lines of 3 eight-character strings, then the data,
//! 5 values per line with any remainder on a final tab-delimited line.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use crate::binary::stream_len;
use crate::header::{INT_HEADERS, INULL, NFLOAT, NINT, NSTRING, STRING_WIDTH};
use crate::record::{HeaderArrays, SacRecord, Samples};
use crate::types::{ByteOrder, ReadOptions, Warning};
use crate::{Result, SacError};

const FLOAT_LINES: usize = NFLOAT / 5;
const INT_LINES: usize = NINT / 5;
const STRING_LINES: usize = NSTRING / 3;
const HEADER_LINES: usize = FLOAT_LINES + INT_LINES + STRING_LINES;

const FLOAT_WIDTH: usize = 15;
const INT_WIDTH: usize = 10;

/// Length in bytes of the header block as written by [`write_sac_ascii`].
pub const ASCII_HEADER_LEN: usize = FLOAT_LINES * (5 * FLOAT_WIDTH + 1)
    + INT_LINES * (5 * INT_WIDTH + 1)
    + STRING_LINES * (3 * STRING_WIDTH + 1);

/// Read a SAC ASCII file from a stream.
///
/// Only `options.headonly` applies; text has no byte order and no size
/// check. The returned record carries native byte order.
pub fn read_sac_ascii<R: Read>(reader: &mut R, options: &ReadOptions) -> Result<SacRecord> {
    read_from(reader, options, "stream")
}

/// Read a SAC ASCII file from disk.
pub fn read_sac_ascii_file(path: impl AsRef<Path>, options: &ReadOptions) -> Result<SacRecord> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| SacError::io(format!("no such file: {}", path.display()), e))?;
    read_from(
        &mut BufReader::new(file),
        options,
        &path.display().to_string(),
    )
}

fn read_from<R: Read>(reader: &mut R, options: &ReadOptions, source: &str) -> Result<SacRecord> {
    let mut contents = Vec::new();
    reader
        .read_to_end(&mut contents)
        .map_err(|e| SacError::io(format!("cannot read {source}"), e))?;

    let lines: Vec<&[u8]> = contents
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();
    // A trailing newline leaves one empty piece behind.
    let lines = match lines.split_last() {
        Some((last, rest)) if last.is_empty() => rest,
        _ => &lines[..],
    };
    if lines.len() < HEADER_LINES {
        return Err(SacError::InvalidAscii(format!(
            "{source} is not a valid SAC file: {} lines, need at least {HEADER_LINES}",
            lines.len()
        )));
    }

    let mut header = HeaderArrays::new();

    let (float_lines, rest) = lines.split_at(FLOAT_LINES);
    let (int_lines, rest) = rest.split_at(INT_LINES);
    let (string_lines, data_lines) = rest.split_at(STRING_LINES);

    for (row, line) in float_lines.iter().enumerate() {
        let values: Vec<f32> = parse_tokens(line, row)?;
        store_row(&mut header.float[row * 5..row * 5 + 5], values, row)?;
    }
    for (i, line) in int_lines.iter().enumerate() {
        let row = FLOAT_LINES + i;
        let values: Vec<i32> = parse_tokens(line, row)?;
        store_row(&mut header.int[i * 5..i * 5 + 5], values, row)?;
    }
    for (i, line) in string_lines.iter().enumerate() {
        let mut padded = [b' '; 3 * STRING_WIDTH];
        let n = line.len().min(padded.len());
        padded[..n].copy_from_slice(&line[..n]);
        for (slot, chunk) in header.string[i * 3..i * 3 + 3]
            .iter_mut()
            .zip(padded.chunks_exact(STRING_WIDTH))
        {
            slot.copy_from_slice(chunk);
        }
    }

    let data = if options.headonly {
        None
    } else {
        let mut samples = Vec::new();
        for (i, line) in data_lines.iter().enumerate() {
            samples.extend(parse_tokens::<f32>(line, HEADER_LINES + i)?);
        }
        let npts = header.npts();
        let expected = usize::try_from(npts).map_err(|_| SacError::InvalidNpts(npts))?;
        if samples.len() != expected {
            return Err(SacError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Some(Samples::Float(samples))
    };

    tracing::debug!(
        source,
        lines = lines.len(),
        samples = data.as_ref().map_or(0, Samples::len),
        "read SAC ASCII"
    );

    Ok(SacRecord {
        header,
        data,
        byte_order: ByteOrder::native(),
    })
}

fn parse_tokens<T: std::str::FromStr>(line: &[u8], row: usize) -> Result<Vec<T>> {
    let text = std::str::from_utf8(line)
        .map_err(|_| SacError::InvalidAscii(format!("line {}: not valid text", row + 1)))?;
    text.split_ascii_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                SacError::InvalidAscii(format!("line {}: cannot parse {token:?}", row + 1))
            })
        })
        .collect()
}

fn store_row<T: Copy>(dst: &mut [T], values: Vec<T>, row: usize) -> Result<()> {
    if values.len() != dst.len() {
        return Err(SacError::InvalidAscii(format!(
            "line {}: expected {} header values, found {}",
            row + 1,
            dst.len(),
            values.len()
        )));
    }
    dst.copy_from_slice(&values);
    Ok(())
}

/// Write a SAC ASCII file to a stream.
///
/// With `record.data == None` only the header block is written, for
/// updating an existing file in place; a warning is returned if the
/// stream is shorter than that block. With data, nothing follows the
/// header when `npts` is null or zero; otherwise `npts` must equal the
/// number of samples.
pub fn write_sac_ascii<W: Write + Seek>(
    writer: &mut W,
    record: &SacRecord,
) -> Result<Vec<Warning>> {
    let destination = "stream";
    let mut warnings = Vec::new();
    if record.data.is_none() {
        let len = stream_len(writer)
            .map_err(|e| SacError::io(format!("cannot write header values: {destination}"), e))?;
        if len < ASCII_HEADER_LEN as u64 {
            warnings.push(
                Warning::HeaderOnlyWithoutData {
                    destination: destination.into(),
                }
                .emit(),
            );
        }
    }
    write_to(writer, record, destination)?;
    Ok(warnings)
}

/// Write a SAC ASCII file to disk.
///
/// With data the file is created or truncated; without data the existing
/// file's header block is overwritten in place.
pub fn write_sac_ascii_file(path: impl AsRef<Path>, record: &SacRecord) -> Result<Vec<Warning>> {
    let path = path.as_ref();
    let destination = path.display().to_string();
    let open_err = |e: std::io::Error| SacError::io(format!("cannot open file: {destination}"), e);

    let file = if record.data.is_none() {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(open_err)?
    } else {
        File::create(path).map_err(open_err)?
    };
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, record, &destination)?;
    writer
        .flush()
        .map_err(|e| SacError::io(format!("cannot write trace values: {destination}"), e))?;
    Ok(Vec::new())
}

fn write_to<W: Write>(writer: &mut W, record: &SacRecord, destination: &str) -> Result<()> {
    let header = &record.header;
    let block = format_header(header)?;
    writer
        .write_all(&block)
        .map_err(|e| SacError::io(format!("cannot write header values: {destination}"), e))?;

    let Some(samples) = &record.data else {
        return Ok(());
    };
    let npts = header.npts();
    if npts == INULL || npts == 0 {
        return Ok(());
    }
    let count = usize::try_from(npts).map_err(|_| SacError::InvalidNpts(npts))?;
    if samples.len() != count {
        return Err(SacError::SampleCountMismatch {
            expected: count,
            actual: samples.len(),
        });
    }

    let values = samples.to_f32();
    let data_err =
        |e: std::io::Error| SacError::io(format!("cannot write trace values: {destination}"), e);
    let mut rows = values.chunks_exact(5);
    for row in rows.by_ref() {
        let line: String = row.iter().map(|&v| format_float(v)).collect();
        writeln!(writer, "{line}").map_err(data_err)?;
    }
    let remainder = rows.remainder();
    if !remainder.is_empty() {
        let line: Vec<String> = remainder
            .iter()
            .map(|&v| format_float(v).trim_start().to_string())
            .collect();
        writeln!(writer, "{}", line.join("\t")).map_err(data_err)?;
    }
    Ok(())
}

/// Lay out the header block. Integers wider than their column (values
/// below -999999999) would run into their neighbour, so they are refused.
fn format_header(header: &HeaderArrays) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(ASCII_HEADER_LEN);
    for row in header.float.chunks_exact(5) {
        for &v in row {
            out.extend_from_slice(format_float(v).as_bytes());
        }
        out.push(b'\n');
    }
    for (r, row) in header.int.chunks_exact(5).enumerate() {
        for (c, &v) in row.iter().enumerate() {
            let field = format!("{v:>INT_WIDTH$}");
            if field.len() > INT_WIDTH {
                let name = INT_HEADERS[r * 5 + c];
                return Err(SacError::invalid_argument(format!(
                    "header '{name}' = {v} does not fit a {INT_WIDTH}-column ASCII field"
                )));
            }
            out.extend_from_slice(field.as_bytes());
        }
        out.push(b'\n');
    }
    for row in header.string.chunks_exact(3) {
        for slot in row {
            out.extend_from_slice(slot);
        }
        out.push(b'\n');
    }
    Ok(out)
}

/// Format like C's `%#15.7g`: seven significant digits, trailing zeros
/// and decimal point kept, exponent form outside `1e-4 <= |v| < 1e7`.
fn format_float(value: f32) -> String {
    format!("{:>FLOAT_WIDTH$}", format_g7(f64::from(value)))
}

fn format_g7(v: f64) -> String {
    const PRECISION: i32 = 7;
    if !v.is_finite() {
        return v.to_string();
    }
    // Round to the target digits first; rounding can bump the exponent.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        let fixed = format!("{v:.decimals$}");
        if decimals == 0 { fixed + "." } else { fixed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{FNULL, idx};
    use std::io::Cursor;

    fn make_record(data: Vec<f32>) -> SacRecord {
        let mut header = HeaderArrays::new();
        header.int[idx::NVHDR] = 6;
        header.int[idx::NPTS] = data.len() as i32;
        header.float[idx::DELTA] = 0.01;
        header.string[0] = *b"ANMO    ";
        SacRecord::new().with_header(header).with_data(data)
    }

    fn encode(record: &SacRecord) -> String {
        let mut cursor = Cursor::new(Vec::new());
        write_sac_ascii(&mut cursor, record).unwrap();
        String::from_utf8(cursor.into_inner()).unwrap()
    }

    #[test]
    fn test_format_g7() {
        assert_eq!(format_float(FNULL), "      -12345.00");
        assert_eq!(format_float(0.01), "     0.01000000");
        assert_eq!(format_float(1.0), "       1.000000");
        assert_eq!(format_float(0.0), "       0.000000");
        assert_eq!(format_float(1e-5), "   1.000000e-05");
        assert_eq!(format_float(1234567.0), "       1234567.");
        assert_eq!(format_float(12345678.0), "   1.234568e+07");
        assert_eq!(format_float(-2.5e20), "  -2.500000e+20");
    }

    #[test]
    fn test_header_block_length() {
        let text = encode(&SacRecord::new().with_header(HeaderArrays::new()));
        assert_eq!(text.len(), ASCII_HEADER_LEN);
        assert_eq!(text.lines().count(), HEADER_LINES);
    }

    #[test]
    fn test_layout() {
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let text = encode(&make_record(data));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HEADER_LINES + 3);
        assert!(lines[0].starts_with("     0.01000000      -12345.00"));
        assert_eq!(lines[0].len(), 75);
        assert_eq!(lines[15].len(), 50);
        assert!(lines[15].starts_with("    -12345         6"));
        assert_eq!(lines[22], "ANMO    -12345  -12345  ");
        assert_eq!(lines[30].len(), 75);
        assert_eq!(lines[32], "10.00000\t11.00000");
    }

    #[test]
    fn test_roundtrip() {
        let data = vec![0.5, -1.25, 3.0e-6, 42.0, 7.0, 1.0e10, -0.001];
        let record = make_record(data.clone());
        let text = encode(&record);
        let decoded = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap();

        assert_eq!(decoded.header.int, record.header.int);
        assert_eq!(decoded.header.string, record.header.string);
        assert_eq!(decoded.header.float, record.header.float);
        let Some(Samples::Float(got)) = decoded.data else {
            panic!("expected float data");
        };
        for (a, b) in got.iter().zip(data.iter()) {
            assert!((a - b).abs() <= 1e-6 * b.abs(), "{a} != {b}");
        }
    }

    #[test]
    fn test_zero_npts_writes_no_data() {
        let record = make_record(vec![]);
        let text = encode(&record);
        assert_eq!(text.lines().count(), HEADER_LINES);
        let decoded = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap();
        assert_eq!(decoded.data, Some(Samples::Float(vec![])));
    }

    #[test]
    fn test_write_rejects_npts_mismatch() {
        let mut record = make_record(vec![1.0, 2.0]);
        record.header.int[idx::NPTS] = 3;
        let err = write_sac_ascii(&mut Cursor::new(Vec::new()), &record).unwrap_err();
        assert!(matches!(
            err,
            SacError::SampleCountMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_too_few_lines() {
        let text = "1 2 3 4 5\n".repeat(20);
        let err = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap_err();
        assert!(matches!(err, SacError::InvalidAscii(_)));
    }

    #[test]
    fn test_read_npts_mismatch() {
        let mut text = encode(&make_record(vec![1.0, 2.0, 3.0]));
        text.push_str("4.0\n");
        let err = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            SacError::SampleCountMismatch {
                expected: 3,
                actual: 4
            }
        ));

        let rec = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new().headonly()).unwrap();
        assert!(rec.data.is_none());
    }

    #[test]
    fn test_bad_header_row() {
        let mut lines: Vec<String> = encode(&make_record(vec![]))
            .lines()
            .map(String::from)
            .collect();
        lines[3] = "1.0 2.0 3.0".into();
        let text = lines.join("\n");
        let err = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap_err();
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_crlf_and_short_string_lines() {
        let text = encode(&make_record(vec![1.0]))
            .replace("ANMO    -12345  -12345  ", "ANMO    -12345  -12345")
            .replace('\n', "\r\n");
        let rec = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap();
        assert_eq!(rec.header.string[0], *b"ANMO    ");
        assert_eq!(rec.header.string[2], *b"-12345  ");
        assert_eq!(rec.data, Some(Samples::Float(vec![1.0])));
    }

    #[test]
    fn test_header_only_write_keeps_data_lines() {
        let original = make_record(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut cursor = Cursor::new(encode(&original).into_bytes());

        let mut update = original.clone();
        update.data = None;
        update.header.float[idx::DELTA] = 0.02;
        let warnings = write_sac_ascii(&mut cursor, &update).unwrap();
        assert!(warnings.is_empty());

        let bytes = cursor.into_inner();
        let decoded = read_sac_ascii(&mut bytes.as_slice(), &ReadOptions::new()).unwrap();
        assert_eq!(decoded.header.delta(), 0.02);
        assert_eq!(
            decoded.data,
            Some(Samples::Float(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
        );
    }

    #[test]
    fn test_int_wider_than_column_rejected() {
        let mut record = make_record(vec![1.0]);
        record.header.int[idx::NZYEAR] = -1_234_567_890;
        let mut cursor = Cursor::new(Vec::new());
        let err = write_sac_ascii(&mut cursor, &record).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("nzyear"));
        assert!(cursor.into_inner().is_empty());

        // Ten characters still fit.
        record.header.int[idx::NZYEAR] = -123_456_789;
        let text = encode(&record);
        let back = read_sac_ascii(&mut text.as_bytes(), &ReadOptions::new()).unwrap();
        assert_eq!(back.header.int[idx::NZYEAR], -123_456_789);
    }

    #[test]
    fn test_header_only_write_to_empty_stream_warns() {
        let mut record = make_record(vec![]);
        record.data = None;
        let warnings = write_sac_ascii(&mut Cursor::new(Vec::new()), &record).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
