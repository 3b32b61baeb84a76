//! Read and write SAC binary files.
//!
//! A binary SAC file is a 632-byte header (70 float32, 40 int32 and 24
//! eight-byte strings) followed by `npts` float32 samples, all in one byte
//! order. The byte order is not stored explicitly; it is inferred from the
//! header version `nvhdr`, which only makes sense in the right order.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::header::{NFLOAT, NINT, NSTRING, NVHDR_MAX, NVHDR_MIN, STRING_WIDTH, idx};
use crate::record::{HeaderArrays, SacRecord, Samples};
use crate::types::{ByteOrder, ReadOptions, Warning, WriteOptions};
use crate::{Result, SacError};

const FLOAT_BYTES: usize = NFLOAT * 4;
const INT_BYTES: usize = NINT * 4;
const STRING_BYTES: usize = NSTRING * STRING_WIDTH;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = FLOAT_BYTES + INT_BYTES + STRING_BYTES;

/// Whether an int header decoded under some byte order is plausible,
/// i.e. `nvhdr` lies strictly between 0 and 20.
pub fn is_valid_byteorder(hi: &[i32]) -> bool {
    hi.get(idx::NVHDR)
        .is_some_and(|v| (NVHDR_MIN..=NVHDR_MAX).contains(v))
}

/// Theoretical file size for a header declaring `npts` samples.
pub fn expected_file_size(npts: i32) -> Option<u64> {
    u64::try_from(npts).ok().map(|n| HEADER_SIZE as u64 + 4 * n)
}

/// Read a SAC binary file from a seekable stream positioned at its start.
///
/// The stream is left open. See [`read_sac_file`] for the path variant.
pub fn read_sac<R: Read + Seek>(reader: &mut R, options: &ReadOptions) -> Result<SacRecord> {
    read_from(reader, options, "stream")
}

/// Read a SAC binary file from disk.
///
/// ```no_run
/// use sac_rs::{ReadOptions, read_sac_file};
///
/// let record = read_sac_file("II.ABKT.00.BHZ.sac", &ReadOptions::new().checksize()).unwrap();
/// println!("{record}");
/// ```
pub fn read_sac_file(path: impl AsRef<Path>, options: &ReadOptions) -> Result<SacRecord> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| SacError::io(format!("cannot open file: {}", path.display()), e))?;
    read_from(
        &mut BufReader::new(file),
        options,
        &path.display().to_string(),
    )
}

fn read_from<R: Read + Seek>(
    reader: &mut R,
    options: &ReadOptions,
    source: &str,
) -> Result<SacRecord> {
    let io_err = |e: std::io::Error| SacError::io(format!("cannot read {source}"), e);

    let mut buf = Vec::with_capacity(HEADER_SIZE);
    reader
        .by_ref()
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut buf)
        .map_err(io_err)?;
    if buf.len() != HEADER_SIZE {
        return Err(SacError::HeaderTooShort {
            expected: HEADER_SIZE,
            actual: buf.len(),
        });
    }

    let assumed = options.byte_order.unwrap_or_else(ByteOrder::native);
    let mut byte_order = assumed;
    let mut header = decode_header(&buf, byte_order);
    if !is_valid_byteorder(&header.int) {
        if options.byte_order.is_some() {
            return Err(SacError::IncorrectByteOrder(assumed));
        }
        // Same bytes, other order; no re-read.
        byte_order = assumed.swapped();
        header = decode_header(&buf, byte_order);
    }
    tracing::debug!(source, %byte_order, nvhdr = header.nvhdr(), "read SAC header");

    let npts = header.npts();

    if options.checksize {
        let expected = expected_file_size(npts).ok_or(SacError::InvalidNpts(npts))?;
        let actual = stream_len(reader).map_err(io_err)?;
        if actual != expected {
            return Err(SacError::FileSizeMismatch { actual, expected });
        }
    }

    let data = if options.headonly {
        None
    } else {
        let count = usize::try_from(npts).map_err(|_| SacError::InvalidNpts(npts))?;
        let mut raw = Vec::new();
        reader
            .by_ref()
            .take(count as u64 * 4)
            .read_to_end(&mut raw)
            .map_err(io_err)?;
        if raw.len() != count * 4 {
            return Err(SacError::SampleCountMismatch {
                expected: count,
                actual: raw.len() / 4,
            });
        }
        let mut samples = vec![0f32; count];
        read_f32s(&raw, &mut samples, byte_order);
        Some(Samples::Float(samples))
    };

    Ok(SacRecord {
        header,
        data,
        byte_order,
    })
}

/// Total length of a stream; the read position is restored afterwards.
pub(crate) fn stream_len<S: Seek>(stream: &mut S) -> std::io::Result<u64> {
    let pos = stream.stream_position()?;
    let len = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(pos))?;
    Ok(len)
}

/// Write a SAC binary file to a stream.
///
/// With `record.data == None` only the 632 header bytes are written, for
/// updating the header of an existing file in place. Warnings are
/// returned if the stream does not already hold the data region that
/// header declares, or if the header being replaced is in the other byte
/// order. Headers and data are written in `options.byte_order`, or in
/// `record.byte_order` if unset. Data is always stored as float32. The
/// stream is left open.
pub fn write_sac<W: Read + Write + Seek>(
    writer: &mut W,
    record: &SacRecord,
    options: &WriteOptions,
) -> Result<Vec<Warning>> {
    let destination = "stream";
    let byte_order = options.byte_order.unwrap_or(record.byte_order);
    let mut warnings = Vec::new();

    if record.data.is_none() {
        let len = stream_len(writer)
            .map_err(|e| SacError::io(format!("cannot write SAC buffer to {destination}"), e))?;
        let needed = expected_file_size(record.header.npts()).unwrap_or(HEADER_SIZE as u64);
        if len < needed {
            warnings.push(
                Warning::HeaderOnlyWithoutData {
                    destination: destination.into(),
                }
                .emit(),
            );
        }
        warnings.extend(byte_order_mismatch(writer, byte_order, destination)?);
    }

    write_to(writer, record, byte_order, destination)?;
    Ok(warnings)
}

/// Write a SAC binary file to disk.
///
/// With data the file is created or truncated. Without data the file
/// must already exist: its header is overwritten in place and its data
/// region is left untouched.
pub fn write_sac_file(
    path: impl AsRef<Path>,
    record: &SacRecord,
    options: &WriteOptions,
) -> Result<Vec<Warning>> {
    let path = path.as_ref();
    let destination = path.display().to_string();
    let open_err = |e: std::io::Error| SacError::io(format!("cannot open file: {destination}"), e);
    let byte_order = options.byte_order.unwrap_or(record.byte_order);
    let mut warnings = Vec::new();

    if record.data.is_none() {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(open_err)?;
        warnings.extend(byte_order_mismatch(&mut file, byte_order, &destination)?);
        file.seek(SeekFrom::Start(0))
            .map_err(|e| SacError::io(format!("cannot write SAC buffer to {destination}"), e))?;
        write_to(&mut file, record, byte_order, &destination)?;
    } else {
        let file = File::create(path).map_err(open_err)?;
        let mut writer = BufWriter::new(file);
        write_to(&mut writer, record, byte_order, &destination)?;
        writer
            .flush()
            .map_err(|e| SacError::io(format!("cannot write SAC buffer to {destination}"), e))?;
    }
    Ok(warnings)
}

/// Warn if the header about to be overwritten at the current position was
/// written in a different byte order. The position is restored.
fn byte_order_mismatch<S: Read + Seek>(
    stream: &mut S,
    written: ByteOrder,
    destination: &str,
) -> Result<Option<Warning>> {
    let existing = existing_byte_order(stream)
        .map_err(|e| SacError::io(format!("cannot read existing header: {destination}"), e))?;
    Ok(existing
        .filter(|&existing| existing != written)
        .map(|existing| {
            Warning::ByteOrderMismatch {
                destination: destination.to_string(),
                existing,
                written,
            }
            .emit()
        }))
}

/// Byte order of the header at the current position, if there is a
/// complete, plausible one.
fn existing_byte_order<S: Read + Seek>(stream: &mut S) -> std::io::Result<Option<ByteOrder>> {
    let pos = stream.stream_position()?;
    let mut buf = [0u8; HEADER_SIZE];
    let complete = stream.read_exact(&mut buf).is_ok();
    stream.seek(SeekFrom::Start(pos))?;
    if !complete {
        return Ok(None);
    }
    Ok([ByteOrder::native(), ByteOrder::native().swapped()]
        .into_iter()
        .find(|&order| is_valid_byteorder(&decode_header(&buf, order).int)))
}

fn write_to<W: Write>(
    writer: &mut W,
    record: &SacRecord,
    byte_order: ByteOrder,
    destination: &str,
) -> Result<()> {
    let write_err =
        |e: std::io::Error| SacError::io(format!("cannot write SAC buffer to {destination}"), e);

    writer
        .write_all(&encode_header(&record.header, byte_order))
        .map_err(write_err)?;

    if let Some(samples) = &record.data {
        let values = samples.to_f32();
        let mut raw = vec![0u8; values.len() * 4];
        write_f32s(&values, &mut raw, byte_order);
        writer.write_all(&raw).map_err(write_err)?;
    }

    tracing::debug!(
        destination,
        %byte_order,
        samples = record.data.as_ref().map_or(0, Samples::len),
        "wrote SAC binary"
    );
    Ok(())
}

/// Decode the 632 header bytes under the given byte order.
pub(crate) fn decode_header(buf: &[u8], byte_order: ByteOrder) -> HeaderArrays {
    let mut header = HeaderArrays::new();
    let (floats, rest) = buf.split_at(FLOAT_BYTES);
    let (ints, strings) = rest.split_at(INT_BYTES);

    read_f32s(floats, &mut header.float, byte_order);
    match byte_order {
        ByteOrder::Big => BigEndian::read_i32_into(ints, &mut header.int),
        ByteOrder::Little => LittleEndian::read_i32_into(ints, &mut header.int),
    }
    for (slot, chunk) in header
        .string
        .iter_mut()
        .zip(strings[..STRING_BYTES].chunks_exact(STRING_WIDTH))
    {
        slot.copy_from_slice(chunk);
    }
    header
}

/// Encode header arrays into the 632-byte on-disk layout.
pub(crate) fn encode_header(header: &HeaderArrays, byte_order: ByteOrder) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE];
    let (floats, rest) = buf.split_at_mut(FLOAT_BYTES);
    let (ints, strings) = rest.split_at_mut(INT_BYTES);

    write_f32s(&header.float, floats, byte_order);
    match byte_order {
        ByteOrder::Big => BigEndian::write_i32_into(&header.int, ints),
        ByteOrder::Little => LittleEndian::write_i32_into(&header.int, ints),
    }
    for (chunk, slot) in strings
        .chunks_exact_mut(STRING_WIDTH)
        .zip(header.string.iter())
    {
        chunk.copy_from_slice(slot);
    }
    buf
}

fn read_f32s(src: &[u8], dst: &mut [f32], byte_order: ByteOrder) {
    match byte_order {
        ByteOrder::Big => BigEndian::read_f32_into(src, dst),
        ByteOrder::Little => LittleEndian::read_f32_into(src, dst),
    }
}

fn write_f32s(src: &[f32], dst: &mut [u8], byte_order: ByteOrder) {
    match byte_order {
        ByteOrder::Big => BigEndian::write_f32_into(src, dst),
        ByteOrder::Little => LittleEndian::write_f32_into(src, dst),
    }
}
