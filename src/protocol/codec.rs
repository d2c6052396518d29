//! Protocol codec
//!
//! Encoding and decoding of RESP2 frames.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────────────────┬──────┬──────────────────────┐
//! │ Type (1) │ Header (len or text) │ CRLF │ Body (bulk / array)  │
//! └──────────┴──────────────────────┴──────┴──────────────────────┘
//! ```
//!
//! Bulk bodies are followed by their own CRLF. Arrays are followed by
//! their elements, each a complete frame.

use std::io::{BufRead, Cursor, Write};

use bytes::{BufMut, BytesMut};

use super::{Command, Frame};
use crate::error::{KvDocError, Result};

/// Maximum bulk string size (512 MB, same limit as the server)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum number of elements accepted in one array
const MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Maximum nesting of arrays inside arrays
const MAX_DEPTH: usize = 32;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Encoding
// =============================================================================

/// Encode a frame to bytes
pub fn encode_frame(frame: &Frame) -> BytesMut {
    let mut buf = BytesMut::new();
    put_frame(&mut buf, frame);
    buf
}

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> BytesMut {
    encode_frame(&command.to_frame())
}

fn put_frame(buf: &mut BytesMut, frame: &Frame) {
    match frame {
        Frame::Simple(s) => put_line(buf, b'+', s.as_bytes()),
        Frame::Error(s) => put_line(buf, b'-', s.as_bytes()),
        Frame::Integer(n) => put_line(buf, b':', n.to_string().as_bytes()),
        Frame::Bulk(data) => {
            put_line(buf, b'$', data.len().to_string().as_bytes());
            buf.reserve(data.len() + CRLF.len());
            buf.put_slice(data);
            buf.put_slice(CRLF);
        }
        Frame::Null => put_line(buf, b'$', b"-1"),
        Frame::Array(items) => {
            put_line(buf, b'*', items.len().to_string().as_bytes());
            for item in items {
                put_frame(buf, item);
            }
        }
        Frame::NullArray => put_line(buf, b'*', b"-1"),
    }
}

fn put_line(buf: &mut BytesMut, prefix: u8, text: &[u8]) {
    buf.reserve(1 + text.len() + CRLF.len());
    buf.put_u8(prefix);
    buf.put_slice(text);
    buf.put_slice(CRLF);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode one frame from the front of a buffer
///
/// Returns the frame and the number of bytes consumed. A buffer that ends
/// mid-frame yields an `Io` error of kind `UnexpectedEof`.
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize)> {
    let mut cursor = Cursor::new(bytes);
    let frame = read_frame(&mut cursor)?;
    Ok((frame, cursor.position() as usize))
}

/// Read a complete frame from a stream
///
/// Blocks until a complete frame is received or an error occurs
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Frame> {
    read_frame_at(reader, 0)
}

fn read_frame_at<R: BufRead>(reader: &mut R, depth: usize) -> Result<Frame> {
    if depth > MAX_DEPTH {
        return Err(KvDocError::Protocol(format!(
            "Array nesting deeper than {}",
            MAX_DEPTH
        )));
    }

    let line = read_line(reader)?;
    let (prefix, rest) = match line.split_first() {
        Some((prefix, rest)) => (*prefix, rest),
        None => return Err(KvDocError::Protocol("Empty frame header".to_string())),
    };

    match prefix {
        b'+' => Ok(Frame::Simple(utf8_line(rest)?)),
        b'-' => Ok(Frame::Error(utf8_line(rest)?)),
        b':' => Ok(Frame::Integer(parse_int(rest)?)),
        b'$' => {
            let len = parse_int(rest)?;
            if len == -1 {
                return Ok(Frame::Null);
            }
            let len = checked_len(len, MAX_BULK_SIZE, "Bulk string")?;

            let mut data = vec![0u8; len];
            reader.read_exact(&mut data)?;

            let mut terminator = [0u8; 2];
            reader.read_exact(&mut terminator)?;
            if terminator != CRLF {
                return Err(KvDocError::Protocol(
                    "Bulk string not terminated by CRLF".to_string(),
                ));
            }
            Ok(Frame::Bulk(data))
        }
        b'*' => {
            let len = parse_int(rest)?;
            if len == -1 {
                return Ok(Frame::NullArray);
            }
            let len = checked_len(len, MAX_ARRAY_LEN, "Array")?;

            let mut items = Vec::with_capacity(len.min(64));
            for _ in 0..len {
                items.push(read_frame_at(reader, depth + 1)?);
            }
            Ok(Frame::Array(items))
        }
        _ => Err(KvDocError::Protocol(format!(
            "Unknown frame type: 0x{:02x}",
            prefix
        ))),
    }
}

/// Read one CRLF-terminated line, returning it without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    if !line.ends_with(CRLF) {
        if line.ends_with(b"\n") {
            return Err(KvDocError::Protocol(
                "Frame header terminated by bare LF".to_string(),
            ));
        }
        // Stream ended before the terminator
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn utf8_line(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| KvDocError::Protocol("Non UTF-8 status line".to_string()))
}

fn parse_int(bytes: &[u8]) -> Result<i64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            KvDocError::Protocol(format!(
                "Invalid integer: {:?}",
                String::from_utf8_lossy(bytes)
            ))
        })
}

fn checked_len(len: i64, max: usize, what: &str) -> Result<usize> {
    if len < 0 {
        return Err(KvDocError::Protocol(format!(
            "{} has negative length {}",
            what, len
        )));
    }
    let len = len as usize;
    if len > max {
        return Err(KvDocError::Protocol(format!(
            "{} too large: {} (max {})",
            what, len, max
        )));
    }
    Ok(len)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    let bytes = encode_frame(frame);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    write_frame(writer, &command.to_frame())
}
