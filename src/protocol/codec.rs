//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Argument Frame
//! ```text
//! ┌──────────┬────────────────┬─────────────────────────────┐
//! │ k (1)    │ L (k digits)   │       Payload (L bytes)     │
//! └──────────┴────────────────┴─────────────────────────────┘
//! ```
//! `k` is one ASCII decimal digit, `L` is written in ASCII decimal.
//! Example: `212stored value` is a 12-byte payload.
//!
//! ### Command Frame
//! ```text
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ Cmd (3)  │ Argument Frames (0, 1 or 2)                  │
//! └──────────┴──────────────────────────────────────────────┘
//! ```
//!
//! ### Reply Frame
//! Either `ack`, `err`, `nil`, or `val` followed by one Argument Frame.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{LanKvError, Result};
use super::{Command, Reply, COMMAND_LENGTH, VAL};

/// Longest payload a one-digit width prefix can describe (9 digits)
pub const MAX_ARGUMENT_LEN: u64 = 999_999_999;

// =============================================================================
// Length Helpers
// =============================================================================

/// Number of decimal digits needed to write `n` (at least 1)
pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Parse the ASCII decimal length field
fn parse_length(field: &[u8]) -> Result<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(LanKvError::InvalidLength(
            String::from_utf8_lossy(field).into_owned(),
        ));
    }

    // At most 9 digits, cannot overflow
    Ok(field
        .iter()
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0')))
}

/// Read exactly `len` bytes, reporting how many arrived if the source runs dry
fn read_exact_len<R: Read>(reader: &mut R, len: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let got = reader.by_ref().take(len).read_to_end(&mut buf)? as u64;

    if got < len {
        return Err(LanKvError::TruncatedPayload { expected: len, got });
    }

    Ok(buf)
}

// =============================================================================
// Argument Encoding/Decoding
// =============================================================================

/// Append one argument frame to `buf`
///
/// Format: digit_count (1) + length (digit_count) + payload
pub fn encode_argument(buf: &mut BytesMut, arg: &[u8]) -> Result<()> {
    if arg.len() as u64 > MAX_ARGUMENT_LEN {
        return Err(LanKvError::ArgumentTooLong(arg.len()));
    }

    let length = arg.len().to_string();
    buf.reserve(1 + length.len() + arg.len());
    buf.put_u8(b'0' + digit_count(arg.len()) as u8);
    buf.put_slice(length.as_bytes());
    buf.put_slice(arg);

    Ok(())
}

/// Read one argument frame from a stream
///
/// Blocks until the whole payload has arrived or the source is exhausted.
pub fn read_argument<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let digit = read_exact_len(reader, 1)?[0];
    if !digit.is_ascii_digit() {
        return Err(LanKvError::InvalidLengthDigit(digit));
    }

    let field = read_exact_len(reader, u64::from(digit - b'0'))?;
    let length = parse_length(&field)?;

    read_exact_len(reader, length)
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command exactly as a client would send it
pub fn encode_command(command: &Command) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(COMMAND_LENGTH);
    buf.put_slice(command.code().as_bytes());

    match command {
        Command::Put { key, value } => {
            encode_argument(&mut buf, key)?;
            encode_argument(&mut buf, value)?;
        }
        Command::Get { key } | Command::Delete { key } => {
            encode_argument(&mut buf, key)?;
        }
        Command::Bye => {}
    }

    Ok(buf.freeze())
}

/// Read the 3-byte command code
///
/// Any failure here (including EOF) is a transport error.
pub fn read_header<R: Read>(reader: &mut R) -> Result<[u8; COMMAND_LENGTH]> {
    let mut code = [0u8; COMMAND_LENGTH];
    reader.read_exact(&mut code)?;
    Ok(code)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a value reply: `val` + argument frame
pub fn encode_value_reply(value: &[u8]) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(VAL.len());
    buf.put_slice(VAL);
    encode_argument(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Encode any reply
///
/// Fixed replies are exactly 3 bytes with no delimiter.
pub fn encode_reply(reply: &Reply) -> Result<Bytes> {
    match reply {
        Reply::Value(value) => encode_value_reply(value),
        fixed => Ok(Bytes::from_static(fixed.token())),
    }
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a reply from a stream (client side)
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let token = read_header(reader)?;

    match &token {
        b"ack" => Ok(Reply::Ack),
        b"err" => Ok(Reply::Err),
        b"nil" => Ok(Reply::Nil),
        b"val" => Ok(Reply::Value(read_argument(reader)?)),
        other => Err(LanKvError::Protocol(format!(
            "Unknown reply token: {:?}",
            String::from_utf8_lossy(other)
        ))),
    }
}
