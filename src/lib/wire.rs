//! Protocol framing for the dispatcher-worker links.
//!
//! Per link, the stream in each direction is a sequence of paragraphs:
//! an `i32` global index (always >= 0), an `i32` body length, then the body
//! bytes, repeated; followed by a single `i32` [`END_OF_STREAM`] sentinel
//! with no further payload. All scalars are little-endian, each occupying
//! one fabric message of exactly 4 bytes.

use crate::errors::{Result, StorymillError};
use crate::fabric::Channel;

/// Sentinel sent in place of a global index to signal end of stream.
pub const END_OF_STREAM: i32 = -1;

/// Send a global index (or [`END_OF_STREAM`]).
pub fn send_index<C: Channel>(link: &mut C, index: i32) -> Result<()> {
    link.send(&index.to_le_bytes())
}

/// Receive a global index (or [`END_OF_STREAM`]).
pub fn recv_index<C: Channel>(link: &mut C) -> Result<i32> {
    let message = link.recv()?;
    let bytes: [u8; 4] =
        message.as_slice().try_into().map_err(|_| StorymillError::ProtocolViolation {
            peer: link.peer().to_string(),
            reason: format!("expected a 4-byte scalar, got {} bytes", message.len()),
        })?;
    Ok(i32::from_le_bytes(bytes))
}

/// Send a length-prefixed paragraph body.
pub fn send_body<C: Channel>(link: &mut C, body: &str) -> Result<()> {
    let len = i32::try_from(body.len()).map_err(|_| StorymillError::ProtocolViolation {
        peer: link.peer().to_string(),
        reason: format!("paragraph body of {} bytes does not fit an i32 length", body.len()),
    })?;
    send_index(link, len)?;
    link.send(body.as_bytes())
}

/// Receive a length-prefixed paragraph body.
pub fn recv_body<C: Channel>(link: &mut C) -> Result<String> {
    let len = recv_index(link)?;
    if len < 0 {
        return Err(StorymillError::ProtocolViolation {
            peer: link.peer().to_string(),
            reason: format!("negative body length {len}"),
        });
    }
    let payload = link.recv()?;
    if payload.len() != len as usize {
        return Err(StorymillError::ProtocolViolation {
            peer: link.peer().to_string(),
            reason: format!("body length prefix {} does not match payload of {} bytes", len, payload.len()),
        });
    }
    String::from_utf8(payload).map_err(|_| StorymillError::ProtocolViolation {
        peer: link.peer().to_string(),
        reason: "paragraph body is not valid UTF-8".to_string(),
    })
}
