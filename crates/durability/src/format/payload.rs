//! Payload framing
//!
//! Every encoded object travels with a six-byte header naming the schema
//! version it was written under and the length of the payload that
//! follows.
//!
//! # Binary Format
//!
//! ```text
//! offset 0: u16 LE  schema_version
//! offset 2: i32 LE  payload_len
//! offset 6: [u8; payload_len] payload
//! ```
//!
//! Bytes after the payload are ignored; one frame holds one object.

use byteorder::{ByteOrder, LittleEndian};
use verscodec_core::{Error, Result};

/// Size of the payload header in bytes
pub const PAYLOAD_HEADER_SIZE: usize = 6;

/// Header preceding every payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    /// Schema version the payload was written under
    pub schema_version: u16,
    /// Payload length in bytes
    pub payload_len: u32,
}

impl PayloadHeader {
    /// Header for a payload of `payload_len` bytes
    pub fn new(schema_version: u16, payload_len: usize) -> Result<Self> {
        let payload_len = i32::try_from(payload_len)
            .map(|n| n as u32)
            .map_err(|_| Error::ValueOutOfRange(format!("payload of {} bytes", payload_len)))?;
        Ok(PayloadHeader {
            schema_version,
            payload_len,
        })
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; PAYLOAD_HEADER_SIZE] {
        let mut bytes = [0u8; PAYLOAD_HEADER_SIZE];
        LittleEndian::write_u16(&mut bytes[0..2], self.schema_version);
        LittleEndian::write_i32(&mut bytes[2..6], self.payload_len as i32);
        bytes
    }

    /// Parse header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < PAYLOAD_HEADER_SIZE {
            return Err(Error::Truncated {
                offset: 0,
                needed: PAYLOAD_HEADER_SIZE,
                available: data.len(),
            });
        }
        let schema_version = LittleEndian::read_u16(&data[0..2]);
        let len = LittleEndian::read_i32(&data[2..6]);
        let payload_len = u32::try_from(len)
            .map_err(|_| Error::Corruption(format!("negative payload length {}", len)))?;
        Ok(PayloadHeader {
            schema_version,
            payload_len,
        })
    }
}

/// Prefix `payload` with its header
pub fn frame(schema_version: u16, payload: &[u8]) -> Result<Vec<u8>> {
    let header = PayloadHeader::new(schema_version, payload.len())?;
    let mut out = Vec::with_capacity(PAYLOAD_HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Split a frame into its header and exactly `payload_len` payload bytes
pub fn unframe(data: &[u8]) -> Result<(PayloadHeader, &[u8])> {
    let header = PayloadHeader::from_bytes(data)?;
    let len = header.payload_len as usize;
    let available = data.len() - PAYLOAD_HEADER_SIZE;
    if len > available {
        return Err(Error::Truncated {
            offset: PAYLOAD_HEADER_SIZE,
            needed: len,
            available,
        });
    }
    Ok((header, &data[PAYLOAD_HEADER_SIZE..PAYLOAD_HEADER_SIZE + len]))
}
