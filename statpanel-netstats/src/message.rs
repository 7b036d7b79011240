//! Netlink message encoding and decoding
//!
//! Message format (host byte order, little-endian on every supported target):
//! - LEN (4 bytes): total message length including this header
//! - TYPE (2 bytes): message type
//! - FLAGS (2 bytes): `NLM_F_*` flags
//! - SEQ (4 bytes): request sequence number, echoed in replies
//! - PID (4 bytes): sender port id (0 = kernel)
//! - PAYLOAD: LEN - 16 bytes, then padding to a 4-byte boundary

use std::fmt;

/// Header size in bytes
pub const HEADER_LEN: usize = 16;

/// Message alignment
pub const ALIGNTO: usize = 4;

/// Error/acknowledgement message
pub const NLMSG_ERROR: u16 = 0x02;

/// End of a multipart reply
pub const NLMSG_DONE: u16 = 0x03;

/// Get interface statistics
pub const RTM_GETSTATS: u16 = 0x5e;

/// Interface statistics reply
pub const RTM_NEWSTATS: u16 = 0x5c;

/// `NLM_F_*` header flags
pub mod flags {
    /// Message is a request
    pub const REQUEST: u16 = 0x01;
    /// Part of a multipart reply
    pub const MULTI: u16 = 0x02;
    /// Request an acknowledgement
    pub const ACK: u16 = 0x04;
    /// Dump was filtered as requested
    pub const DUMP_FILTERED: u16 = 0x20;
}

/// Round a length up to the message alignment
pub const fn align(len: usize) -> usize {
    (len + ALIGNTO - 1) & !(ALIGNTO - 1)
}

/// Errors that can occur while decoding a reply buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// Fewer bytes left than a header needs
    Incomplete,
    /// Header length is shorter than the header or runs past the buffer
    InvalidLength(u32),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::Incomplete => f.write_str("incomplete netlink header"),
            MessageError::InvalidLength(len) => write!(f, "invalid netlink length {len}"),
        }
    }
}

impl std::error::Error for MessageError {}

/// Message header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Total length; computed on encode
    pub length: u32,
    pub msg_type: u16,
    pub flags: u16,
    pub sequence: u32,
    pub pid: u32,
}

impl Header {
    fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        Self {
            length: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            msg_type: u16::from_le_bytes([buf[4], buf[5]]),
            flags: u16::from_le_bytes([buf[6], buf[7]]),
            sequence: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            pid: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        }
    }
}

/// A netlink message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Message {
    /// Create a message with the given type, flags and payload
    pub fn new(msg_type: u16, flags: u16, payload: &[u8]) -> Self {
        Self {
            header: Header {
                length: (HEADER_LEN + payload.len()) as u32,
                msg_type,
                flags,
                sequence: 0,
                pid: 0,
            },
            payload: payload.to_vec(),
        }
    }

    /// Encode this message, padded to the alignment boundary
    pub fn encode(&self) -> Vec<u8> {
        let length = HEADER_LEN + self.payload.len();
        let mut buffer = Vec::with_capacity(align(length));

        buffer.extend_from_slice(&(length as u32).to_le_bytes());
        buffer.extend_from_slice(&self.header.msg_type.to_le_bytes());
        buffer.extend_from_slice(&self.header.flags.to_le_bytes());
        buffer.extend_from_slice(&self.header.sequence.to_le_bytes());
        buffer.extend_from_slice(&self.header.pid.to_le_bytes());
        buffer.extend_from_slice(&self.payload);
        buffer.resize(align(length), 0);

        buffer
    }

    /// Error code of an `NLMSG_ERROR` message (0 for an acknowledgement)
    ///
    /// The kernel reports a negated errno.
    pub fn error_code(&self) -> Option<i32> {
        if self.header.msg_type != NLMSG_ERROR {
            return None;
        }
        let bytes = self.payload.get(..4)?;
        Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Check if this is part of a multipart reply
    pub fn is_multipart(&self) -> bool {
        self.header.flags & flags::MULTI != 0
    }
}

/// Split a received datagram into messages
pub fn parse(mut buf: &[u8]) -> Result<Vec<Message>, MessageError> {
    let mut messages = Vec::new();

    while !buf.is_empty() {
        let raw: &[u8; HEADER_LEN] = buf
            .get(..HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(MessageError::Incomplete)?;
        let header = Header::decode(raw);

        let length = header.length as usize;
        if length < HEADER_LEN || length > buf.len() {
            return Err(MessageError::InvalidLength(header.length));
        }

        messages.push(Message {
            header,
            payload: buf[HEADER_LEN..length].to_vec(),
        });

        buf = buf.get(align(length)..).unwrap_or(&[]);
    }

    Ok(messages)
}
