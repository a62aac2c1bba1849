//! Wire format encoding and decoding.
//!
//! Implements the 44-octet baseline frame:
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┬──────────────┬──────────┐
//! │ TID      │ Msg type │ Proto id │ ME class │ ME id    │ Contents     │ Trailer  │
//! │ 2 bytes  │ 1 byte   │ 1 byte   │ 2 bytes  │ 2 bytes  │ 32 bytes     │ 4 bytes  │
//! │ uint16 BE│          │ 0x0A     │ uint16 BE│ uint16 BE│ zero padded  │ 0x28     │
//! └──────────┴──────────┴──────────┴──────────┴──────────┴──────────────┴──────────┘
//! ```
//!
//! All multi-byte integers are Big Endian.

/// Header size in bytes (transaction id, message type, protocol id).
pub const HEADER_SIZE: usize = 4;

/// Entity class + entity id + message contents.
pub const CONTENT_SIZE: usize = 36;

/// Message-specific contents after the entity class and id.
pub const MESSAGE_CONTENTS_SIZE: usize = 32;

/// Trailer size in bytes.
pub const TRAILER_SIZE: usize = 4;

/// Baseline frame size in bytes (fixed, exactly 44).
pub const FRAME_SIZE: usize = HEADER_SIZE + CONTENT_SIZE + TRAILER_SIZE;

/// Protocol identifier of the baseline message set.
pub const BASELINE_PROTOCOL_ID: u8 = 0x0A;

/// Baseline trailer: zero CPCS-UU/CPI half-word, then the SDU length (40).
pub const BASELINE_TRAILER: u32 = 0x0000_0028;

/// Flag bits of the message-type byte.
pub mod flags {
    /// Destination bit (always 0 in baseline messages).
    pub const DB: u8 = 0b1000_0000;
    /// Acknowledge request: set on originator-sent requests.
    pub const AR: u8 = 0b0100_0000;
    /// Acknowledgement: set on responses.
    pub const AK: u8 = 0b0010_0000;

    /// Bits stripped before dispatching on the opcode.
    pub const FLAGS_MASK: u8 = DB | AR;
    /// Opcode bits. AK is part of the opcode, which keeps responses distinct.
    pub const ACTION_MASK: u8 = !FLAGS_MASK;

    /// Check if a specific flag is set.
    #[inline]
    pub fn has_flag(message_type: u8, flag: u8) -> bool {
        message_type & flag != 0
    }
}

/// Opcodes of the supported message variants (message-type byte without DB/AR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Create = 0x04,
    CreateResponse = 0x24,
    Delete = 0x06,
    DeleteResponse = 0x26,
    Set = 0x08,
    SetResponse = 0x28,
    Get = 0x09,
    GetResponse = 0x29,
    MibUpload = 0x0D,
    MibUploadResponse = 0x2D,
    MibUploadNext = 0x0E,
    MibUploadNextResponse = 0x2E,
    MibReset = 0x0F,
    MibResetResponse = 0x2F,
    AlarmNotification = 0x10,
    AttributeValueChange = 0x11,
    Reboot = 0x19,
    RebootResponse = 0x39,
}

impl MessageType {
    /// Resolve an opcode. Flag bits must already be stripped.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        use MessageType::*;
        Some(match opcode {
            0x04 => Create,
            0x24 => CreateResponse,
            0x06 => Delete,
            0x26 => DeleteResponse,
            0x08 => Set,
            0x28 => SetResponse,
            0x09 => Get,
            0x29 => GetResponse,
            0x0D => MibUpload,
            0x2D => MibUploadResponse,
            0x0E => MibUploadNext,
            0x2E => MibUploadNextResponse,
            0x0F => MibReset,
            0x2F => MibResetResponse,
            0x10 => AlarmNotification,
            0x11 => AttributeValueChange,
            0x19 => Reboot,
            0x39 => RebootResponse,
            _ => return None,
        })
    }

    #[inline]
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Check if this is a request sent by the OLT.
    pub fn is_request(self) -> bool {
        matches!(
            self,
            MessageType::Create
                | MessageType::Delete
                | MessageType::Set
                | MessageType::Get
                | MessageType::MibUpload
                | MessageType::MibUploadNext
                | MessageType::MibReset
                | MessageType::Reboot
        )
    }

    /// Check if this is a response to a request.
    #[inline]
    pub fn is_response(self) -> bool {
        flags::has_flag(self.opcode(), flags::AK)
    }

    /// Check if this is an autonomous ONU notification.
    #[inline]
    pub fn is_notification(self) -> bool {
        !self.is_request() && !self.is_response()
    }

    /// Message-type byte as transmitted: requests carry AR.
    pub fn encoded(self) -> u8 {
        if self.is_request() {
            self.opcode() | flags::AR
        } else {
            self.opcode()
        }
    }

    /// Response type answering this request.
    pub fn response(self) -> Option<MessageType> {
        if self.is_request() {
            MessageType::from_opcode(self.opcode() | flags::AK)
        } else {
            None
        }
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Correlates a response with its request.
    pub transaction_id: u16,
    /// Raw message-type byte, flags included.
    pub message_type: u8,
    /// Protocol identifier (0x0A for baseline).
    pub protocol_id: u8,
}

impl Header {
    /// Create a baseline header.
    pub fn new(transaction_id: u16, message_type: u8) -> Self {
        Self {
            transaction_id,
            message_type,
            protocol_id: BASELINE_PROTOCOL_ID,
        }
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use omci_codec::protocol::{Header, MessageType};
    ///
    /// let header = Header::new(1, MessageType::MibReset.encoded());
    /// assert_eq!(header.encode(), [0x00, 0x01, 0x4F, 0x0A]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (4 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[0..2].copy_from_slice(&self.transaction_id.to_be_bytes());
        buf[2] = self.message_type;
        buf[3] = self.protocol_id;
    }

    /// Decode header from bytes (Big Endian).
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            transaction_id: u16::from_be_bytes([buf[0], buf[1]]),
            message_type: buf[2],
            protocol_id: buf[3],
        })
    }

    /// Message-type byte with DB/AR stripped.
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.message_type & flags::ACTION_MASK
    }

    /// Resolved message type, if the opcode is supported.
    #[inline]
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::from_opcode(self.opcode())
    }

    /// Check if the sender requests an acknowledgement.
    #[inline]
    pub fn ack_requested(&self) -> bool {
        flags::has_flag(self.message_type, flags::AR)
    }

    /// Check if this is an acknowledgement.
    #[inline]
    pub fn is_ack(&self) -> bool {
        flags::has_flag(self.message_type, flags::AK)
    }
}
