//! Baseline frames and the codec that encodes and decodes them.
//!
//! # Example
//!
//! ```
//! use omci_codec::message::MibResetRequest;
//! use omci_codec::protocol::Frame;
//!
//! let frame = Frame::new(1, MibResetRequest::new(2, 0));
//! let bytes = frame.encode()?;
//!
//! assert_eq!(bytes.len(), 44);
//! assert_eq!(&bytes[..8], &[0x00, 0x01, 0x4F, 0x0A, 0x00, 0x02, 0x00, 0x00]);
//! assert_eq!(&bytes[40..], &[0x00, 0x00, 0x00, 0x28]);
//! assert_eq!(Frame::decode(&bytes)?, frame);
//! # Ok::<(), omci_codec::OmciError>(())
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::{
    flags, Header, MessageType, BASELINE_PROTOCOL_ID, BASELINE_TRAILER, FRAME_SIZE, HEADER_SIZE,
};
use crate::config::CodecConfig;
use crate::entity::EntityRegistry;
use crate::error::{OmciError, Result};
use crate::message::Message;

/// Offset of the trailer in a baseline frame.
const TRAILER_OFFSET: usize = FRAME_SIZE - 4;

/// A complete baseline frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub transaction_id: u16,
    /// Raw message-type byte, flags included.
    pub message_type: u8,
    pub protocol_id: u8,
    /// Addressed entity and message contents.
    pub message: Message,
    /// Trailer as received. Encode always writes `0x00000028`.
    pub trailer: u32,
}

impl Frame {
    /// Create a baseline frame. Requests get the AR flag.
    pub fn new(transaction_id: u16, message: impl Into<Message>) -> Self {
        let message = message.into();
        Self {
            transaction_id,
            message_type: message.message_type().encoded(),
            protocol_id: BASELINE_PROTOCOL_ID,
            message,
            trailer: BASELINE_TRAILER,
        }
    }

    /// Header fields of this frame.
    #[inline]
    pub fn header(&self) -> Header {
        Header {
            transaction_id: self.transaction_id,
            message_type: self.message_type,
            protocol_id: self.protocol_id,
        }
    }

    /// Opcode of the carried message.
    #[inline]
    pub fn kind(&self) -> MessageType {
        self.message.message_type()
    }

    #[inline]
    pub fn entity_class(&self) -> u16 {
        self.message.entity_class()
    }

    #[inline]
    pub fn entity_id(&self) -> u16 {
        self.message.entity_id()
    }

    /// Check if the sender requests an acknowledgement.
    #[inline]
    pub fn ack_requested(&self) -> bool {
        flags::has_flag(self.message_type, flags::AR)
    }

    /// Encode with the built-in catalog and default settings.
    pub fn encode(&self) -> Result<Bytes> {
        Codec::standard().encode(self)
    }

    /// Decode with the built-in catalog and default settings.
    pub fn decode(buf: &[u8]) -> Result<Frame> {
        Codec::standard().decode(buf)
    }
}

/// Encoder/decoder bound to an entity registry and decode settings.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r EntityRegistry,
    config: CodecConfig,
}

impl Codec<'static> {
    /// Codec over the built-in catalog with default settings.
    pub fn standard() -> Self {
        Self::new(EntityRegistry::standard(), CodecConfig::default())
    }
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r EntityRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    #[inline]
    pub fn registry(&self) -> &'r EntityRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a frame into exactly 44 octets.
    ///
    /// The message-type byte is written as stored, but its opcode must match
    /// the carried message.
    pub fn encode(&self, frame: &Frame) -> Result<Bytes> {
        let kind = frame.kind();
        if frame.message_type & flags::ACTION_MASK != kind.opcode() {
            return Err(OmciError::UnsupportedMessageType(frame.message_type));
        }

        tracing::trace!(
            "Encoding {:?} tid={} for entity {}/{}",
            kind,
            frame.transaction_id,
            frame.entity_class(),
            frame.entity_id()
        );

        let mut buf = BytesMut::with_capacity(FRAME_SIZE);
        buf.put_slice(&frame.header().encode());
        frame.message.encode_into(self, &mut buf)?;
        buf.put_u32(BASELINE_TRAILER);
        debug_assert_eq!(buf.len(), FRAME_SIZE);
        Ok(buf.freeze())
    }

    /// Decode a frame from at least 44 octets.
    pub fn decode(&self, buf: &[u8]) -> Result<Frame> {
        if buf.len() < FRAME_SIZE {
            return Err(OmciError::TruncatedFrame {
                required: FRAME_SIZE,
                actual: buf.len(),
            });
        }
        if buf.len() > FRAME_SIZE {
            if !self.config.accept_surplus_octets {
                return Err(OmciError::SurplusOctets {
                    expected: FRAME_SIZE,
                    actual: buf.len(),
                });
            }
            tracing::debug!(
                "Ignoring {} octets after the baseline frame",
                buf.len() - FRAME_SIZE
            );
        }

        let header = Header::decode(buf).ok_or(OmciError::TruncatedFrame {
            required: FRAME_SIZE,
            actual: buf.len(),
        })?;
        let kind = header
            .kind()
            .ok_or(OmciError::UnsupportedMessageType(header.opcode()))?;

        let trailer = u32::from_be_bytes([
            buf[TRAILER_OFFSET],
            buf[TRAILER_OFFSET + 1],
            buf[TRAILER_OFFSET + 2],
            buf[TRAILER_OFFSET + 3],
        ]);
        if self.config.validate_trailer && trailer != BASELINE_TRAILER {
            return Err(OmciError::InvalidTrailer(trailer));
        }

        tracing::trace!("Decoding {:?} tid={}", kind, header.transaction_id);
        let message = Message::decode(kind, &buf[HEADER_SIZE..TRAILER_OFFSET], self)?;

        Ok(Frame {
            transaction_id: header.transaction_id,
            message_type: header.message_type,
            protocol_id: header.protocol_id,
            message,
            trailer,
        })
    }
}
