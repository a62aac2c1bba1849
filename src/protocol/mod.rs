//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the baseline OMCI envelope:
//! - 4-byte header encoding/decoding and the message-type flags
//! - Frame struct carrying a typed message
//! - Codec binding frames to an entity registry and decode settings

mod frame;
mod wire_format;

pub use frame::{Codec, Frame};
pub use wire_format::{
    flags, Header, MessageType, BASELINE_PROTOCOL_ID, BASELINE_TRAILER, CONTENT_SIZE, FRAME_SIZE,
    HEADER_SIZE, MESSAGE_CONTENTS_SIZE, TRAILER_SIZE,
};
