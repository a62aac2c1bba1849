//! # omci-codec
//!
//! ITU-T G.988 OMCI managed-entity model and baseline message codec.
//!
//! The OLT manages an ONU by exchanging fixed 44-octet OMCI frames over
//! the OMCC. This crate models managed entities as static class
//! descriptors plus sparse attribute values, and encodes and decodes the
//! baseline message set with attribute-mask addressing.
//!
//! ## Layout
//!
//! - [`entity`]: attribute descriptors, entity classes, instances, the class registry
//! - [`message`]: one payload type per supported message, behind [`Message`]
//! - [`protocol`]: header, message-type flags, [`Frame`] and [`Codec`]
//! - [`events`]: alarm and event records handed to adapter-side managers
//! - [`config`]: decode strictness settings
//!
//! ## Example
//!
//! ```
//! use omci_codec::entity::{catalog::GAL_ETHERNET_PROFILE, Entity};
//! use omci_codec::message::CreateRequest;
//! use omci_codec::Frame;
//!
//! let gal = Entity::new(&GAL_ETHERNET_PROFILE, 1).with("max_gem_payload_size", 48u16)?;
//! let frame = Frame::new(2, CreateRequest::new(&gal)?);
//! let bytes = frame.encode()?;
//!
//! assert_eq!(&bytes[..10], &[0x00, 0x02, 0x44, 0x0A, 0x01, 0x10, 0x00, 0x01, 0x00, 0x30]);
//! assert_eq!(Frame::decode(&bytes)?, frame);
//! # Ok::<(), omci_codec::OmciError>(())
//! ```

pub mod bits;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod message;
pub mod protocol;

pub use config::CodecConfig;
pub use entity::{Entity, EntityRegistry};
pub use error::{OmciError, Result};
pub use message::Message;
pub use protocol::{Codec, Frame};
