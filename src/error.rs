//! Error types for omci-codec.

use thiserror::Error;

/// Main error type for all OMCI encode/decode operations.
///
/// Every variant is a local failure of a single call. Nothing in this crate
/// retries; that belongs to whoever drives the codec.
#[derive(Debug, Error)]
pub enum OmciError {
    /// An attribute selected for serialization has no assigned value.
    #[error("Uninitialized field: {class}.{attribute} is selected but has no value")]
    UninitializedField {
        class: &'static str,
        attribute: &'static str,
    },

    /// An attribute name is not declared on the entity class.
    #[error("Unknown attribute '{attribute}' for {class}")]
    UnknownAttribute {
        class: &'static str,
        attribute: String,
    },

    /// The frame opcode has no message variant.
    #[error("Unsupported message type: 0x{0:02x}")]
    UnsupportedMessageType(u8),

    /// The entity class id is not in the registry.
    #[error("Unrecognized managed entity class: {0}")]
    UnrecognizedEntityClass(u16),

    /// A mask bit addresses no declared attribute, or the attribute data
    /// addressed by the mask runs past the available octets.
    #[error("Mask mismatch for {class} (mask 0x{mask:04x}): {reason}")]
    MaskMismatch {
        class: &'static str,
        mask: u16,
        reason: String,
    },

    /// Input is shorter than a baseline frame.
    #[error("Truncated frame: got {actual} octets, need at least {required}")]
    TruncatedFrame { required: usize, actual: usize },

    /// A value cannot be encoded as the attribute's declared kind.
    #[error("Invalid value for attribute '{attribute}': {reason}")]
    InvalidValue {
        attribute: &'static str,
        reason: String,
    },

    /// Encoded attribute data does not fit the message's data region.
    #[error("Content overflow: {size} octets of attribute data exceed the {limit} octet region")]
    ContentOverflow { size: usize, limit: usize },

    /// An entity class definition breaks a catalog invariant.
    #[error("Invalid entity class {class_id}: {reason}")]
    InvalidEntityClass { class_id: u16, reason: String },

    /// Trailer differs from the baseline constant (strict config only).
    #[error("Invalid trailer: 0x{0:08x}")]
    InvalidTrailer(u32),

    /// Octets beyond the baseline frame (strict config only).
    #[error("Surplus octets: frame is {actual} octets, baseline is {expected}")]
    SurplusOctets { expected: usize, actual: usize },

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias using OmciError.
pub type Result<T> = std::result::Result<T, OmciError>;
