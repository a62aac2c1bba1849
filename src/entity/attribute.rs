//! Attribute descriptors and attribute values.
//!
//! An [`Attribute`] is the static description of one field of a managed
//! entity: its name, how it is laid out on the wire, and who may touch it.
//! Descriptors are `const`-constructible so entity classes can live in
//! static tables.

use std::collections::BTreeMap;
use std::ops::BitOr;

use bytes::{BufMut, Bytes};
use serde::Serialize;

use crate::error::{OmciError, Result};

/// Reserved name of the identifier attribute at ordinal 0.
///
/// MIB synchronization recognizes this name to skip the identifier when it
/// backfills set-by-create attributes from a Create request.
pub const MANAGED_ENTITY_ID: &str = "managed_entity_id";

/// Access rights of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Access(u8);

impl Access {
    /// Readable by Get.
    pub const READ: Access = Access(0b0000_0001);
    /// Writable by Set.
    pub const WRITE: Access = Access(0b0000_0010);
    /// Supplied in Create, fixed afterwards unless also writable.
    pub const SET_BY_CREATE: Access = Access(0b0000_0100);

    // Common combinations used by the catalog

    /// Read only.
    pub const R: Access = Self::READ;
    /// Read + write.
    pub const RW: Access = Access(Self::READ.0 | Self::WRITE.0);
    /// Read + set-by-create.
    pub const R_SBC: Access = Access(Self::READ.0 | Self::SET_BY_CREATE.0);
    /// Read + write + set-by-create.
    pub const RW_SBC: Access = Access(Self::READ.0 | Self::WRITE.0 | Self::SET_BY_CREATE.0);

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check that every flag of `other` is present.
    #[inline]
    pub const fn contains(self, other: Access) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Access {
    type Output = Access;

    fn bitor(self, rhs: Access) -> Access {
        Access(self.0 | rhs.0)
    }
}

/// Number of octets an attribute occupies on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeWidth {
    /// Always exactly this many octets.
    Fixed(usize),
    /// Natural length of the value; consumes the remainder on decode.
    Variable,
}

/// Wire layout of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// 1-octet unsigned integer.
    Byte,
    /// 2-octet unsigned integer, big endian.
    Short,
    /// 4-octet unsigned integer, big endian.
    Int,
    /// 8-octet unsigned integer, big endian.
    Long,
    /// Text, NUL right-padded (or truncated) to the given width.
    String(usize),
    /// Raw octets, zero right-padded (or truncated) to the given width.
    Octets(usize),
    /// Fixed count of 2-octet integers, zero-filled when short.
    ShortArray(usize),
    /// Raw octets of natural length.
    Variable,
}

impl AttributeKind {
    /// Wire width of this kind.
    pub const fn width(self) -> AttributeWidth {
        match self {
            AttributeKind::Byte => AttributeWidth::Fixed(1),
            AttributeKind::Short => AttributeWidth::Fixed(2),
            AttributeKind::Int => AttributeWidth::Fixed(4),
            AttributeKind::Long => AttributeWidth::Fixed(8),
            AttributeKind::String(n) | AttributeKind::Octets(n) => AttributeWidth::Fixed(n),
            AttributeKind::ShortArray(n) => AttributeWidth::Fixed(n * 2),
            AttributeKind::Variable => AttributeWidth::Variable,
        }
    }

    fn max_integer(self) -> Option<u64> {
        match self {
            AttributeKind::Byte => Some(u8::MAX as u64),
            AttributeKind::Short => Some(u16::MAX as u64),
            AttributeKind::Int => Some(u32::MAX as u64),
            AttributeKind::Long => Some(u64::MAX),
            _ => None,
        }
    }

    fn integer(self, v: u64) -> AttributeValue {
        match self {
            AttributeKind::Byte => AttributeValue::Byte(v as u8),
            AttributeKind::Short => AttributeValue::Short(v as u16),
            AttributeKind::Int => AttributeValue::Int(v as u32),
            _ => AttributeValue::Long(v),
        }
    }

    /// Normalize `value` to the variant this kind decodes to.
    ///
    /// Integers are accepted from any integer variant that fits.
    pub fn coerce(self, attribute: &'static str, value: &AttributeValue) -> Result<AttributeValue> {
        let mismatch = || OmciError::InvalidValue {
            attribute,
            reason: format!("{} cannot be stored as {:?}", value.type_name(), self),
        };

        if let Some(max) = self.max_integer() {
            let v = value.as_u64().ok_or_else(mismatch)?;
            if v > max {
                return Err(OmciError::InvalidValue {
                    attribute,
                    reason: format!("{} does not fit {:?}", v, self),
                });
            }
            return Ok(self.integer(v));
        }

        // Fixed-width octets and arrays are stored at their wire width, so a
        // decoded value compares equal to the one that was encoded.
        match (self, value) {
            (AttributeKind::String(n), AttributeValue::String(s)) => {
                let mut end = s.len().min(n);
                while !s.is_char_boundary(end) {
                    end -= 1;
                }
                self.decode(&fit_octets(&s.as_bytes()[..end], n))
                    .map(|(v, _)| v)
                    .ok_or_else(mismatch)
            }
            (AttributeKind::String(n), AttributeValue::Octets(b)) => self
                .decode(&fit_octets(b, n))
                .map(|(v, _)| v)
                .ok_or_else(mismatch),
            (AttributeKind::Variable, AttributeValue::Octets(_)) => Ok(value.clone()),
            (AttributeKind::Octets(n), AttributeValue::Octets(b)) => {
                Ok(AttributeValue::Octets(fit_octets(b, n)))
            }
            (AttributeKind::Octets(n), AttributeValue::String(s)) => {
                Ok(AttributeValue::Octets(fit_octets(s.as_bytes(), n)))
            }
            (AttributeKind::ShortArray(n), AttributeValue::Shorts(v)) => {
                let mut v = v.clone();
                v.resize(n, 0);
                Ok(AttributeValue::Shorts(v))
            }
            (AttributeKind::Variable, AttributeValue::String(s)) => {
                Ok(AttributeValue::Octets(Bytes::copy_from_slice(s.as_bytes())))
            }
            _ => Err(mismatch()),
        }
    }

    /// Number of octets `value` occupies when encoded as this kind.
    pub fn encoded_len(self, value: &AttributeValue) -> usize {
        match self.width() {
            AttributeWidth::Fixed(n) => n,
            AttributeWidth::Variable => match value {
                AttributeValue::Shorts(v) => v.len() * 2,
                other => other.raw_octets().map_or(0, |b| b.len()),
            },
        }
    }

    /// Append `value` to `buf` at this kind's width.
    pub fn encode<B: BufMut>(
        self,
        attribute: &'static str,
        value: &AttributeValue,
        buf: &mut B,
    ) -> Result<()> {
        match self.coerce(attribute, value)? {
            AttributeValue::Byte(v) => buf.put_u8(v),
            AttributeValue::Short(v) => buf.put_u16(v),
            AttributeValue::Int(v) => buf.put_u32(v),
            AttributeValue::Long(v) => buf.put_u64(v),
            AttributeValue::Shorts(v) => {
                let count = match self {
                    AttributeKind::ShortArray(n) => n,
                    _ => v.len(),
                };
                for i in 0..count {
                    buf.put_u16(v.get(i).copied().unwrap_or(0));
                }
            }
            other => {
                let raw = other.raw_octets().unwrap_or_default();
                match self.width() {
                    AttributeWidth::Fixed(n) => {
                        let used = raw.len().min(n);
                        buf.put_slice(&raw[..used]);
                        buf.put_bytes(0, n - used);
                    }
                    AttributeWidth::Variable => buf.put_slice(raw),
                }
            }
        }
        Ok(())
    }

    /// Decode one value from the front of `src`.
    ///
    /// Returns the value and the octets consumed, or `None` when `src` is
    /// shorter than the kind's fixed width.
    pub fn decode(self, src: &[u8]) -> Option<(AttributeValue, usize)> {
        let n = match self.width() {
            AttributeWidth::Fixed(n) => n,
            AttributeWidth::Variable => src.len(),
        };
        let raw = src.get(..n)?;

        let value = match self {
            AttributeKind::Byte => AttributeValue::Byte(raw[0]),
            AttributeKind::Short => AttributeValue::Short(u16::from_be_bytes([raw[0], raw[1]])),
            AttributeKind::Int => {
                AttributeValue::Int(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
            AttributeKind::Long => {
                let mut be = [0u8; 8];
                be.copy_from_slice(raw);
                AttributeValue::Long(u64::from_be_bytes(be))
            }
            AttributeKind::String(_) => {
                let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                match std::str::from_utf8(&raw[..end]) {
                    Ok(s) => AttributeValue::String(s.to_string()),
                    Err(_) => AttributeValue::Octets(Bytes::copy_from_slice(raw)),
                }
            }
            AttributeKind::ShortArray(_) => AttributeValue::Shorts(
                raw.chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect(),
            ),
            AttributeKind::Octets(_) | AttributeKind::Variable => {
                AttributeValue::Octets(Bytes::copy_from_slice(raw))
            }
        };
        Some((value, n))
    }

    /// Value every octet/element of which is `fill` (integers take it whole).
    fn filled(self, fill: u64) -> AttributeValue {
        match self {
            AttributeKind::String(_) => AttributeValue::String(String::new()),
            AttributeKind::Octets(n) => AttributeValue::Octets(Bytes::from(vec![fill as u8; n])),
            AttributeKind::ShortArray(n) => AttributeValue::Shorts(vec![fill as u16; n]),
            AttributeKind::Variable => AttributeValue::Octets(Bytes::new()),
            integer => integer.integer(fill),
        }
    }
}

fn fit_octets(raw: &[u8], width: usize) -> Bytes {
    if raw.len() == width {
        return Bytes::copy_from_slice(raw);
    }
    let mut v = raw[..raw.len().min(width)].to_vec();
    v.resize(width, 0);
    Bytes::from(v)
}

/// Static description of one managed-entity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, unique within its class.
    pub name: &'static str,
    /// Wire layout.
    pub kind: AttributeKind,
    /// Access rights.
    pub access: Access,
    /// Value used by Create when the caller supplies none.
    pub default: Option<u64>,
}

impl Attribute {
    /// Create a descriptor with no default.
    pub const fn new(name: &'static str, kind: AttributeKind, access: Access) -> Self {
        Self {
            name,
            kind,
            access,
            default: None,
        }
    }

    /// Same descriptor with a Create default.
    pub const fn with_default(self, default: u64) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    /// Wire width.
    #[inline]
    pub const fn width(&self) -> AttributeWidth {
        self.kind.width()
    }

    /// Check if the attribute is supplied at creation time.
    #[inline]
    pub const fn is_set_by_create(&self) -> bool {
        self.access.contains(Access::SET_BY_CREATE)
    }

    /// The declared default as a typed value.
    pub fn default_value(&self) -> Option<AttributeValue> {
        self.default.map(|d| self.kind.filled(d))
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Byte(u8),
    Short(u16),
    Int(u32),
    Long(u64),
    String(String),
    Octets(Bytes),
    Shorts(Vec<u16>),
}

impl AttributeValue {
    /// Integer value, if this is an integer variant.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            AttributeValue::Byte(v) => Some(v as u64),
            AttributeValue::Short(v) => Some(v as u64),
            AttributeValue::Int(v) => Some(v as u64),
            AttributeValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Text value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Raw octets of string and octet values.
    pub fn raw_octets(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::String(s) => Some(s.as_bytes()),
            AttributeValue::Octets(b) => Some(b),
            _ => None,
        }
    }

    /// Element list of a short array.
    pub fn as_shorts(&self) -> Option<&[u16]> {
        match self {
            AttributeValue::Shorts(v) => Some(v),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Byte(_) => "byte",
            AttributeValue::Short(_) => "short",
            AttributeValue::Int(_) => "int",
            AttributeValue::Long(_) => "long",
            AttributeValue::String(_) => "string",
            AttributeValue::Octets(_) => "octets",
            AttributeValue::Shorts(_) => "short array",
        }
    }
}

impl From<u8> for AttributeValue {
    fn from(v: u8) -> Self {
        AttributeValue::Byte(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Byte(v as u8)
    }
}

impl From<u16> for AttributeValue {
    fn from(v: u16) -> Self {
        AttributeValue::Short(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::Long(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(v: &[u8]) -> Self {
        AttributeValue::Octets(Bytes::copy_from_slice(v))
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        AttributeValue::Octets(Bytes::from(v))
    }
}

impl From<Bytes> for AttributeValue {
    fn from(v: Bytes) -> Self {
        AttributeValue::Octets(v)
    }
}

impl From<Vec<u16>> for AttributeValue {
    fn from(v: Vec<u16>) -> Self {
        AttributeValue::Shorts(v)
    }
}

/// Sparse attribute values keyed by attribute name.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(kind: AttributeKind, value: impl Into<AttributeValue>) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        kind.encode("test", &value.into(), &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn test_access_combinations() {
        assert!(Access::RW_SBC.contains(Access::SET_BY_CREATE));
        assert!(Access::RW.contains(Access::READ | Access::WRITE));
        assert!(!Access::R.contains(Access::WRITE));
        assert_eq!(Access::READ | Access::SET_BY_CREATE, Access::R_SBC);
    }

    #[test]
    fn test_integer_encoding_big_endian() {
        assert_eq!(encode(AttributeKind::Byte, 0x10u8).unwrap(), vec![0x10]);
        assert_eq!(encode(AttributeKind::Short, 0x0102u16).unwrap(), vec![1, 2]);
        assert_eq!(
            encode(AttributeKind::Int, 0x01020304u32).unwrap(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_integer_widening_and_range() {
        // A byte-sized value may be stored in a wider attribute
        assert_eq!(encode(AttributeKind::Short, 3u8).unwrap(), vec![0, 3]);

        let err = encode(AttributeKind::Byte, 0x100u16).unwrap_err();
        assert!(matches!(err, OmciError::InvalidValue { .. }));
    }

    #[test]
    fn test_string_padding_and_truncation() {
        assert_eq!(encode(AttributeKind::String(4), "F").unwrap(), b"F\0\0\0");
        assert_eq!(encode(AttributeKind::String(4), "FOOX").unwrap(), b"FOOX");
        assert_eq!(encode(AttributeKind::String(2), "FOOX").unwrap(), b"FO");
    }

    #[test]
    fn test_string_coerce_matches_decode() {
        let kind = AttributeKind::String(4);
        assert_eq!(
            kind.coerce("vendor_id", &"BRCMX".into()).unwrap(),
            AttributeValue::from("BRCM")
        );
        assert_eq!(
            kind.coerce("vendor_id", &"BC\0\0".into()).unwrap(),
            AttributeValue::from("BC")
        );
        // Never split a multi-octet character
        assert_eq!(
            kind.coerce("vendor_id", &"ABCé".into()).unwrap(),
            AttributeValue::from("ABC")
        );
        assert_eq!(
            kind.coerce("vendor_id", &AttributeValue::from(b"BCM".as_slice()))
                .unwrap(),
            AttributeValue::from("BCM")
        );

        let encoded = encode(kind, "BRCMX").unwrap();
        let (decoded, _) = kind.decode(&encoded).unwrap();
        assert_eq!(decoded, kind.coerce("vendor_id", &"BRCMX".into()).unwrap());
    }

    #[test]
    fn test_string_decode_strips_padding() {
        let (value, used) = AttributeKind::String(4).decode(b"BCM\0rest").unwrap();
        assert_eq!(used, 4);
        assert_eq!(value, AttributeValue::from("BCM"));
    }

    #[test]
    fn test_string_decode_non_utf8_keeps_octets() {
        let (value, _) = AttributeKind::String(2).decode(&[0xff, 0x00]).unwrap();
        assert_eq!(value, AttributeValue::from(vec![0xffu8, 0x00]));
    }

    #[test]
    fn test_short_array_fills_missing_elements() {
        let bytes = encode(AttributeKind::ShortArray(3), vec![0x0400u16]).unwrap();
        assert_eq!(bytes, vec![0x04, 0x00, 0, 0, 0, 0]);

        let (value, used) = AttributeKind::ShortArray(3).decode(&bytes).unwrap();
        assert_eq!(used, 6);
        assert_eq!(value, AttributeValue::Shorts(vec![0x0400, 0, 0]));
    }

    #[test]
    fn test_variable_consumes_remainder() {
        assert_eq!(AttributeKind::Variable.encoded_len(&"abc".into()), 3);
        let (value, used) = AttributeKind::Variable.decode(b"abcde").unwrap();
        assert_eq!(used, 5);
        assert_eq!(value, AttributeValue::from(b"abcde".as_slice()));
    }

    #[test]
    fn test_decode_short_buffer() {
        assert!(AttributeKind::Int.decode(&[1, 2, 3]).is_none());
        assert!(AttributeKind::Octets(24).decode(&[0; 23]).is_none());
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let err = encode(AttributeKind::Short, "text").unwrap_err();
        assert!(err.to_string().contains("string cannot be stored"));
    }

    #[test]
    fn test_default_values() {
        let pointer = Attribute::new("p", AttributeKind::Short, Access::RW_SBC).with_default(0xffff);
        assert_eq!(pointer.default_value(), Some(AttributeValue::Short(0xffff)));
        assert!(pointer.is_set_by_create());

        let table = Attribute::new("t", AttributeKind::Octets(3), Access::RW);
        assert_eq!(table.default_value(), None);
        assert_eq!(
            table.with_default(0).default_value(),
            Some(AttributeValue::from(vec![0u8; 3]))
        );
    }
}
