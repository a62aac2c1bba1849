//! Entity classes: attribute catalogs with mask arithmetic.
//!
//! Non-identifier attributes are addressed by a 16-bit mask. Ordinal 1 (the
//! first attribute after `managed_entity_id`) is bit 15, ordinal 2 is bit 14,
//! and so on down to ordinal 16 at bit 0:
//!
//! ```text
//! mask bit   15 14 13 12 11 10  9  8  7  6  5  4  3  2  1  0
//! ordinal     1  2  3  4  5  6  7  8  9 10 11 12 13 14 15 16
//! ```
//!
//! Attribute data is always laid out in ascending ordinal order, whatever
//! order the caller listed names in.

use bytes::BufMut;

use super::attribute::{Access, Attribute, AttributeMap, MANAGED_ENTITY_ID};
use crate::bits::bit_positions;
use crate::error::{OmciError, Result};

/// Highest ordinal a 16-bit attribute mask can address.
pub const MAX_ATTRIBUTE_ORDINAL: usize = 16;

/// A managed-entity class: identity plus ordered attribute catalog.
///
/// `attributes[0]` is always the entity's own identifier attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityClass {
    /// G.988 managed entity class id.
    pub class_id: u16,
    /// Human readable name, used in errors and logs.
    pub name: &'static str,
    /// Attribute descriptors in ordinal order.
    pub attributes: &'static [Attribute],
}

impl EntityClass {
    /// Define an entity class.
    pub const fn new(class_id: u16, name: &'static str, attributes: &'static [Attribute]) -> Self {
        Self {
            class_id,
            name,
            attributes,
        }
    }

    /// Mask bit addressing the attribute at `ordinal` (1..=16).
    #[inline]
    pub const fn mask_bit(ordinal: usize) -> u16 {
        debug_assert!(ordinal >= 1 && ordinal <= MAX_ATTRIBUTE_ORDINAL);
        1u16 << (MAX_ATTRIBUTE_ORDINAL - ordinal)
    }

    /// Ascending ordinals whose bit is set in `mask`.
    ///
    /// Pure arithmetic; independent of any class.
    pub fn attribute_indices_from_mask(mask: u16) -> Vec<usize> {
        bit_positions(mask as u32, MAX_ATTRIBUTE_ORDINAL as i32, -1)
            .into_iter()
            .map(|ordinal| ordinal as usize)
            .collect()
    }

    /// Look up an attribute and its ordinal by name.
    pub fn attribute(&self, name: &str) -> Option<(usize, &'static Attribute)> {
        self.attributes
            .iter()
            .enumerate()
            .find(|(_, a)| a.name == name)
    }

    /// Attribute at `ordinal`, if declared.
    #[inline]
    pub fn attribute_at(&self, ordinal: usize) -> Option<&'static Attribute> {
        self.attributes.get(ordinal)
    }

    /// Ordinal of a maskable (non-identifier) attribute.
    fn maskable_ordinal(&self, name: &str) -> Result<usize> {
        match self.attribute(name) {
            Some((ordinal, _)) if (1..=MAX_ATTRIBUTE_ORDINAL).contains(&ordinal) => Ok(ordinal),
            _ => Err(OmciError::UnknownAttribute {
                class: self.name,
                attribute: name.to_string(),
            }),
        }
    }

    /// OR of the mask bits of the named attributes.
    ///
    /// The identifier attribute and attributes past ordinal 16 are not
    /// addressable by mask and are reported as unknown, like any undeclared
    /// name.
    pub fn mask_for<S: AsRef<str>>(&self, names: &[S]) -> Result<u16> {
        names.iter().try_fold(0u16, |mask, name| {
            Ok(mask | Self::mask_bit(self.maskable_ordinal(name.as_ref())?))
        })
    }

    /// Mask of every declared non-identifier attribute.
    pub fn full_mask(&self) -> u16 {
        self.mask_where(|_| true)
    }

    /// Mask of the set-by-create attributes (the Create payload).
    pub fn set_by_create_mask(&self) -> u16 {
        self.mask_where(|a| a.access.contains(Access::SET_BY_CREATE))
    }

    /// Mask of the attributes Get may read.
    pub fn readable_mask(&self) -> u16 {
        self.mask_where(|a| a.access.contains(Access::READ))
    }

    /// Mask of the attributes Set may write.
    pub fn writable_mask(&self) -> u16 {
        self.mask_where(|a| a.access.contains(Access::WRITE))
    }

    fn mask_where(&self, pred: impl Fn(&Attribute) -> bool) -> u16 {
        self.attributes
            .iter()
            .enumerate()
            .skip(1)
            .take(MAX_ATTRIBUTE_ORDINAL)
            .filter(|(_, a)| pred(*a))
            .fold(0, |mask, (ordinal, _)| mask | Self::mask_bit(ordinal))
    }

    /// Attributes selected by `mask`, in ascending ordinal order.
    ///
    /// Fails with `MaskMismatch` if a bit addresses no declared attribute.
    pub fn attributes_from_mask(&self, mask: u16) -> Result<Vec<&'static Attribute>> {
        Self::attribute_indices_from_mask(mask)
            .into_iter()
            .map(|ordinal| {
                self.attribute_at(ordinal)
                    .ok_or_else(|| OmciError::MaskMismatch {
                        class: self.name,
                        mask,
                        reason: format!("no attribute declared at ordinal {}", ordinal),
                    })
            })
            .collect()
    }

    /// Mask selecting every attribute that currently holds a value.
    pub fn mask_of_values(&self, values: &AttributeMap) -> Result<u16> {
        let names: Vec<&str> = values
            .keys()
            .map(String::as_str)
            .filter(|name| *name != MANAGED_ENTITY_ID)
            .collect();
        self.mask_for(&names)
    }

    /// Serialize the attributes selected by `mask` into `buf`.
    ///
    /// With no mask, every attribute holding a value is selected. Values are
    /// emitted in ordinal order with no gaps. Returns the octets written.
    pub fn serialize_into<B: BufMut>(
        &self,
        values: &AttributeMap,
        mask: Option<u16>,
        buf: &mut B,
    ) -> Result<usize> {
        let mask = match mask {
            Some(mask) => mask,
            None => self.mask_of_values(values)?,
        };

        let mut written = 0;
        for attr in self.attributes_from_mask(mask)? {
            let value = values
                .get(attr.name)
                .ok_or(OmciError::UninitializedField {
                    class: self.name,
                    attribute: attr.name,
                })?;
            attr.kind.encode(attr.name, value, buf)?;
            written += attr.kind.encoded_len(value);
        }
        Ok(written)
    }

    /// Serialize the attributes selected by `mask` into a new buffer.
    pub fn serialize(&self, values: &AttributeMap, mask: Option<u16>) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize_into(values, mask, &mut buf)?;
        Ok(buf)
    }

    /// Decode the attributes selected by `mask` from `src`.
    ///
    /// Octets left over after the last selected attribute are ignored.
    pub fn deserialize(&self, mask: u16, src: &[u8]) -> Result<AttributeMap> {
        self.deserialize_counted(mask, src).map(|(values, _)| values)
    }

    /// Like [`deserialize`](Self::deserialize), also returning the octets consumed.
    pub fn deserialize_counted(&self, mask: u16, src: &[u8]) -> Result<(AttributeMap, usize)> {
        let mut values = AttributeMap::new();
        let mut offset = 0;

        for attr in self.attributes_from_mask(mask)? {
            let (value, used) =
                attr.kind
                    .decode(&src[offset..])
                    .ok_or_else(|| OmciError::MaskMismatch {
                        class: self.name,
                        mask,
                        reason: format!(
                            "attribute '{}' needs more than the {} octets left",
                            attr.name,
                            src.len() - offset
                        ),
                    })?;
            values.insert(attr.name.to_string(), value);
            offset += used;
        }
        Ok((values, offset))
    }

    /// Check the class against the catalog invariants.
    ///
    /// - at least the identifier attribute is declared
    /// - a set-by-create identifier is named `managed_entity_id`
    /// - attribute names are unique
    /// - at most 16 attributes follow the identifier
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| OmciError::InvalidEntityClass {
            class_id: self.class_id,
            reason,
        };

        let id_attr = self
            .attributes
            .first()
            .ok_or_else(|| invalid("no identifier attribute".to_string()))?;
        if id_attr.is_set_by_create() && id_attr.name != MANAGED_ENTITY_ID {
            return Err(invalid(format!(
                "set-by-create identifier must be named '{}', found '{}'",
                MANAGED_ENTITY_ID, id_attr.name
            )));
        }

        if self.attributes.len() - 1 > MAX_ATTRIBUTE_ORDINAL {
            return Err(invalid(format!(
                "{} attributes exceed the {} addressable by mask",
                self.attributes.len() - 1,
                MAX_ATTRIBUTE_ORDINAL
            )));
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(invalid(format!("duplicate attribute '{}'", attr.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::attribute::{AttributeKind, AttributeValue};
    use crate::entity::catalog::{CIRCUIT_PACK, IEEE_8021P_MAPPER_SERVICE_PROFILE};
    use proptest::prelude::*;

    fn circuit_pack_values() -> AttributeMap {
        let mut values = AttributeMap::new();
        values.insert("number_of_ports".into(), 4u8.into());
        values.insert("serial_number".into(), b"BCMX1234".as_slice().into());
        values.insert("version".into(), "a1c12fba91de".into());
        values.insert("vendor_id".into(), "BCM".into());
        values.insert("total_tcont_buffer_number".into(), 128u8.into());
        values
    }

    #[test]
    fn test_attribute_indices_from_mask() {
        let f = EntityClass::attribute_indices_from_mask;
        assert_eq!(f(0), Vec::<usize>::new());
        assert_eq!(f(0x800), vec![5]);
        assert_eq!(f(0xf000), vec![1, 2, 3, 4]);
        assert_eq!(f(0xf804), vec![1, 2, 3, 4, 5, 14]);
    }

    #[test]
    fn test_mask_for() {
        assert_eq!(CIRCUIT_PACK.mask_for(&["vendor_id"]).unwrap(), 0x800);
        assert_eq!(
            CIRCUIT_PACK
                .mask_for(&["vendor_id", "bridged_or_ip_ind"])
                .unwrap(),
            0x900
        );
    }

    #[test]
    fn test_mask_for_unknown_name() {
        let err = CIRCUIT_PACK.mask_for(&["no_such_thing"]).unwrap_err();
        assert!(matches!(err, OmciError::UnknownAttribute { .. }));

        // The identifier is not addressable by mask
        assert!(CIRCUIT_PACK.mask_for(&[MANAGED_ENTITY_ID]).is_err());
    }

    #[test]
    fn test_serialize_single_string_attribute() {
        let mut values = AttributeMap::new();
        values.insert("vendor_id".into(), "F".into());
        assert_eq!(CIRCUIT_PACK.serialize(&values, None).unwrap(), b"F\0\0\0");

        values.insert("vendor_id".into(), "FOOX".into());
        assert_eq!(CIRCUIT_PACK.serialize(&values, None).unwrap(), b"FOOX");

        values.insert("number_of_ports".into(), 16u8.into());
        assert_eq!(CIRCUIT_PACK.serialize(&values, None).unwrap(), b"\x10FOOX");
    }

    #[test]
    fn test_serialize_mask_based() {
        let values = circuit_pack_values();

        assert_eq!(
            CIRCUIT_PACK.serialize(&values, None).unwrap(),
            b"\x04BCMX1234a1c12fba91de\x00\x00BCM\x00\x80"
        );
        assert_eq!(CIRCUIT_PACK.serialize(&values, Some(0x800)).unwrap(), b"BCM\x00");
        assert_eq!(
            CIRCUIT_PACK.serialize(&values, Some(0x6800)).unwrap(),
            b"\x04BCMX1234BCM\x00"
        );
    }

    #[test]
    fn test_serialize_uninitialized_field() {
        let values = circuit_pack_values();
        let err = CIRCUIT_PACK.serialize(&values, Some(0xc00)).unwrap_err();
        assert!(matches!(
            err,
            OmciError::UninitializedField {
                attribute: "administrative_state",
                ..
            }
        ));
    }

    #[test]
    fn test_serialize_undeclared_mask_bit() {
        // Circuit pack declares 14 non-identifier attributes; bit 0 is ordinal 16
        let err = CIRCUIT_PACK
            .serialize(&circuit_pack_values(), Some(0x0001))
            .unwrap_err();
        assert!(matches!(err, OmciError::MaskMismatch { mask: 0x0001, .. }));
    }

    #[test]
    fn test_deserialize_ignores_trailing_octets() {
        let mut src = b"\x04BCMX1234BCM\x00".to_vec();
        src.extend_from_slice(&[0xAA; 10]);

        let (values, used) = CIRCUIT_PACK.deserialize_counted(0x6800, &src).unwrap();
        assert_eq!(used, 13);
        assert_eq!(values.len(), 3);
        assert_eq!(values["number_of_ports"], AttributeValue::Byte(4));
        assert_eq!(values["vendor_id"], AttributeValue::from("BCM"));
    }

    #[test]
    fn test_deserialize_short_buffer() {
        let err = CIRCUIT_PACK.deserialize(0x6800, b"\x04BCMX").unwrap_err();
        assert!(matches!(err, OmciError::MaskMismatch { .. }));
        assert!(err.to_string().contains("serial_number"));
    }

    #[test]
    fn test_access_masks() {
        let mapper = &IEEE_8021P_MAPPER_SERVICE_PROFILE;
        // tp_pointer + eight interworking pointers
        assert_eq!(mapper.set_by_create_mask(), 0xff80);
        assert_eq!(mapper.writable_mask(), 0xfff8);
        assert_eq!(CIRCUIT_PACK.full_mask(), 0xfffc);
    }

    #[test]
    fn test_validate_identifier_name() {
        static BAD: &[Attribute] = &[
            Attribute::new("id", AttributeKind::Short, Access::R_SBC),
            Attribute::new("x", AttributeKind::Byte, Access::RW),
        ];
        let class = EntityClass::new(0x7000, "Bad", BAD);
        assert!(matches!(
            class.validate(),
            Err(OmciError::InvalidEntityClass { class_id: 0x7000, .. })
        ));

        // Read-only identifiers may use any name
        static FINE: &[Attribute] = &[Attribute::new("id", AttributeKind::Short, Access::R)];
        assert!(EntityClass::new(0x7001, "Fine", FINE).validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_names() {
        static DUP: &[Attribute] = &[
            Attribute::new(MANAGED_ENTITY_ID, AttributeKind::Short, Access::R),
            Attribute::new("x", AttributeKind::Byte, Access::RW),
            Attribute::new("x", AttributeKind::Byte, Access::RW),
        ];
        let err = EntityClass::new(0x7002, "Dup", DUP).validate().unwrap_err();
        assert!(err.to_string().contains("duplicate attribute 'x'"));
    }

    #[test]
    fn test_mask_for_past_last_ordinal() {
        const fn byte(name: &'static str) -> Attribute {
            Attribute::new(name, AttributeKind::Byte, Access::RW)
        }
        static WIDE: &[Attribute] = &[
            Attribute::new(MANAGED_ENTITY_ID, AttributeKind::Short, Access::R),
            byte("a1"),
            byte("a2"),
            byte("a3"),
            byte("a4"),
            byte("a5"),
            byte("a6"),
            byte("a7"),
            byte("a8"),
            byte("a9"),
            byte("a10"),
            byte("a11"),
            byte("a12"),
            byte("a13"),
            byte("a14"),
            byte("a15"),
            byte("a16"),
            byte("a17"),
        ];
        let class = EntityClass::new(0x7003, "Wide", WIDE);
        assert!(class.validate().is_err());

        assert_eq!(class.mask_for(&["a16"]).unwrap(), 0x0001);
        let err = class.mask_for(&["a1", "a17"]).unwrap_err();
        assert!(matches!(
            err,
            OmciError::UnknownAttribute { ref attribute, .. } if attribute == "a17"
        ));
    }

    const CP_NAMES: &[&str] = &[
        "type",
        "number_of_ports",
        "serial_number",
        "version",
        "vendor_id",
        "administrative_state",
        "operational_state",
        "bridged_or_ip_ind",
        "equipment_id",
        "card_configuration",
        "total_tcont_buffer_number",
        "total_priority_queue_number",
        "total_traffic_scheduler_number",
        "power_sched_override",
    ];

    proptest! {
        #[test]
        fn test_mask_additivity(a in 0..CP_NAMES.len(), b in 0..CP_NAMES.len()) {
            prop_assume!(a != b);
            let (na, nb) = (CP_NAMES[a], CP_NAMES[b]);
            let both = CIRCUIT_PACK.mask_for(&[na, nb]).unwrap();
            prop_assert_eq!(
                both,
                CIRCUIT_PACK.mask_for(&[na]).unwrap() | CIRCUIT_PACK.mask_for(&[nb]).unwrap()
            );

            let mut expected = vec![
                CIRCUIT_PACK.attribute(na).unwrap().0,
                CIRCUIT_PACK.attribute(nb).unwrap().0,
            ];
            expected.sort_unstable();
            prop_assert_eq!(EntityClass::attribute_indices_from_mask(both), expected);
        }

        #[test]
        fn test_serialize_ignores_name_order(a in 0..CP_NAMES.len(), b in 0..CP_NAMES.len()) {
            prop_assume!(a != b);
            let mut values = AttributeMap::new();
            for name in CP_NAMES {
                let (_, attr) = CIRCUIT_PACK.attribute(name).unwrap();
                values.insert(name.to_string(), attr.kind_default());
            }
            let ab = CIRCUIT_PACK.mask_for(&[CP_NAMES[a], CP_NAMES[b]]).unwrap();
            let ba = CIRCUIT_PACK.mask_for(&[CP_NAMES[b], CP_NAMES[a]]).unwrap();
            prop_assert_eq!(
                CIRCUIT_PACK.serialize(&values, Some(ab)).unwrap(),
                CIRCUIT_PACK.serialize(&values, Some(ba)).unwrap()
            );
        }
    }

    trait KindDefault {
        fn kind_default(&self) -> AttributeValue;
    }

    impl KindDefault for Attribute {
        fn kind_default(&self) -> AttributeValue {
            self.with_default(1).default_value().unwrap()
        }
    }
}
