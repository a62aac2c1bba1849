//! Entity instances: a class, an entity id, and sparse attribute values.
//!
//! Value assignment and mask selection are separate steps. Values are
//! checked against the attribute kind when assigned; the mask is chosen
//! when serializing.
//!
//! # Example
//!
//! ```
//! use omci_codec::entity::{catalog::CIRCUIT_PACK, Entity};
//!
//! let entity = Entity::new(&CIRCUIT_PACK, 0x101)
//!     .with("vendor_id", "BCM")?
//!     .with("number_of_ports", 4u8)?;
//!
//! assert_eq!(entity.serialize(None)?, b"\x04BCM\x00");
//! # Ok::<(), omci_codec::OmciError>(())
//! ```

use super::attribute::{AttributeMap, AttributeValue};
use super::class::EntityClass;
use crate::error::{OmciError, Result};

/// A managed-entity instance with partially populated attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<'a> {
    class: &'a EntityClass,
    entity_id: u16,
    values: AttributeMap,
}

impl<'a> Entity<'a> {
    /// Create an instance with no attribute values.
    pub fn new(class: &'a EntityClass, entity_id: u16) -> Self {
        Self {
            class,
            entity_id,
            values: AttributeMap::new(),
        }
    }

    /// Create an instance from an existing value map.
    ///
    /// Every entry is checked as if assigned with [`set`](Self::set).
    pub fn from_values(class: &'a EntityClass, entity_id: u16, values: AttributeMap) -> Result<Self> {
        let mut entity = Self::new(class, entity_id);
        for (name, value) in values {
            entity.set(&name, value)?;
        }
        Ok(entity)
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Assign a value, normalized to the attribute's kind.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<()> {
        let (_, attr) = self
            .class
            .attribute(name)
            .ok_or_else(|| OmciError::UnknownAttribute {
                class: self.class.name,
                attribute: name.to_string(),
            })?;
        let value = attr.kind.coerce(attr.name, &value.into())?;
        self.values.insert(attr.name.to_string(), value);
        Ok(())
    }

    /// Remove a value, returning it if it was assigned.
    pub fn unset(&mut self, name: &str) -> Option<AttributeValue> {
        self.values.remove(name)
    }

    /// Assigned value of an attribute.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    #[inline]
    pub fn class(&self) -> &'a EntityClass {
        self.class
    }

    #[inline]
    pub fn entity_id(&self) -> u16 {
        self.entity_id
    }

    #[inline]
    pub fn values(&self) -> &AttributeMap {
        &self.values
    }

    pub fn into_values(self) -> AttributeMap {
        self.values
    }

    /// Mask selecting every assigned non-identifier attribute.
    pub fn mask(&self) -> Result<u16> {
        self.class.mask_of_values(&self.values)
    }

    /// Values of the attributes selected by `mask`.
    ///
    /// Fails with `UninitializedField` if a selected attribute has no value.
    pub fn select(&self, mask: u16) -> Result<AttributeMap> {
        self.class
            .attributes_from_mask(mask)?
            .into_iter()
            .map(|attr| {
                self.values
                    .get(attr.name)
                    .map(|v| (attr.name.to_string(), v.clone()))
                    .ok_or(OmciError::UninitializedField {
                        class: self.class.name,
                        attribute: attr.name,
                    })
            })
            .collect()
    }

    /// Serialize the attributes selected by `mask` (all assigned ones if `None`).
    pub fn serialize(&self, mask: Option<u16>) -> Result<Vec<u8>> {
        self.class.serialize(&self.values, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::catalog::{CIRCUIT_PACK, GAL_ETHERNET_PROFILE, VLAN_TAGGING_FILTER_DATA};

    #[test]
    fn test_builder_and_get() {
        let entity = Entity::new(&GAL_ETHERNET_PROFILE, 1)
            .with("max_gem_payload_size", 48u16)
            .unwrap();
        assert_eq!(entity.entity_id(), 1);
        assert_eq!(entity.class().class_id, 272);
        assert_eq!(
            entity.get("max_gem_payload_size"),
            Some(&AttributeValue::Short(48))
        );
        assert_eq!(entity.mask().unwrap(), 0x8000);
    }

    #[test]
    fn test_set_unknown_attribute() {
        let err = Entity::new(&CIRCUIT_PACK, 0)
            .with("colour", 1u8)
            .unwrap_err();
        assert!(matches!(
            err,
            OmciError::UnknownAttribute { class: "CircuitPack", .. }
        ));
    }

    #[test]
    fn test_set_normalizes_kind() {
        let mut entity = Entity::new(&VLAN_TAGGING_FILTER_DATA, 0x2101);
        entity.set("vlan_filter_list", vec![0x0400u16]).unwrap();
        entity.set("forward_operation", 0x10u16).unwrap();

        let list = entity.get("vlan_filter_list").unwrap().as_shorts().unwrap();
        assert_eq!(list.len(), 12);
        assert_eq!(entity.get("forward_operation"), Some(&AttributeValue::Byte(0x10)));
    }

    #[test]
    fn test_identifier_value_not_in_mask() {
        let entity = Entity::new(&CIRCUIT_PACK, 0x101)
            .with("managed_entity_id", 0x101u16)
            .unwrap()
            .with("vendor_id", "BCM")
            .unwrap();
        assert_eq!(entity.mask().unwrap(), 0x800);
        assert_eq!(entity.serialize(None).unwrap(), b"BCM\0");
    }

    #[test]
    fn test_select_uninitialized() {
        let entity = Entity::new(&CIRCUIT_PACK, 0).with("vendor_id", "BCM").unwrap();
        assert_eq!(entity.select(0x800).unwrap().len(), 1);

        let err = entity.select(0x900).unwrap_err();
        assert!(matches!(
            err,
            OmciError::UninitializedField {
                attribute: "bridged_or_ip_ind",
                ..
            }
        ));
    }

    #[test]
    fn test_unset() {
        let mut entity = Entity::new(&CIRCUIT_PACK, 0).with("vendor_id", "BCM").unwrap();
        assert!(entity.unset("vendor_id").is_some());
        assert!(entity.unset("vendor_id").is_none());
        assert_eq!(entity.mask().unwrap(), 0);
    }
}
