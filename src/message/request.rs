//! Requests sent by the OLT.

use bytes::BufMut;

use super::{put_attributes, read_u16, Payload};
use crate::entity::{AttributeMap, Entity, EntityClass, MANAGED_ENTITY_ID};
use crate::error::{OmciError, Result};
use crate::protocol::{Codec, MessageType, MESSAGE_CONTENTS_SIZE};

/// Largest attribute data of a Set (32 octets minus the mask).
pub const SET_DATA_SIZE: usize = MESSAGE_CONTENTS_SIZE - 2;

/// Create an entity instance.
///
/// No mask is transmitted: the contents are every set-by-create attribute in
/// ordinal order. Attributes left out fall back to their declared default.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub entity_class: u16,
    pub entity_id: u16,
    /// Values of every set-by-create attribute.
    pub data: AttributeMap,
}

impl CreateRequest {
    /// Build a Create from an instance, filling in defaults.
    pub fn new(entity: &Entity<'_>) -> Result<Self> {
        let class = entity.class();
        Ok(Self {
            entity_class: class.class_id,
            entity_id: entity.entity_id(),
            data: Self::complete(class, entity.values())?,
        })
    }

    /// Every set-by-create value, taking defaults for the ones not given.
    fn complete(class: &EntityClass, values: &AttributeMap) -> Result<AttributeMap> {
        for name in values.keys().filter(|n| n.as_str() != MANAGED_ENTITY_ID) {
            let (_, attr) = class
                .attribute(name)
                .ok_or_else(|| OmciError::UnknownAttribute {
                    class: class.name,
                    attribute: name.clone(),
                })?;
            if !attr.is_set_by_create() {
                return Err(OmciError::InvalidValue {
                    attribute: attr.name,
                    reason: format!("not set-by-create on {}", class.name),
                });
            }
        }

        class
            .attributes_from_mask(class.set_by_create_mask())?
            .into_iter()
            .map(|attr| {
                let value = match values.get(attr.name) {
                    Some(v) => attr.kind.coerce(attr.name, v)?,
                    None => attr
                        .default_value()
                        .ok_or(OmciError::UninitializedField {
                            class: class.name,
                            attribute: attr.name,
                        })?,
                };
                Ok::<_, OmciError>((attr.name.to_string(), value))
            })
            .collect()
    }
}

impl Payload for CreateRequest {
    const MESSAGE_TYPE: MessageType = MessageType::Create;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.entity_class)?;
        let values = Self::complete(class, &self.data)?;
        put_attributes(
            class,
            &values,
            class.set_by_create_mask(),
            MESSAGE_CONTENTS_SIZE,
            buf,
        )
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self> {
        let class = codec.registry().lookup(entity_class)?;
        Ok(Self {
            entity_class,
            entity_id,
            data: class.deserialize(class.set_by_create_mask(), src)?,
        })
    }
}

/// Delete an entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    pub entity_class: u16,
    pub entity_id: u16,
}

impl DeleteRequest {
    pub fn new(entity_class: u16, entity_id: u16) -> Self {
        Self {
            entity_class,
            entity_id,
        }
    }
}

/// Write attributes of an entity instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    pub entity_class: u16,
    pub entity_id: u16,
    pub attributes_mask: u16,
    /// Values of exactly the attributes selected by the mask.
    pub data: AttributeMap,
}

impl SetRequest {
    /// Build a Set of the attributes selected by `mask`.
    ///
    /// With no mask, every assigned attribute is written. Every selected
    /// attribute must have a value and be writable.
    pub fn new(entity: &Entity<'_>, mask: Option<u16>) -> Result<Self> {
        let class = entity.class();
        let attributes_mask = match mask {
            Some(mask) => mask,
            None => entity.mask()?,
        };

        let read_only = attributes_mask & !class.writable_mask();
        if read_only != 0 {
            let attr = class.attributes_from_mask(read_only)?[0];
            return Err(OmciError::InvalidValue {
                attribute: attr.name,
                reason: format!("not writable on {}", class.name),
            });
        }

        Ok(Self {
            entity_class: class.class_id,
            entity_id: entity.entity_id(),
            attributes_mask,
            data: entity.select(attributes_mask)?,
        })
    }
}

impl Payload for SetRequest {
    const MESSAGE_TYPE: MessageType = MessageType::Set;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.entity_class)?;
        buf.put_u16(self.attributes_mask);
        put_attributes(class, &self.data, self.attributes_mask, SET_DATA_SIZE, buf)
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self> {
        let class = codec.registry().lookup(entity_class)?;
        let attributes_mask = read_u16(src, 0);
        Ok(Self {
            entity_class,
            entity_id,
            attributes_mask,
            data: class.deserialize(attributes_mask, &src[2..])?,
        })
    }
}

/// Read attributes of an entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRequest {
    pub entity_class: u16,
    pub entity_id: u16,
    pub attributes_mask: u16,
}

impl GetRequest {
    /// Build a Get of the named attributes.
    pub fn new<S: AsRef<str>>(class: &EntityClass, entity_id: u16, names: &[S]) -> Result<Self> {
        Ok(Self {
            entity_class: class.class_id,
            entity_id,
            attributes_mask: class.mask_for(names)?,
        })
    }
}

impl Payload for GetRequest {
    const MESSAGE_TYPE: MessageType = MessageType::Get;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.entity_class)?;
        class.attributes_from_mask(self.attributes_mask)?;
        buf.put_u16(self.attributes_mask);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self> {
        let class = codec.registry().lookup(entity_class)?;
        let attributes_mask = read_u16(src, 0);
        class.attributes_from_mask(attributes_mask)?;
        Ok(Self {
            entity_class,
            entity_id,
            attributes_mask,
        })
    }
}

/// Start a MIB upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibUploadRequest {
    pub entity_class: u16,
    pub entity_id: u16,
}

impl MibUploadRequest {
    pub fn new(entity_class: u16, entity_id: u16) -> Self {
        Self {
            entity_class,
            entity_id,
        }
    }
}

/// Fetch the next MIB upload entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibUploadNextRequest {
    pub entity_class: u16,
    pub entity_id: u16,
    /// Zero-based index of the entry to upload.
    pub command_sequence_number: u16,
}

impl MibUploadNextRequest {
    pub fn new(entity_class: u16, entity_id: u16, command_sequence_number: u16) -> Self {
        Self {
            entity_class,
            entity_id,
            command_sequence_number,
        }
    }
}

impl Payload for MibUploadNextRequest {
    const MESSAGE_TYPE: MessageType = MessageType::MibUploadNext;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        buf.put_u16(self.command_sequence_number);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        _codec: &Codec<'_>,
    ) -> Result<Self> {
        Ok(Self::new(entity_class, entity_id, read_u16(src, 0)))
    }
}

/// Reset the ONU MIB to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibResetRequest {
    pub entity_class: u16,
    pub entity_id: u16,
}

impl MibResetRequest {
    pub fn new(entity_class: u16, entity_id: u16) -> Self {
        Self {
            entity_class,
            entity_id,
        }
    }
}

/// Reboot the ONU or one of its circuit packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebootRequest {
    pub entity_class: u16,
    pub entity_id: u16,
}

impl RebootRequest {
    pub fn new(entity_class: u16, entity_id: u16) -> Self {
        Self {
            entity_class,
            entity_id,
        }
    }
}

/// Content codec of requests that carry nothing but the entity address.
macro_rules! impl_empty_payload {
    ($($payload:ty => $kind:ident),* $(,)?) => {
        $(impl Payload for $payload {
            const MESSAGE_TYPE: MessageType = MessageType::$kind;

            fn entity_class(&self) -> u16 {
                self.entity_class
            }

            fn entity_id(&self) -> u16 {
                self.entity_id
            }

            fn encode_contents(&self, _codec: &Codec<'_>, _buf: &mut Vec<u8>) -> Result<()> {
                Ok(())
            }

            fn decode_contents(
                entity_class: u16,
                entity_id: u16,
                _src: &[u8],
                _codec: &Codec<'_>,
            ) -> Result<Self> {
                Ok(Self::new(entity_class, entity_id))
            }
        })*
    };
}

impl_empty_payload!(
    DeleteRequest => Delete,
    MibUploadRequest => MibUpload,
    MibResetRequest => MibReset,
    RebootRequest => Reboot,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::catalog::{
        EXTENDED_VLAN_TAGGING_OPERATION_CONFIGURATION_DATA, GAL_ETHERNET_PROFILE,
        IEEE_8021P_MAPPER_SERVICE_PROFILE, ONT_G, TCONT,
    };
    use crate::entity::AttributeValue;

    fn contents<P: Payload>(payload: &P) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        payload.encode_contents(&Codec::standard(), &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn test_create_fills_defaults() {
        let entity = Entity::new(&IEEE_8021P_MAPPER_SERVICE_PROFILE, 0x8000)
            .with("tp_pointer", 0xffffu16)
            .unwrap();
        let create = CreateRequest::new(&entity).unwrap();

        assert_eq!(create.data.len(), 9);
        assert_eq!(
            create.data["interwork_tp_pointer_for_p_bit_priority_7"],
            AttributeValue::Short(0xffff)
        );
        assert_eq!(contents(&create).unwrap(), vec![0xff; 18]);
    }

    #[test]
    fn test_create_without_default_is_uninitialized() {
        let entity = Entity::new(&GAL_ETHERNET_PROFILE, 1);
        let err = CreateRequest::new(&entity).unwrap_err();
        assert!(matches!(
            err,
            OmciError::UninitializedField {
                attribute: "max_gem_payload_size",
                ..
            }
        ));
    }

    #[test]
    fn test_create_rejects_non_sbc_attribute() {
        let entity = Entity::new(&IEEE_8021P_MAPPER_SERVICE_PROFILE, 0x8000)
            .with("tp_pointer", 1u16)
            .unwrap()
            .with("tp_type", 0u8)
            .unwrap();
        let err = CreateRequest::new(&entity).unwrap_err();
        assert!(matches!(err, OmciError::InvalidValue { attribute: "tp_type", .. }));
    }

    #[test]
    fn test_create_ignores_identifier_value() {
        let entity = Entity::new(&GAL_ETHERNET_PROFILE, 1)
            .with("managed_entity_id", 1u16)
            .unwrap()
            .with("max_gem_payload_size", 48u16)
            .unwrap();
        let create = CreateRequest::new(&entity).unwrap();
        assert_eq!(contents(&create).unwrap(), vec![0x00, 0x30]);
    }

    #[test]
    fn test_set_mask_and_data() {
        let entity = Entity::new(&TCONT, 0x8000)
            .with("alloc_id", 0x400u16)
            .unwrap();
        let set = SetRequest::new(&entity, None).unwrap();
        assert_eq!(set.attributes_mask, 0x8000);
        assert_eq!(contents(&set).unwrap(), vec![0x80, 0x00, 0x04, 0x00]);
    }

    #[test]
    fn test_set_rejects_read_only() {
        let entity = Entity::new(&TCONT, 0x8000)
            .with("mode_indicator", 1u8)
            .unwrap();
        let err = SetRequest::new(&entity, None).unwrap_err();
        assert!(matches!(
            err,
            OmciError::InvalidValue {
                attribute: "mode_indicator",
                ..
            }
        ));
    }

    #[test]
    fn test_set_selects_only_masked_values() {
        let entity = Entity::new(&TCONT, 0x8000)
            .with("alloc_id", 0x400u16)
            .unwrap()
            .with("policy", 1u8)
            .unwrap();
        let set = SetRequest::new(&entity, Some(0x2000)).unwrap();
        assert_eq!(set.data.len(), 1);
        assert_eq!(contents(&set).unwrap(), vec![0x20, 0x00, 0x01]);
    }

    #[test]
    fn test_set_overflow() {
        // Octets(24) + Octets(24) exceed the 30-octet data region
        let set = SetRequest {
            entity_class: IEEE_8021P_MAPPER_SERVICE_PROFILE.class_id,
            entity_id: 0,
            attributes_mask: 0x0020,
            data: [(
                "dscp_to_p_bit_mapping".to_string(),
                AttributeValue::from(vec![0u8; 24]),
            )]
            .into_iter()
            .collect(),
        };
        assert!(contents(&set).is_ok());

        let entity = Entity::new(&EXTENDED_VLAN_TAGGING_OPERATION_CONFIGURATION_DATA, 0)
            .with("received_frame_vlan_tagging_operation_table", vec![0u8; 16])
            .unwrap()
            .with("dscp_to_p_bit_mapping", vec![0u8; 24])
            .unwrap();
        let set = SetRequest::new(&entity, None).unwrap();
        let err = contents(&set).unwrap_err();
        assert!(matches!(err, OmciError::ContentOverflow { size: 40, limit: 30 }));
    }

    #[test]
    fn test_get_request() {
        let get = GetRequest::new(&ONT_G, 0, &["vendor_id", "serial_number"]).unwrap();
        assert_eq!(get.attributes_mask, 0xa000);
        assert_eq!(contents(&get).unwrap(), vec![0xa0, 0x00]);
    }

    #[test]
    fn test_get_undeclared_bit() {
        let get = GetRequest {
            entity_class: TCONT.class_id,
            entity_id: 0,
            attributes_mask: 0x0100,
        };
        assert!(matches!(
            contents(&get).unwrap_err(),
            OmciError::MaskMismatch { .. }
        ));
    }

    #[test]
    fn test_unregistered_class() {
        let get = GetRequest {
            entity_class: 0x7777,
            entity_id: 0,
            attributes_mask: 0x8000,
        };
        assert!(matches!(
            contents(&get).unwrap_err(),
            OmciError::UnrecognizedEntityClass(0x7777)
        ));

        // Address-only requests do not need the class
        assert!(contents(&DeleteRequest::new(0x7777, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_mib_upload_next_sequence() {
        let next = MibUploadNextRequest::new(2, 0, 0x1234);
        let bytes = contents(&next).unwrap();
        assert_eq!(bytes, vec![0x12, 0x34]);
        let decoded =
            MibUploadNextRequest::decode_contents(2, 0, &[0x12, 0x34, 0, 0], &Codec::standard())
                .unwrap();
        assert_eq!(decoded, next);
    }
}
