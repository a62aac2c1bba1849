//! Responses sent by the ONU.
//!
//! # Get-Response layout
//!
//! ```text
//! offset  0      1..3   3..28 (or 3..30)   28..30        30..32
//!         result mask   attribute data     unsupported   failed
//! ```
//!
//! The error masks are only transmitted when the result is 9 (attribute
//! failure), which caps the data at 25 octets. Otherwise up to 27 octets of
//! data may be sent; some ONU firmware does this, and decode accepts it
//! unless the codec is configured strictly.

use bytes::BufMut;

use super::{put_attributes, read_u16, Payload, ResultCode};
use crate::entity::catalog::ONT_DATA;
use crate::entity::{AttributeMap, Entity};
use crate::error::{OmciError, Result};
use crate::protocol::{Codec, MessageType};

/// Get-Response data when the error masks are present.
pub const GET_RESPONSE_DATA_SIZE: usize = 25;

/// Get-Response data accepted when the error masks are absent.
pub const GET_RESPONSE_EXTENDED_DATA_SIZE: usize = 27;

/// MIB-Upload-Next-Response object data (32 octets minus class, id, mask).
pub const MIB_UPLOAD_NEXT_DATA_SIZE: usize = 26;

const DATA_OFFSET: usize = 3;
const UNSUPPORTED_MASK_OFFSET: usize = 28;
const FAILED_MASK_OFFSET: usize = 30;

/// Result of a Create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
    /// Set-by-create attributes rejected with a parameter error.
    pub parameter_error_mask: u16,
}

impl CreateResponse {
    pub fn new(entity_class: u16, entity_id: u16, result: ResultCode) -> Self {
        Self {
            entity_class,
            entity_id,
            result,
            parameter_error_mask: 0,
        }
    }
}

impl Payload for CreateResponse {
    const MESSAGE_TYPE: MessageType = MessageType::CreateResponse;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        buf.put_u8(self.result.as_u8());
        buf.put_u16(self.parameter_error_mask);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        _codec: &Codec<'_>,
    ) -> Result<Self> {
        Ok(Self {
            entity_class,
            entity_id,
            result: ResultCode::from_u8(src[0]),
            parameter_error_mask: read_u16(src, 1),
        })
    }
}

/// Result of a Set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
    pub unsupported_attributes_mask: u16,
    pub failed_attributes_mask: u16,
}

impl SetResponse {
    pub fn new(entity_class: u16, entity_id: u16, result: ResultCode) -> Self {
        Self {
            entity_class,
            entity_id,
            result,
            unsupported_attributes_mask: 0,
            failed_attributes_mask: 0,
        }
    }
}

impl Payload for SetResponse {
    const MESSAGE_TYPE: MessageType = MessageType::SetResponse;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        buf.put_u8(self.result.as_u8());
        buf.put_u16(self.unsupported_attributes_mask);
        buf.put_u16(self.failed_attributes_mask);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        _codec: &Codec<'_>,
    ) -> Result<Self> {
        Ok(Self {
            entity_class,
            entity_id,
            result: ResultCode::from_u8(src[0]),
            unsupported_attributes_mask: read_u16(src, 1),
            failed_attributes_mask: read_u16(src, 3),
        })
    }
}

/// Result of a Get, with the attribute values read.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
    /// Attributes present in `data`.
    pub attributes_mask: u16,
    pub data: AttributeMap,
    /// Requested attributes the ONU does not support (result 9 only).
    pub unsupported_attributes_mask: u16,
    /// Requested attributes the ONU failed to read (result 9 only).
    pub failed_attributes_mask: u16,
}

impl GetResponse {
    /// Create a response with no attribute data.
    pub fn new(entity_class: u16, entity_id: u16, result: ResultCode) -> Self {
        Self {
            entity_class,
            entity_id,
            result,
            attributes_mask: 0,
            data: AttributeMap::new(),
            unsupported_attributes_mask: 0,
            failed_attributes_mask: 0,
        }
    }

    /// Successful response carrying the attributes selected by `mask`.
    pub fn from_entity(entity: &Entity<'_>, mask: Option<u16>) -> Result<Self> {
        let attributes_mask = match mask {
            Some(mask) => mask,
            None => entity.mask()?,
        };
        Ok(Self {
            attributes_mask,
            data: entity.select(attributes_mask)?,
            ..Self::new(entity.class().class_id, entity.entity_id(), ResultCode::Success)
        })
    }

    /// Report unsupported and failed attributes (result 9).
    pub fn with_attribute_errors(mut self, unsupported: u16, failed: u16) -> Self {
        self.result = ResultCode::AttributeFailure;
        self.unsupported_attributes_mask = unsupported;
        self.failed_attributes_mask = failed;
        self
    }

    #[inline]
    fn has_error_masks(&self) -> bool {
        self.result.is_attribute_failure()
    }
}

impl Payload for GetResponse {
    const MESSAGE_TYPE: MessageType = MessageType::GetResponse;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.entity_class)?;
        let start = buf.len();

        buf.put_u8(self.result.as_u8());
        buf.put_u16(self.attributes_mask);

        if !self.has_error_masks() {
            if self.unsupported_attributes_mask != 0 || self.failed_attributes_mask != 0 {
                tracing::debug!(
                    "Get-Response for {} with result {:?} drops its error masks",
                    class.name,
                    self.result
                );
            }
            return put_attributes(
                class,
                &self.data,
                self.attributes_mask,
                GET_RESPONSE_EXTENDED_DATA_SIZE,
                buf,
            );
        }

        put_attributes(
            class,
            &self.data,
            self.attributes_mask,
            GET_RESPONSE_DATA_SIZE,
            buf,
        )?;
        buf.resize(start + UNSUPPORTED_MASK_OFFSET, 0);
        buf.put_u16(self.unsupported_attributes_mask);
        buf.put_u16(self.failed_attributes_mask);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self> {
        let class = codec.registry().lookup(entity_class)?;
        let mut response = Self::new(entity_class, entity_id, ResultCode::from_u8(src[0]));
        response.attributes_mask = read_u16(src, 1);

        if response.has_error_masks() {
            response.data = class.deserialize(
                response.attributes_mask,
                &src[DATA_OFFSET..UNSUPPORTED_MASK_OFFSET],
            )?;
            response.unsupported_attributes_mask = read_u16(src, UNSUPPORTED_MASK_OFFSET);
            response.failed_attributes_mask = read_u16(src, FAILED_MASK_OFFSET);
            return Ok(response);
        }

        let (data, used) = class.deserialize_counted(
            response.attributes_mask,
            &src[DATA_OFFSET..DATA_OFFSET + GET_RESPONSE_EXTENDED_DATA_SIZE],
        )?;
        if used > GET_RESPONSE_DATA_SIZE {
            if !codec.config().lenient_get_response {
                return Err(OmciError::MaskMismatch {
                    class: class.name,
                    mask: response.attributes_mask,
                    reason: format!(
                        "{} octets of data run into the reserved error masks",
                        used
                    ),
                });
            }
            tracing::debug!(
                "Accepting {} octets of Get-Response data for {} (baseline allows {})",
                used,
                class.name,
                GET_RESPONSE_DATA_SIZE
            );
        }
        response.data = data;
        Ok(response)
    }
}

/// Result of a MIB Upload: how many MIB Upload Next commands to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibUploadResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub number_of_commands: u16,
}

impl MibUploadResponse {
    pub fn new(entity_class: u16, entity_id: u16, number_of_commands: u16) -> Self {
        Self {
            entity_class,
            entity_id,
            number_of_commands,
        }
    }
}

impl Payload for MibUploadResponse {
    const MESSAGE_TYPE: MessageType = MessageType::MibUploadResponse;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        buf.put_u16(self.number_of_commands);
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

/// One uploaded MIB entry: an entity instance and some of its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MibUploadNextResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub object_entity_class: u16,
    pub object_entity_id: u16,
    pub object_attributes_mask: u16,
    pub object_data: AttributeMap,
}

impl MibUploadNextResponse {
    /// Upload entry for `object`, addressed to the ONT data instance.
    pub fn new(object: &Entity<'_>, mask: Option<u16>) -> Result<Self> {
        let object_attributes_mask = match mask {
            Some(mask) => mask,
            None => object.mask()?,
        };
        Ok(Self {
            entity_class: ONT_DATA.class_id,
            entity_id: 0,
            object_entity_class: object.class().class_id,
            object_entity_id: object.entity_id(),
            object_attributes_mask,
            object_data: object.select(object_attributes_mask)?,
        })
    }
}

impl Payload for MibUploadNextResponse {
    const MESSAGE_TYPE: MessageType = MessageType::MibUploadNextResponse;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.object_entity_class)?;
        buf.put_u16(self.object_entity_class);
        buf.put_u16(self.object_entity_id);
        buf.put_u16(self.object_attributes_mask);
        put_attributes(
            class,
            &self.object_data,
            self.object_attributes_mask,
            MIB_UPLOAD_NEXT_DATA_SIZE,
            buf,
        )
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self> {
        let object_entity_class = read_u16(src, 0);
        let object_attributes_mask = read_u16(src, 4);
        let class = codec.registry().lookup(object_entity_class)?;
        Ok(Self {
            entity_class,
            entity_id,
            object_entity_class,
            object_entity_id: read_u16(src, 2),
            object_attributes_mask,
            object_data: class.deserialize(object_attributes_mask, &src[6..])?,
        })
    }
}

/// Result of a Delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
}

/// Result of a MIB Reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibResetResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
}

/// Result of a Reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebootResponse {
    pub entity_class: u16,
    pub entity_id: u16,
    pub result: ResultCode,
}

/// Responses whose contents are only the result code.
macro_rules! impl_result_only {
    ($($payload:ident => $kind:ident),* $(,)?) => {
        $(
            impl $payload {
                pub fn new(entity_class: u16, entity_id: u16, result: ResultCode) -> Self {
                    Self {
                        entity_class,
                        entity_id,
                        result,
                    }
                }
            }

            impl Payload for $payload {
                const MESSAGE_TYPE: MessageType = MessageType::$kind;

                fn entity_class(&self) -> u16 {
                    self.entity_class
                }

                fn entity_id(&self) -> u16 {
                    self.entity_id
                }

                fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
                    buf.put_u8(self.result.as_u8());
                    Ok(())
                }

                fn decode_contents(
                    entity_class: u16,
                    entity_id: u16,
                    src: &[u8],
                    _codec: &Codec<'_>,
                ) -> Result<Self> {
                    Ok(Self::new(entity_class, entity_id, ResultCode::from_u8(src[0])))
                }
            }
        )*
    };
}

impl_result_only!(
    DeleteResponse => DeleteResponse,
    MibResetResponse => MibResetResponse,
    RebootResponse => RebootResponse,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::entity::catalog::{CIRCUIT_PACK, IEEE_8021P_MAPPER_SERVICE_PROFILE};
    use crate::entity::{AttributeValue, EntityRegistry};
    use crate::protocol::MESSAGE_CONTENTS_SIZE;

    fn contents<P: Payload>(payload: &P) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        payload.encode_contents(&Codec::standard(), &mut buf)?;
        Ok(buf)
    }

    fn padded(mut bytes: Vec<u8>) -> Vec<u8> {
        bytes.resize(MESSAGE_CONTENTS_SIZE, 0);
        bytes
    }

    fn mapper() -> Entity<'static> {
        Entity::new(&IEEE_8021P_MAPPER_SERVICE_PROFILE, 0x8002)
            .with("unmarked_frame_option", 0u8)
            .unwrap()
            .with("dscp_to_p_bit_mapping", vec![0u8; 24])
            .unwrap()
            .with("default_p_bit_marking", 1u8)
            .unwrap()
            .with("tp_type", 2u8)
            .unwrap()
    }

    #[test]
    fn test_get_response_error_masks_at_tail() {
        let entity = Entity::new(&IEEE_8021P_MAPPER_SERVICE_PROFILE, 0x8002)
            .with("unmarked_frame_option", 1u8)
            .unwrap();
        let response = GetResponse::from_entity(&entity, None)
            .unwrap()
            .with_attribute_errors(0x0010, 0x0028);

        let bytes = padded(contents(&response).unwrap());
        assert_eq!(&bytes[..4], &[0x09, 0x00, 0x40, 0x01]);
        assert!(bytes[4..28].iter().all(|&b| b == 0));
        assert_eq!(&bytes[28..], &[0x00, 0x10, 0x00, 0x28]);

        let decoded =
            GetResponse::decode_contents(0x82, 0x8002, &bytes, &Codec::standard()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_get_response_error_masks_cap_data() {
        // 27 octets of data leave no room for the masks
        let response = GetResponse::from_entity(&mapper(), Some(0x0078))
            .unwrap()
            .with_attribute_errors(0, 0);
        assert!(matches!(
            contents(&response).unwrap_err(),
            OmciError::ContentOverflow { size: 27, limit: 25 }
        ));
    }

    #[test]
    fn test_get_response_extended_data() {
        let response = GetResponse::from_entity(&mapper(), Some(0x0078)).unwrap();
        let bytes = padded(contents(&response).unwrap());
        assert_eq!(&bytes[..3], &[0x00, 0x00, 0x78]);
        assert_eq!(&bytes[28..], &[0x01, 0x02, 0x00, 0x00]);

        let decoded =
            GetResponse::decode_contents(0x82, 0x8002, &bytes, &Codec::standard()).unwrap();
        assert_eq!(decoded.data.len(), 4);
        assert_eq!(decoded.data["tp_type"], AttributeValue::Byte(2));
        assert_eq!(decoded.unsupported_attributes_mask, 0);
    }

    #[test]
    fn test_get_response_extended_data_strict() {
        let response = GetResponse::from_entity(&mapper(), Some(0x0078)).unwrap();
        let bytes = padded(contents(&response).unwrap());

        let registry = EntityRegistry::standard();
        let strict = Codec::new(registry, CodecConfig::strict());
        let err = GetResponse::decode_contents(0x82, 0x8002, &bytes, &strict).unwrap_err();
        assert!(matches!(err, OmciError::MaskMismatch { mask: 0x0078, .. }));
    }

    #[test]
    fn test_get_response_raw_failure_code_reserves_masks() {
        let mut response = GetResponse::from_entity(&mapper(), Some(0x0078)).unwrap();
        response.result = ResultCode::Other(9);
        response.unsupported_attributes_mask = 0x0010;
        assert!(matches!(
            contents(&response).unwrap_err(),
            OmciError::ContentOverflow { size: 27, limit: 25 }
        ));

        let entity = Entity::new(&IEEE_8021P_MAPPER_SERVICE_PROFILE, 0x8002)
            .with("unmarked_frame_option", 1u8)
            .unwrap();
        let mut response = GetResponse::from_entity(&entity, None).unwrap();
        response.result = ResultCode::Other(9);
        response.unsupported_attributes_mask = 0x0010;
        response.failed_attributes_mask = 0x0028;
        let bytes = padded(contents(&response).unwrap());
        assert_eq!(&bytes[..4], &[0x09, 0x00, 0x40, 0x01]);
        assert_eq!(&bytes[28..], &[0x00, 0x10, 0x00, 0x28]);
    }

    #[test]
    fn test_get_response_masks_ignored_without_failure() {
        let mut response = GetResponse::new(0x82, 0x8002, ResultCode::Success);
        response.failed_attributes_mask = 0x0008;
        let bytes = padded(contents(&response).unwrap());
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_response_layout() {
        let mut response = SetResponse::new(6, 0x101, ResultCode::AttributeFailure);
        response.failed_attributes_mask = 0x0800;
        let bytes = contents(&response).unwrap();
        assert_eq!(bytes, vec![0x09, 0x00, 0x00, 0x08, 0x00]);

        let decoded =
            SetResponse::decode_contents(6, 0x101, &padded(bytes), &Codec::standard()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_create_response_layout() {
        let mut response = CreateResponse::new(0x110, 1, ResultCode::ParameterError);
        response.parameter_error_mask = 0x8000;
        assert_eq!(contents(&response).unwrap(), vec![0x03, 0x80, 0x00]);
    }

    #[test]
    fn test_result_only_responses() {
        let response = RebootResponse::new(256, 0, ResultCode::DeviceBusy);
        assert_eq!(contents(&response).unwrap(), vec![0x06]);
        let decoded =
            RebootResponse::decode_contents(256, 0, &padded(vec![0x06]), &Codec::standard())
                .unwrap();
        assert_eq!(decoded, response);

        let decoded = DeleteResponse::decode_contents(
            0x110,
            1,
            &padded(vec![0x05]),
            &Codec::standard(),
        )
        .unwrap();
        assert_eq!(decoded.result, ResultCode::UnknownInstance);
    }

    #[test]
    fn test_mib_upload_next_response() {
        let object = Entity::new(&CIRCUIT_PACK, 0x101)
            .with("type", 0x2fu8)
            .unwrap()
            .with("number_of_ports", 5u8)
            .unwrap();
        let response = MibUploadNextResponse::new(&object, None).unwrap();
        assert_eq!(response.entity_class, 2);
        assert_eq!(response.object_attributes_mask, 0xc000);

        let bytes = contents(&response).unwrap();
        assert_eq!(bytes, vec![0x00, 0x06, 0x01, 0x01, 0xc0, 0x00, 0x2f, 0x05]);

        let decoded =
            MibUploadNextResponse::decode_contents(2, 0, &padded(bytes), &Codec::standard())
                .unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_mib_upload_next_response_unknown_object() {
        let mut src = padded(vec![0x01, 0x4c, 0x00, 0x00, 0x80, 0x00]);
        src[6] = 0x20;
        let err = MibUploadNextResponse::decode_contents(2, 0, &src, &Codec::standard())
            .unwrap_err();
        assert!(matches!(err, OmciError::UnrecognizedEntityClass(0x14c)));
    }
}
