//! Message variants and their content layouts.
//!
//! Every variant addresses one managed entity (class + id) and lays out the
//! 32 octets that follow. Dispatch is a closed enum over the supported
//! opcodes; see [`MessageType`] for the opcode table.
//!
//! Variants that carry an attribute mask or attribute data resolve their
//! entity class through the registry on both encode and decode. The others
//! accept any class id.

mod notification;
mod request;
mod response;

pub use notification::{AlarmNotification, AttributeValueChange, ALARM_BITMAP_SIZE};
pub use request::{
    CreateRequest, DeleteRequest, GetRequest, MibResetRequest, MibUploadNextRequest,
    MibUploadRequest, RebootRequest, SetRequest,
};
pub use response::{
    CreateResponse, DeleteResponse, GetResponse, MibResetResponse, MibUploadNextResponse,
    MibUploadResponse, RebootResponse, SetResponse,
};

use bytes::BufMut;

use crate::entity::{AttributeMap, EntityClass};
use crate::error::{OmciError, Result};
use crate::protocol::{Codec, MessageType, MESSAGE_CONTENTS_SIZE};

/// Per-variant content codec.
pub trait Payload: Sized {
    /// Opcode of this variant.
    const MESSAGE_TYPE: MessageType;

    /// Class of the addressed entity.
    fn entity_class(&self) -> u16;

    /// Instance of the addressed entity.
    fn entity_id(&self) -> u16;

    /// Append the message contents (at most 32 octets, unpadded).
    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()>;

    /// Decode the 32-octet message contents.
    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        codec: &Codec<'_>,
    ) -> Result<Self>;
}

/// Result code carried by responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Command processed successfully.
    Success,
    ProcessingError,
    NotSupported,
    ParameterError,
    UnknownEntity,
    UnknownInstance,
    DeviceBusy,
    InstanceExists,
    /// Some attributes failed; see the unsupported and failed masks.
    AttributeFailure,
    /// Code not defined by G.988, carried as received.
    Other(u8),
}

impl ResultCode {
    pub fn from_u8(code: u8) -> Self {
        match code {
            0 => ResultCode::Success,
            1 => ResultCode::ProcessingError,
            2 => ResultCode::NotSupported,
            3 => ResultCode::ParameterError,
            4 => ResultCode::UnknownEntity,
            5 => ResultCode::UnknownInstance,
            6 => ResultCode::DeviceBusy,
            7 => ResultCode::InstanceExists,
            9 => ResultCode::AttributeFailure,
            other => ResultCode::Other(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ResultCode::Success => 0,
            ResultCode::ProcessingError => 1,
            ResultCode::NotSupported => 2,
            ResultCode::ParameterError => 3,
            ResultCode::UnknownEntity => 4,
            ResultCode::UnknownInstance => 5,
            ResultCode::DeviceBusy => 6,
            ResultCode::InstanceExists => 7,
            ResultCode::AttributeFailure => 9,
            ResultCode::Other(code) => code,
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self.as_u8() == 0
    }

    /// Check if the code is 9, which reserves the error masks in a Get-Response.
    #[inline]
    pub fn is_attribute_failure(self) -> bool {
        self.as_u8() == ResultCode::AttributeFailure.as_u8()
    }
}

impl From<u8> for ResultCode {
    fn from(code: u8) -> Self {
        ResultCode::from_u8(code)
    }
}

/// A decoded or to-be-encoded message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Create(CreateRequest),
    CreateResponse(CreateResponse),
    Delete(DeleteRequest),
    DeleteResponse(DeleteResponse),
    Set(SetRequest),
    SetResponse(SetResponse),
    Get(GetRequest),
    GetResponse(GetResponse),
    MibUpload(MibUploadRequest),
    MibUploadResponse(MibUploadResponse),
    MibUploadNext(MibUploadNextRequest),
    MibUploadNextResponse(MibUploadNextResponse),
    MibReset(MibResetRequest),
    MibResetResponse(MibResetResponse),
    AlarmNotification(AlarmNotification),
    AttributeValueChange(AttributeValueChange),
    Reboot(RebootRequest),
    RebootResponse(RebootResponse),
}

/// Apply `$f` to the payload of whichever variant `$msg` is.
macro_rules! with_payload {
    ($msg:expr, $p:ident => $f:expr) => {
        match $msg {
            Message::Create($p) => $f,
            Message::CreateResponse($p) => $f,
            Message::Delete($p) => $f,
            Message::DeleteResponse($p) => $f,
            Message::Set($p) => $f,
            Message::SetResponse($p) => $f,
            Message::Get($p) => $f,
            Message::GetResponse($p) => $f,
            Message::MibUpload($p) => $f,
            Message::MibUploadResponse($p) => $f,
            Message::MibUploadNext($p) => $f,
            Message::MibUploadNextResponse($p) => $f,
            Message::MibReset($p) => $f,
            Message::MibResetResponse($p) => $f,
            Message::AlarmNotification($p) => $f,
            Message::AttributeValueChange($p) => $f,
            Message::Reboot($p) => $f,
            Message::RebootResponse($p) => $f,
        }
    };
}

/// Opcode of a payload's variant.
fn message_type_of<P: Payload>(_: &P) -> MessageType {
    P::MESSAGE_TYPE
}

impl Message {
    /// Opcode of this message.
    pub fn message_type(&self) -> MessageType {
        with_payload!(self, p => message_type_of(p))
    }

    pub fn entity_class(&self) -> u16 {
        with_payload!(self, p => p.entity_class())
    }

    pub fn entity_id(&self) -> u16 {
        with_payload!(self, p => p.entity_id())
    }

    /// Append entity class, entity id and the zero-padded 32-octet contents.
    pub(crate) fn encode_into<B: BufMut>(&self, codec: &Codec<'_>, buf: &mut B) -> Result<()> {
        let mut contents = Vec::with_capacity(MESSAGE_CONTENTS_SIZE);
        with_payload!(self, p => p.encode_contents(codec, &mut contents))?;
        if contents.len() > MESSAGE_CONTENTS_SIZE {
            return Err(OmciError::ContentOverflow {
                size: contents.len(),
                limit: MESSAGE_CONTENTS_SIZE,
            });
        }

        buf.put_u16(self.entity_class());
        buf.put_u16(self.entity_id());
        buf.put_slice(&contents);
        buf.put_bytes(0, MESSAGE_CONTENTS_SIZE - contents.len());
        Ok(())
    }

    /// Decode the content region (class, id, 32 octets) for `kind`.
    pub(crate) fn decode(kind: MessageType, content: &[u8], codec: &Codec<'_>) -> Result<Self> {
        let entity_class = u16::from_be_bytes([content[0], content[1]]);
        let entity_id = u16::from_be_bytes([content[2], content[3]]);
        let src = &content[4..];

        tracing::trace!(
            "Decoding {:?} for entity {}/{}",
            kind,
            entity_class,
            entity_id
        );

        macro_rules! decode_as {
            ($variant:ident, $payload:ty) => {
                Message::$variant(<$payload>::decode_contents(entity_class, entity_id, src, codec)?)
            };
        }

        Ok(match kind {
            MessageType::Create => decode_as!(Create, CreateRequest),
            MessageType::CreateResponse => decode_as!(CreateResponse, CreateResponse),
            MessageType::Delete => decode_as!(Delete, DeleteRequest),
            MessageType::DeleteResponse => decode_as!(DeleteResponse, DeleteResponse),
            MessageType::Set => decode_as!(Set, SetRequest),
            MessageType::SetResponse => decode_as!(SetResponse, SetResponse),
            MessageType::Get => decode_as!(Get, GetRequest),
            MessageType::GetResponse => decode_as!(GetResponse, GetResponse),
            MessageType::MibUpload => decode_as!(MibUpload, MibUploadRequest),
            MessageType::MibUploadResponse => decode_as!(MibUploadResponse, MibUploadResponse),
            MessageType::MibUploadNext => decode_as!(MibUploadNext, MibUploadNextRequest),
            MessageType::MibUploadNextResponse => {
                decode_as!(MibUploadNextResponse, MibUploadNextResponse)
            }
            MessageType::MibReset => decode_as!(MibReset, MibResetRequest),
            MessageType::MibResetResponse => decode_as!(MibResetResponse, MibResetResponse),
            MessageType::AlarmNotification => decode_as!(AlarmNotification, AlarmNotification),
            MessageType::AttributeValueChange => {
                decode_as!(AttributeValueChange, AttributeValueChange)
            }
            MessageType::Reboot => decode_as!(Reboot, RebootRequest),
            MessageType::RebootResponse => decode_as!(RebootResponse, RebootResponse),
        })
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident($payload:ty)),* $(,)?) => {
        $(impl From<$payload> for Message {
            fn from(p: $payload) -> Self {
                Message::$variant(p)
            }
        })*
    };
}

impl_from_payload!(
    Create(CreateRequest),
    CreateResponse(CreateResponse),
    Delete(DeleteRequest),
    DeleteResponse(DeleteResponse),
    Set(SetRequest),
    SetResponse(SetResponse),
    Get(GetRequest),
    GetResponse(GetResponse),
    MibUpload(MibUploadRequest),
    MibUploadResponse(MibUploadResponse),
    MibUploadNext(MibUploadNextRequest),
    MibUploadNextResponse(MibUploadNextResponse),
    MibReset(MibResetRequest),
    MibResetResponse(MibResetResponse),
    AlarmNotification(AlarmNotification),
    AttributeValueChange(AttributeValueChange),
    Reboot(RebootRequest),
    RebootResponse(RebootResponse),
);

/// Serialize the attributes selected by `mask`, failing past `limit` octets.
pub(crate) fn put_attributes(
    class: &EntityClass,
    values: &AttributeMap,
    mask: u16,
    limit: usize,
    buf: &mut Vec<u8>,
) -> Result<()> {
    let start = buf.len();
    class.serialize_into(values, Some(mask), buf)?;
    let size = buf.len() - start;
    if size > limit {
        return Err(OmciError::ContentOverflow { size, limit });
    }
    Ok(())
}

/// Big-endian u16 at `offset` of a content region.
#[inline]
pub(crate) fn read_u16(src: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([src[offset], src[offset + 1]])
}
