//! Autonomous notifications sent by the ONU.

use bytes::BufMut;
use serde_json::{json, Map, Value};

use super::{put_attributes, read_u16, Payload};
use crate::bits::bit_positions;
use crate::entity::{AttributeMap, Entity};
use crate::error::{OmciError, Result};
use crate::events::ContextData;
use crate::protocol::{Codec, MessageType, MESSAGE_CONTENTS_SIZE};

/// Alarm bitmap size in octets (224 alarm numbers).
pub const ALARM_BITMAP_SIZE: usize = 28;

/// Octets between the bitmap and the sequence number.
const ALARM_RESERVED_SIZE: usize = 3;

/// Largest attribute data of an attribute value change.
pub const AVC_DATA_SIZE: usize = MESSAGE_CONTENTS_SIZE - 2;

/// Alarm state of one entity instance.
///
/// Alarm number `n` is bit `7 - n % 8` of octet `n / 8`, so alarm 0 is the
/// most significant bit of the first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmNotification {
    pub entity_class: u16,
    pub entity_id: u16,
    pub alarm_bitmap: [u8; ALARM_BITMAP_SIZE],
    /// Incremented by the ONU per notification; lets the OLT detect losses.
    pub alarm_sequence_number: u8,
}

impl AlarmNotification {
    /// Notification with every alarm cleared.
    pub fn new(entity_class: u16, entity_id: u16, alarm_sequence_number: u8) -> Self {
        Self {
            entity_class,
            entity_id,
            alarm_bitmap: [0; ALARM_BITMAP_SIZE],
            alarm_sequence_number,
        }
    }

    /// Raise or clear one alarm.
    pub fn set_alarm(&mut self, alarm_number: u8, active: bool) -> Result<()> {
        let octet = alarm_number as usize / 8;
        if octet >= ALARM_BITMAP_SIZE {
            return Err(OmciError::InvalidValue {
                attribute: "alarm_bitmap",
                reason: format!(
                    "alarm number {} exceeds {}",
                    alarm_number,
                    ALARM_BITMAP_SIZE * 8 - 1
                ),
            });
        }
        let bit = 0x80 >> (alarm_number % 8);
        if active {
            self.alarm_bitmap[octet] |= bit;
        } else {
            self.alarm_bitmap[octet] &= !bit;
        }
        Ok(())
    }

    /// Builder form of [`set_alarm`](Self::set_alarm) raising each alarm.
    pub fn with_alarms(mut self, alarm_numbers: &[u8]) -> Result<Self> {
        for &n in alarm_numbers {
            self.set_alarm(n, true)?;
        }
        Ok(self)
    }

    /// Check if an alarm is raised.
    pub fn is_active(&self, alarm_number: u8) -> bool {
        self.alarm_bitmap
            .get(alarm_number as usize / 8)
            .is_some_and(|octet| octet & (0x80 >> (alarm_number % 8)) != 0)
    }

    /// Raised alarm numbers in ascending order.
    pub fn alarm_numbers(&self) -> Vec<u8> {
        self.alarm_bitmap
            .iter()
            .enumerate()
            .flat_map(|(i, &octet)| bit_positions(octet as u32, i as i32 * 8 + 7, -1))
            .map(|n| n as u8)
            .collect()
    }
}

impl Payload for AlarmNotification {
    const MESSAGE_TYPE: MessageType = MessageType::AlarmNotification;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, _codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        buf.put_slice(&self.alarm_bitmap);
        buf.put_bytes(0, ALARM_RESERVED_SIZE);
        buf.put_u8(self.alarm_sequence_number);
        Ok(())
    }

    fn decode_contents(
        entity_class: u16,
        entity_id: u16,
        src: &[u8],
        _codec: &Codec<'_>,
    ) -> Result<Self> {
        let mut alarm_bitmap = [0u8; ALARM_BITMAP_SIZE];
        alarm_bitmap.copy_from_slice(&src[..ALARM_BITMAP_SIZE]);
        Ok(Self {
            entity_class,
            entity_id,
            alarm_bitmap,
            alarm_sequence_number: src[ALARM_BITMAP_SIZE + ALARM_RESERVED_SIZE],
        })
    }
}

impl ContextData for AlarmNotification {
    fn context_data(&self) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert("entity-class".into(), json!(self.entity_class));
        context.insert("entity-id".into(), json!(self.entity_id));
        context.insert("alarm-numbers".into(), json!(self.alarm_numbers()));
        context.insert(
            "alarm-sequence-number".into(),
            json!(self.alarm_sequence_number),
        );
        context
    }
}

/// Attribute values the ONU changed on its own.
///
/// Same layout as a Set: mask, then values in ordinal order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValueChange {
    pub entity_class: u16,
    pub entity_id: u16,
    pub attributes_mask: u16,
    pub data: AttributeMap,
}

impl AttributeValueChange {
    /// Report the attributes of `entity` selected by `mask` (all assigned if `None`).
    pub fn new(entity: &Entity<'_>, mask: Option<u16>) -> Result<Self> {
        let attributes_mask = match mask {
            Some(mask) => mask,
            None => entity.mask()?,
        };
        Ok(Self {
            entity_class: entity.class().class_id,
            entity_id: entity.entity_id(),
            attributes_mask,
            data: entity.select(attributes_mask)?,
        })
    }
}

impl Payload for AttributeValueChange {
    const MESSAGE_TYPE: MessageType = MessageType::AttributeValueChange;

    fn entity_class(&self) -> u16 {
        self.entity_class
    }

    fn entity_id(&self) -> u16 {
        self.entity_id
    }

    fn encode_contents(&self, codec: &Codec<'_>, buf: &mut Vec<u8>) -> Result<()> {
        let class = codec.registry().lookup(self.entity_class)?;
        buf.put_u16(self.attributes_mask);
        put_attributes(class, &self.data, self.attributes_mask, AVC_DATA_SIZE, buf)
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
