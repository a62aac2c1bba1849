//! Device events.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::ContextData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Communication,
    Environment,
    Equipment,
    Service,
    Processing,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSubCategory {
    Pon,
    Olt,
    Onu,
    Nni,
}

/// Event as handed to an [`EventManager`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub object_type: &'static str,
    pub event_name: &'static str,
    pub category: EventCategory,
    pub sub_category: EventSubCategory,
    /// Seconds since the Unix epoch when the condition was detected.
    pub raised_ts: u64,
    pub raised: bool,
    pub context: Map<String, Value>,
}

/// Sink for device events.
pub trait EventManager {
    fn send_event(&self, event: EventRecord);
}

/// A device event with fixed identity and per-instance context.
pub trait DeviceEvent: ContextData {
    fn object_type(&self) -> &'static str;
    fn event_name(&self) -> &'static str;
    fn category(&self) -> EventCategory;
    fn sub_category(&self) -> EventSubCategory;
    fn raised_ts(&self) -> u64;

    fn record(&self, raised: bool) -> EventRecord {
        EventRecord {
            object_type: self.object_type(),
            event_name: self.event_name(),
            category: self.category(),
            sub_category: self.sub_category(),
            raised_ts: self.raised_ts(),
            raised,
            context: self.context_data(),
        }
    }

    fn send(&self, manager: &dyn EventManager, raised: bool) {
        tracing::debug!("Sending event {} (raised={})", self.event_name(), raised);
        manager.send_event(self.record(raised));
    }
}

/// Loss of signal from an ONU, reported by the OLT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnuSignalFailEvent {
    pub onu_id: u32,
    pub intf_id: u32,
    pub inverse_bit_error_rate: u32,
    pub serial_number: String,
    pub raised_ts: u64,
}

impl OnuSignalFailEvent {
    pub fn new(
        onu_id: u32,
        intf_id: u32,
        inverse_bit_error_rate: u32,
        serial_number: impl Into<String>,
        raised_ts: u64,
    ) -> Self {
        Self {
            onu_id,
            intf_id,
            inverse_bit_error_rate,
            serial_number: serial_number.into(),
            raised_ts,
        }
    }
}

impl ContextData for OnuSignalFailEvent {
    fn context_data(&self) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert("onu-id".into(), json!(self.onu_id));
        context.insert("onu-intf-id".into(), json!(self.intf_id));
        context.insert(
            "inverse-bit-error-rate".into(),
            json!(self.inverse_bit_error_rate),
        );
        context.insert("onu-serial-number".into(), json!(self.serial_number));
        context
    }
}

impl DeviceEvent for OnuSignalFailEvent {
    fn object_type(&self) -> &'static str {
        "onu SIGNAL FAIL"
    }

    fn event_name(&self) -> &'static str {
        "ONU_SIGNAL_FAIL"
    }

    fn category(&self) -> EventCategory {
        EventCategory::Communication
    }

    fn sub_category(&self) -> EventSubCategory {
        EventSubCategory::Onu
    }

    fn raised_ts(&self) -> u64 {
        self.raised_ts
    }
}
