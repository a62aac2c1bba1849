//! Device alarms.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::ContextData;

/// What part of the system raised the alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmCategory {
    Pon,
    Olt,
    Onu,
    Nni,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmType {
    Communication,
    Environment,
    Equipment,
    Service,
    Processing,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmSeverity {
    Indeterminate,
    Warning,
    Minor,
    Major,
    Critical,
}

/// Alarm as handed to an [`AlarmManager`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmRecord {
    pub object_type: &'static str,
    pub alarm_name: &'static str,
    pub category: AlarmCategory,
    pub alarm_type: AlarmType,
    pub severity: AlarmSeverity,
    /// `true` when raised, `false` when cleared.
    pub raised: bool,
    pub context: Map<String, Value>,
}

/// Sink for alarms, typically the adapter's alarm publisher.
pub trait AlarmManager {
    fn send_alarm(&self, alarm: AlarmRecord);
}

/// An alarm with fixed identity and per-instance context.
pub trait DeviceAlarm: ContextData {
    fn object_type(&self) -> &'static str;
    fn alarm_name(&self) -> &'static str;
    fn category(&self) -> AlarmCategory;
    fn alarm_type(&self) -> AlarmType;
    fn severity(&self) -> AlarmSeverity;

    fn record(&self, raised: bool) -> AlarmRecord {
        AlarmRecord {
            object_type: self.object_type(),
            alarm_name: self.alarm_name(),
            category: self.category(),
            alarm_type: self.alarm_type(),
            severity: self.severity(),
            raised,
            context: self.context_data(),
        }
    }

    fn raise(&self, manager: &dyn AlarmManager) {
        tracing::debug!("Raising alarm {}", self.alarm_name());
        manager.send_alarm(self.record(true));
    }

    fn clear(&self, manager: &dyn AlarmManager) {
        tracing::debug!("Clearing alarm {}", self.alarm_name());
        manager.send_alarm(self.record(false));
    }
}

/// ONU ranging window drift reported by the OLT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnuWindowDriftAlarm {
    pub onu_id: u32,
    pub intf_id: u32,
    pub drift: u32,
    pub new_eqd: u32,
    pub serial_number: String,
}

impl OnuWindowDriftAlarm {
    pub fn new(
        onu_id: u32,
        intf_id: u32,
        drift: u32,
        new_eqd: u32,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            onu_id,
            intf_id,
            drift,
            new_eqd,
            serial_number: serial_number.into(),
        }
    }
}

impl ContextData for OnuWindowDriftAlarm {
    fn context_data(&self) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert("onu-id".into(), json!(self.onu_id));
        context.insert("onu-intf-id".into(), json!(self.intf_id));
        context.insert("drift".into(), json!(self.drift));
        context.insert("new-eqd".into(), json!(self.new_eqd));
        context.insert("onu-serial-number".into(), json!(self.serial_number));
        context
    }
}

impl DeviceAlarm for OnuWindowDriftAlarm {
    fn object_type(&self) -> &'static str {
        "onu WINDOW DRIFT"
    }

    fn alarm_name(&self) -> &'static str {
        "ONU_WINDOW_DRIFT"
    }

    fn category(&self) -> AlarmCategory {
        AlarmCategory::Onu
    }

    fn alarm_type(&self) -> AlarmType {
        AlarmType::Communication
    }

    fn severity(&self) -> AlarmSeverity {
        AlarmSeverity::Major
    }
}
