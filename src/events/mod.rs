//! Alarm and event contracts for the adapter layer.
//!
//! Concrete alarms and events are plain records. Each one knows its fixed
//! identity (object type, name, classification) and builds a context map
//! from its own fields; publishing is left to an [`AlarmManager`] or
//! [`EventManager`] supplied by the caller.
//!
//! # Example
//!
//! ```
//! use omci_codec::events::{AlarmRecord, AlarmManager, DeviceAlarm, OnuWindowDriftAlarm};
//!
//! struct Log;
//!
//! impl AlarmManager for Log {
//!     fn send_alarm(&self, alarm: AlarmRecord) {
//!         assert_eq!(alarm.alarm_name, "ONU_WINDOW_DRIFT");
//!         assert_eq!(alarm.context["drift"], 12);
//!     }
//! }
//!
//! let alarm = OnuWindowDriftAlarm::new(1, 0, 12, 40, "BRCM12345678");
//! alarm.raise(&Log);
//! ```

mod alarm;
mod event;

pub use alarm::{
    AlarmCategory, AlarmManager, AlarmRecord, AlarmSeverity, AlarmType, DeviceAlarm,
    OnuWindowDriftAlarm,
};
pub use event::{
    DeviceEvent, EventCategory, EventManager, EventRecord, EventSubCategory, OnuSignalFailEvent,
};

use serde_json::{Map, Value};

/// Key/value context attached to a published alarm or event.
pub trait ContextData {
    fn context_data(&self) -> Map<String, Value>;
}
