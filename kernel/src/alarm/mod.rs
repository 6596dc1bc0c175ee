//! Alarm Objects
//!
//! Only what the error layer needs to identify an alarm service call:
//! alarm identifiers and tick values. Alarm expiry and counters belong to
//! the tick subsystem.

#![deny(missing_docs)]

/// Maximum number of alarms in a static configuration
pub const MAX_ALARMS: usize = 64;

/// Alarm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmId(u32);

impl AlarmId {
    /// Create a new alarm ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Table index of this alarm
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Counter ticks
pub type Tick = u32;

/// Characteristics of the counter driving an alarm (OSEK `AlarmBaseType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmBase {
    /// Largest counter value
    pub max_allowed_value: Tick,
    /// Ticks per counter increment
    pub ticks_per_base: Tick,
    /// Smallest allowed cycle
    pub min_cycle: Tick,
}
