//! Kernel Debug Macros
//!
//! This module provides the kernel's debug output macro and the sink it
//! writes to. The OSEK error layer has no console of its own, so the
//! integrating kernel registers a sink function (UART writer, RTT channel,
//! host `println!` in tests) with [`set_debug_sink`].
//!
//! Output is compiled in only with `debug_assertions`. With no sink
//! registered, or a message above the configured level, the macro costs a
//! single critical-section read.

#![deny(missing_docs)]

use core::cell::Cell;
use core::fmt;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Debug output levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DebugLevel {
    /// Error messages - always shown
    Error = 0,
    /// Warning messages
    Warning = 1,
    /// Information messages
    Info = 2,
    /// Debug messages
    Debug = 3,
    /// Trace messages - most verbose
    Trace = 4,
}

impl DebugLevel {
    /// Short tag printed in front of each message
    pub const fn tag(self) -> &'static str {
        match self {
            DebugLevel::Error => "ERROR",
            DebugLevel::Warning => "WARN",
            DebugLevel::Info => "INFO",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Trace => "TRACE",
        }
    }
}

/// Function receiving every debug message that passes the level filter
pub type DebugSink = fn(DebugLevel, fmt::Arguments<'_>);

#[derive(Clone, Copy)]
struct SinkSlot {
    sink: Option<DebugSink>,
    max_level: DebugLevel,
}

static DEBUG_SINK: Mutex<CriticalSectionRawMutex, Cell<SinkSlot>> = Mutex::new(Cell::new(SinkSlot {
    sink: None,
    max_level: DebugLevel::Info,
}));

/// Register the function that receives debug output
pub fn set_debug_sink(sink: DebugSink) {
    DEBUG_SINK.lock(|slot| {
        let mut current = slot.get();
        current.sink = Some(sink);
        slot.set(current);
    });
}

/// Remove the registered debug sink
pub fn clear_debug_sink() {
    DEBUG_SINK.lock(|slot| {
        let mut current = slot.get();
        current.sink = None;
        slot.set(current);
    });
}

/// Set the most verbose level that is still forwarded to the sink
pub fn set_debug_level(level: DebugLevel) {
    DEBUG_SINK.lock(|slot| {
        let mut current = slot.get();
        current.max_level = level;
        slot.set(current);
    });
}

/// Forward one message to the sink. Used by [`debug_print!`](crate::debug_print).
#[doc(hidden)]
pub fn emit(level: DebugLevel, args: fmt::Arguments<'_>) {
    if !cfg!(debug_assertions) {
        return;
    }

    let slot = DEBUG_SINK.lock(Cell::get);
    if let Some(sink) = slot.sink {
        if level <= slot.max_level {
            sink(level, args);
        }
    }
}

/// Kernel debug output.
///
/// ```ignore
/// debug_print!(WARNING, "GetResource({}) rejected: {}", id, error);
/// ```
#[macro_export]
macro_rules! debug_print {
    (@emit $level:expr, $($arg:tt)*) => {
        $crate::macros::emit($level, format_args!($($arg)*))
    };
    (ERROR, $($arg:tt)*) => {
        $crate::debug_print!(@emit $crate::macros::DebugLevel::Error, $($arg)*)
    };
    (WARNING, $($arg:tt)*) => {
        $crate::debug_print!(@emit $crate::macros::DebugLevel::Warning, $($arg)*)
    };
    (INFO, $($arg:tt)*) => {
        $crate::debug_print!(@emit $crate::macros::DebugLevel::Info, $($arg)*)
    };
    (DEBUG, $($arg:tt)*) => {
        $crate::debug_print!(@emit $crate::macros::DebugLevel::Debug, $($arg)*)
    };
    (TRACE, $($arg:tt)*) => {
        $crate::debug_print!(@emit $crate::macros::DebugLevel::Trace, $($arg)*)
    };
}
