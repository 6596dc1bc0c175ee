//! Task Objects
//!
//! This module defines the task-side objects the error layer reads from the
//! scheduler's static and dynamic task tables:
//!
//! - Task identifiers and base priorities
//! - Task class (basic or extended)
//! - Task execution state
//! - The held-resource stack of each task
//!
//! # Task States
//!
//! ```text
//! Suspended -> Ready -> Running -> Waiting -> Ready
//!     ^                    |
//!     +--------------------+
//! ```
//!
//! Only extended tasks may enter `Waiting`; this is what the event
//! services check before touching a task's events.

#![deny(missing_docs)]

use heapless::Vec;
use static_assertions::const_assert;

use crate::resource::{MAX_RESOURCES, ResourceId};

/// Maximum number of tasks in a static configuration
pub const MAX_TASKS: usize = 64;

/// Maximum depth of the held-resource stack of one task.
///
/// A resource has at most one owner, so a task can hold every resource of
/// the configuration at once but never more.
pub const MAX_HELD_RESOURCES: usize = MAX_RESOURCES;

const_assert!(MAX_TASKS <= u16::MAX as usize);
const_assert!(MAX_HELD_RESOURCES >= MAX_RESOURCES);

/// Task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

impl TaskId {
    /// Create a new task ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Table index of this task
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Task priority. Larger values preempt smaller ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(u8);

impl Priority {
    /// Idle priority
    pub const LOWEST: Priority = Priority(0);

    /// Create a new priority
    pub const fn new(level: u8) -> Self {
        Self(level)
    }
}

/// OSEK task class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskClass {
    /// Basic task: runs to completion, cannot wait on events
    #[default]
    Basic,
    /// Extended task: may wait on events
    Extended,
}

/// Task execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Not activated
    #[default]
    Suspended,
    /// Activated and waiting for the processor
    Ready,
    /// Currently executing
    Running,
    /// Blocked in WaitEvent
    Waiting,
}

/// What the processor is currently executing, as seen by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    /// Before StartOS
    #[default]
    Init,
    /// Task level
    Task,
    /// Category 2 interrupt service routine
    Isr,
    /// Inside a hook routine (ErrorHook, PreTaskHook, ...)
    Hook,
    /// ShutdownOS in progress
    Shutdown,
}

/// Bit set of OSEK events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(u32);

impl EventMask {
    /// No event
    pub const EMPTY: EventMask = EventMask(0);

    /// Create a mask from raw bits
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Stack of resources held by one task, last acquired on top
pub type HeldResources = Vec<ResourceId, MAX_HELD_RESOURCES>;

/// Task descriptor as exposed by the task table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Static base priority
    pub base_priority: Priority,
    /// Basic or extended
    pub class: TaskClass,
    /// Current state
    pub state: TaskState,
    /// Resources currently held, top of stack last
    pub resources: HeldResources,
}

impl TaskDescriptor {
    /// Create a suspended task holding no resource
    pub const fn new(base_priority: Priority, class: TaskClass) -> Self {
        Self {
            base_priority,
            class,
            state: TaskState::Suspended,
            resources: Vec::new(),
        }
    }

    /// Same descriptor in another state
    #[must_use]
    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Whether this is an extended task
    pub fn is_extended(&self) -> bool {
        self.class == TaskClass::Extended
    }

    /// Last acquired resource, if any
    pub fn top_resource(&self) -> Option<ResourceId> {
        self.resources.last().copied()
    }

    /// Whether the task holds at least one resource
    pub fn holds_resources(&self) -> bool {
        !self.resources.is_empty()
    }
}
