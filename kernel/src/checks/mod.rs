//! Service Argument and State Checks
//!
//! Every check follows the OSEK "first detected error wins" rule: it only
//! sets the status when no error has been recorded yet, so the order in
//! which a service runs its checks decides which code the caller sees.
//!
//! # Check Families
//!
//! - **Identifiers**: task, resource and alarm identifier ranges
//! - **Context**: task-level call, extended task class, suspended task
//! - **Resources**: priority ceiling, owner and release order, resources
//!   still held when a task ends
//!
//! All checks are pure reads of the scheduler tables. Each is a no-op
//! without extended checking.
//!
//! [`Validation`] chains the checks of one service call:
//!
//! ```ignore
//! let status = Validation::new(&config, &kernel)
//!     .task_call_level()
//!     .task_id(task)
//!     .still_holding()
//!     .finish();
//! ```

#![deny(missing_docs)]

pub mod context;
pub mod identifiers;
pub mod resources;

pub use context::*;
pub use identifiers::*;
pub use resources::*;

use crate::alarm::AlarmId;
use crate::config::Config;
use crate::error::ErrorCode;
use crate::resource::ResourceId;
use crate::scheduler::KernelView;
use crate::task::TaskId;

/// Ordered checks of one service call
#[must_use = "call `finish` to obtain the status"]
pub struct Validation<'a, K: KernelView + ?Sized> {
    config: &'a Config,
    kernel: &'a K,
    result: ErrorCode,
}

impl<'a, K: KernelView + ?Sized> Validation<'a, K> {
    /// Start with no error detected
    pub fn new(config: &'a Config, kernel: &'a K) -> Self {
        Self {
            config,
            kernel,
            result: ErrorCode::Ok,
        }
    }

    /// See [`check_task_id`]
    pub fn task_id(mut self, task: TaskId) -> Self {
        check_task_id(self.config, self.kernel, task, &mut self.result);
        self
    }

    /// See [`check_resource_id`]
    pub fn resource_id(mut self, resource: ResourceId) -> Self {
        check_resource_id(self.config, self.kernel, resource, &mut self.result);
        self
    }

    /// See [`check_alarm_id`]
    pub fn alarm_id(mut self, alarm: AlarmId) -> Self {
        check_alarm_id(self.config, self.kernel, alarm, &mut self.result);
        self
    }

    /// See [`check_task_call_level`]
    pub fn task_call_level(mut self) -> Self {
        check_task_call_level(self.config, self.kernel, &mut self.result);
        self
    }

    /// See [`check_extended_task`]
    pub fn extended_task(mut self, task: TaskId) -> Self {
        check_extended_task(self.config, self.kernel, task, &mut self.result);
        self
    }

    /// See [`check_running_extended`]
    pub fn running_extended(mut self) -> Self {
        check_running_extended(self.config, self.kernel, &mut self.result);
        self
    }

    /// See [`check_not_suspended`]
    pub fn not_suspended(mut self, task: TaskId) -> Self {
        check_not_suspended(self.config, self.kernel, task, &mut self.result);
        self
    }

    /// See [`check_acquire`]
    pub fn acquire(mut self, resource: ResourceId) -> Self {
        check_acquire(self.config, self.kernel, resource, &mut self.result);
        self
    }

    /// See [`check_release_priority`]
    pub fn release_priority(mut self, resource: ResourceId) -> Self {
        check_release_priority(self.config, self.kernel, resource, &mut self.result);
        self
    }

    /// See [`check_release_order`]
    pub fn release_order(mut self, resource: ResourceId) -> Self {
        check_release_order(self.config, self.kernel, resource, &mut self.result);
        self
    }

    /// See [`check_still_holding`]
    pub fn still_holding(mut self) -> Self {
        check_still_holding(self.config, self.kernel, &mut self.result);
        self
    }

    /// Status after the checks run so far
    pub fn finish(self) -> ErrorCode {
        self.result
    }
}
