//! Priority Ceiling Protocol Checks
//!
//! Checks run by GetResource, ReleaseResource and the services that end
//! or suspend the running task. They only read the resource table and the
//! held-resource stack of the running task; acquiring and releasing is the
//! service's own effect once every check has passed.
//!
//! ```text
//!   GetResource(R1)   GetResource(R2)   ReleaseResource(R2)  ReleaseResource(R1)
//!   [R1]              [R1, R2]          [R1]                 []
//!                                  ^ ReleaseResource(R1) here is E_OS_NOFUNC
//! ```

use crate::config::Config;
use crate::error::ErrorCode;
use crate::resource::ResourceId;
use crate::scheduler::KernelView;
use crate::task::Priority;

fn running_priority<K: KernelView + ?Sized>(kernel: &K) -> Option<Priority> {
    kernel.running().map(|task| task.base_priority)
}

/// GetResource: report `AccessDenied` when the resource is already owned
/// or the caller's base priority is above the ceiling
pub fn check_acquire<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    resource: ResourceId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    let Some(descriptor) = kernel.resource(resource) else {
        return;
    };
    let above_ceiling = running_priority(kernel).is_some_and(|p| !descriptor.admits(p));
    if descriptor.is_taken() || above_ceiling {
        *result = ErrorCode::AccessDenied;
    }
}

/// ReleaseResource: report `AccessDenied` when the caller's base priority
/// is above the ceiling, i.e. it could never have acquired the resource
pub fn check_release_priority<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    resource: ResourceId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    let Some(descriptor) = kernel.resource(resource) else {
        return;
    };
    if running_priority(kernel).is_some_and(|p| !descriptor.admits(p)) {
        *result = ErrorCode::AccessDenied;
    }
}

/// ReleaseResource: report `ReleaseOutOfOrder` when the resource is free or
/// is not the last one the caller acquired
pub fn check_release_order<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    resource: ResourceId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    let Some(descriptor) = kernel.resource(resource) else {
        return;
    };
    let on_top = kernel
        .running()
        .and_then(|task| task.top_resource())
        .is_some_and(|top| top == resource);
    if !descriptor.is_taken() || !on_top {
        *result = ErrorCode::ReleaseOutOfOrder;
    }
}

/// TerminateTask, ChainTask, Schedule, WaitEvent: report `ResourceStillHeld`
/// when the running task holds any resource
pub fn check_still_holding<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    result: &mut ErrorCode,
) {
    if !config.extended() || !config.tasks() || result.is_err() {
        return;
    }
    if kernel.running().is_some_and(|task| task.holds_resources()) {
        *result = ErrorCode::ResourceStillHeld;
    }
}
