//! Resource management services
//!
//! These are the only services whose effect the gate applies itself: the
//! owner field and the held-resource stack are updated in the same critical
//! section as the checks, so no other caller can observe a resource that
//! passed the checks but is not yet owned.
//!
//! GetResource only returns `Ok` when the resource was actually pushed.
//! Without extended checking nothing stops a task from taking the same
//! resource again; once its held-resource stack is full the call fails with
//! `AccessDenied` and leaves the stack and the owner untouched.

use super::{ServiceGate, ServiceId, conclude};
use crate::checks::Validation;
use crate::debug_print;
use crate::descriptor::ObjectId;
use crate::error::{ErrorCode, StatusResult};
use crate::hook::ErrorHook;
use crate::resource::ResourceId;
use crate::scheduler::ResourceLedger;
use crate::sync::{CriticalSection, KernelLock};

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// GetResource: identifier, then the priority ceiling protocol. On
    /// success the running task becomes the owner and the resource is pushed
    /// on its held-resource stack.
    pub fn get_resource<K: ResourceLedger + ?Sized>(
        &mut self,
        kernel: &mut K,
        resource: ResourceId,
    ) -> StatusResult {
        let service = ServiceId::GetResource;
        let config = *self.reporter.config();
        let section = CriticalSection::enter(&self.lock, service.lock_policy(), &config);

        self.reporter.record_service(service);
        self.reporter.record_identifier(ObjectId::Resource(resource));
        let mut status = Validation::new(&config, &*kernel)
            .resource_id(resource)
            .acquire(resource)
            .finish();
        if status.is_ok() && config.resources() {
            status = take(kernel, resource);
        }
        conclude(
            &mut self.reporter,
            &mut self.stats,
            service,
            status,
            section.is_locked(),
        );

        drop(section);
        status.into_result()
    }

    /// ReleaseResource: identifier, caller priority, then release order. On
    /// success the resource is popped off the held-resource stack and freed.
    pub fn release_resource<K: ResourceLedger + ?Sized>(
        &mut self,
        kernel: &mut K,
        resource: ResourceId,
    ) -> StatusResult {
        let service = ServiceId::ReleaseResource;
        let config = *self.reporter.config();
        let section = CriticalSection::enter(&self.lock, service.lock_policy(), &config);

        self.reporter.record_service(service);
        self.reporter.record_identifier(ObjectId::Resource(resource));
        let status = Validation::new(&config, &*kernel)
            .resource_id(resource)
            .release_priority(resource)
            .release_order(resource)
            .finish();
        if status.is_ok() && config.resources() {
            give_back(kernel, resource);
        }
        conclude(
            &mut self.reporter,
            &mut self.stats,
            service,
            status,
            section.is_locked(),
        );

        drop(section);
        status.into_result()
    }
}

/// Make the running task the owner of `resource`.
///
/// Outside task level and for [`ResourceId::NONE`] there is no stack to
/// push on and the call stays `Ok`. A running task the view cannot find, or
/// a full held-resource stack, is `AccessDenied`.
fn take<K: ResourceLedger + ?Sized>(kernel: &mut K, resource: ResourceId) -> ErrorCode {
    let Some(task) = kernel.running_task() else {
        return ErrorCode::Ok;
    };
    if kernel.resource(resource).is_none() {
        return ErrorCode::Ok;
    }
    let Some(descriptor) = kernel.task_mut(task) else {
        debug_print!(ERROR, "running task {} is not in the task table", task.as_u32());
        return ErrorCode::AccessDenied;
    };
    if descriptor.resources.push(resource).is_err() {
        debug_print!(
            ERROR,
            "task {} holds too many resources, {} not taken",
            task.as_u32(),
            resource.as_i32()
        );
        return ErrorCode::AccessDenied;
    }
    if let Some(descriptor) = kernel.resource_mut(resource) {
        descriptor.owner = Some(task);
    }
    ErrorCode::Ok
}

fn give_back<K: ResourceLedger + ?Sized>(kernel: &mut K, resource: ResourceId) {
    let Some(task) = kernel.running_task() else {
        return;
    };
    if kernel.resource(resource).is_none() {
        return;
    }
    let Some(descriptor) = kernel.task_mut(task) else {
        return;
    };
    if descriptor.top_resource() != Some(resource) {
        debug_print!(
            WARNING,
            "resource {} is not the last one task {} took, left in place",
            resource.as_i32(),
            task.as_u32()
        );
        return;
    }
    descriptor.resources.pop();
    if let Some(descriptor) = kernel.resource_mut(resource) {
        descriptor.owner = None;
    }
}
