//! Service Call Descriptor
//!
//! When a checked service fails and the ErrorHook is configured, the hook
//! needs to know which service failed and with which arguments. The kernel
//! keeps a single [`ServiceCallDescriptor`] for this: every service records
//! its identifier and the arguments relevant to it on entry, and the hook
//! reads them back through [`ErrorInfo`].
//!
//! # Layout
//!
//! ```text
//! ServiceCallDescriptor
//! ├── service : ServiceId        which service is being checked
//! ├── id      : ObjectId         task / task-id slot / resource / alarm
//! ├── param   : ServiceParam     state slot / tick / tick slot /
//! │                              alarm base slot / mask / mask slot
//! └── cycle   : Option<Tick>     SetRelAlarm / SetAbsAlarm only
//! ```
//!
//! The descriptor describes the call currently being checked, never a
//! history. It is only mutated inside the service's critical section and
//! is only readable by application code while the hook runs.

#![deny(missing_docs)]

use crate::alarm::{AlarmId, Tick};
use crate::resource::ResourceId;
use crate::syscalls::ServiceId;
use crate::task::{EventMask, TaskId};

/// Address of an output argument supplied by the caller.
///
/// Output slots are recorded so the hook can tell calls apart; the error
/// layer never reads or writes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputRef(usize);

impl OutputRef {
    /// Reference to the caller's slot
    pub fn of<T>(slot: &T) -> Self {
        Self(slot as *const T as usize)
    }

    /// Create from a raw address
    pub const fn from_address(address: usize) -> Self {
        Self(address)
    }

    /// Raw address of the slot
    pub const fn address(self) -> usize {
        self.0
    }
}

/// Object identifier argument of a service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectId {
    /// The service takes no identifier
    #[default]
    None,
    /// ActivateTask, ChainTask, GetTaskState, SetEvent, GetEvent
    Task(TaskId),
    /// GetTaskID
    TaskIdRef(OutputRef),
    /// GetResource, ReleaseResource
    Resource(ResourceId),
    /// Alarm services
    Alarm(AlarmId),
}

/// Secondary argument of a service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceParam {
    /// The service takes no secondary argument
    #[default]
    None,
    /// GetTaskState
    TaskStateRef(OutputRef),
    /// SetRelAlarm increment, SetAbsAlarm start
    Tick(Tick),
    /// GetAlarm
    TickRef(OutputRef),
    /// GetAlarmBase
    AlarmBaseRef(OutputRef),
    /// SetEvent, ClearEvent, WaitEvent
    Mask(EventMask),
    /// GetEvent
    MaskRef(OutputRef),
}

/// The service call currently being checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceCallDescriptor {
    service: Option<ServiceId>,
    id: ObjectId,
    param: ServiceParam,
    cycle: Option<Tick>,
}

impl ServiceCallDescriptor {
    /// Empty descriptor
    pub const fn new() -> Self {
        Self {
            service: None,
            id: ObjectId::None,
            param: ServiceParam::None,
            cycle: None,
        }
    }

    /// Start describing a new call. Arguments of the previous call are dropped.
    pub(crate) fn set_service(&mut self, service: ServiceId) {
        *self = Self {
            service: Some(service),
            ..Self::new()
        };
    }

    pub(crate) fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    pub(crate) fn set_param(&mut self, param: ServiceParam) {
        self.param = param;
    }

    pub(crate) fn set_cycle(&mut self, cycle: Tick) {
        self.cycle = Some(cycle);
    }

    /// Service last recorded
    pub const fn service(&self) -> Option<ServiceId> {
        self.service
    }

    /// Identifier argument last recorded
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Secondary argument last recorded
    pub const fn param(&self) -> ServiceParam {
        self.param
    }

    /// Cycle argument last recorded
    pub const fn cycle(&self) -> Option<Tick> {
        self.cycle
    }
}

/// Read-only view of the descriptor lent to the ErrorHook.
///
/// Each accessor is named after the service and argument it reports and
/// returns `None` when the failing call was another service.
#[derive(Debug, Clone, Copy)]
pub struct ErrorInfo<'a> {
    descriptor: &'a ServiceCallDescriptor,
}

impl<'a> ErrorInfo<'a> {
    pub(crate) const fn new(descriptor: &'a ServiceCallDescriptor) -> Self {
        Self { descriptor }
    }

    /// Identifier of the service that raised the error
    pub const fn service_id(&self) -> Option<ServiceId> {
        self.descriptor.service
    }

    fn is(&self, service: ServiceId) -> bool {
        self.descriptor.service == Some(service)
    }

    fn task(&self, service: ServiceId) -> Option<TaskId> {
        match self.descriptor.id {
            ObjectId::Task(id) if self.is(service) => Some(id),
            _ => None,
        }
    }

    fn resource(&self, service: ServiceId) -> Option<ResourceId> {
        match self.descriptor.id {
            ObjectId::Resource(id) if self.is(service) => Some(id),
            _ => None,
        }
    }

    fn alarm(&self, service: ServiceId) -> Option<AlarmId> {
        match self.descriptor.id {
            ObjectId::Alarm(id) if self.is(service) => Some(id),
            _ => None,
        }
    }

    fn mask(&self, service: ServiceId) -> Option<EventMask> {
        match self.descriptor.param {
            ServiceParam::Mask(mask) if self.is(service) => Some(mask),
            _ => None,
        }
    }

    fn tick(&self, service: ServiceId) -> Option<Tick> {
        match self.descriptor.param {
            ServiceParam::Tick(tick) if self.is(service) => Some(tick),
            _ => None,
        }
    }

    fn cycle(&self, service: ServiceId) -> Option<Tick> {
        self.descriptor.cycle.filter(|_| self.is(service))
    }

    /// ActivateTask: task that caused the error
    pub fn activate_task_task_id(&self) -> Option<TaskId> {
        self.task(ServiceId::ActivateTask)
    }

    /// ChainTask: task that caused the error
    pub fn chain_task_task_id(&self) -> Option<TaskId> {
        self.task(ServiceId::ChainTask)
    }

    /// GetTaskID: output slot passed by the caller
    pub fn get_task_id_task_id(&self) -> Option<OutputRef> {
        match self.descriptor.id {
            ObjectId::TaskIdRef(slot) if self.is(ServiceId::GetTaskId) => Some(slot),
            _ => None,
        }
    }

    /// GetTaskState: task that caused the error
    pub fn get_task_state_task_id(&self) -> Option<TaskId> {
        self.task(ServiceId::GetTaskState)
    }

    /// GetTaskState: state output slot passed by the caller
    pub fn get_task_state_state(&self) -> Option<OutputRef> {
        match self.descriptor.param {
            ServiceParam::TaskStateRef(slot) if self.is(ServiceId::GetTaskState) => Some(slot),
            _ => None,
        }
    }

    /// GetResource: resource that caused the error
    pub fn get_resource_res_id(&self) -> Option<ResourceId> {
        self.resource(ServiceId::GetResource)
    }

    /// ReleaseResource: resource that caused the error
    pub fn release_resource_res_id(&self) -> Option<ResourceId> {
        self.resource(ServiceId::ReleaseResource)
    }

    /// SetEvent: target task
    pub fn set_event_task_id(&self) -> Option<TaskId> {
        self.task(ServiceId::SetEvent)
    }

    /// SetEvent: events to set
    pub fn set_event_mask(&self) -> Option<EventMask> {
        self.mask(ServiceId::SetEvent)
    }

    /// ClearEvent: events to clear
    pub fn clear_event_mask(&self) -> Option<EventMask> {
        self.mask(ServiceId::ClearEvent)
    }

    /// GetEvent: target task
    pub fn get_event_task_id(&self) -> Option<TaskId> {
        self.task(ServiceId::GetEvent)
    }

    /// GetEvent: event mask output slot passed by the caller
    pub fn get_event_event(&self) -> Option<OutputRef> {
        match self.descriptor.param {
            ServiceParam::MaskRef(slot) if self.is(ServiceId::GetEvent) => Some(slot),
            _ => None,
        }
    }

    /// WaitEvent: events waited for
    pub fn wait_event_mask(&self) -> Option<EventMask> {
        self.mask(ServiceId::WaitEvent)
    }

    /// GetAlarmBase: alarm that caused the error
    pub fn get_alarm_base_alarm_id(&self) -> Option<AlarmId> {
        self.alarm(ServiceId::GetAlarmBase)
    }

    /// GetAlarmBase: alarm base output slot passed by the caller
    pub fn get_alarm_base_info(&self) -> Option<OutputRef> {
        match self.descriptor.param {
            ServiceParam::AlarmBaseRef(slot) if self.is(ServiceId::GetAlarmBase) => Some(slot),
            _ => None,
        }
    }

    /// GetAlarm: alarm that caused the error
    pub fn get_alarm_alarm_id(&self) -> Option<AlarmId> {
        self.alarm(ServiceId::GetAlarm)
    }

    /// GetAlarm: tick output slot passed by the caller
    pub fn get_alarm_tick(&self) -> Option<OutputRef> {
        match self.descriptor.param {
            ServiceParam::TickRef(slot) if self.is(ServiceId::GetAlarm) => Some(slot),
            _ => None,
        }
    }

    /// SetRelAlarm: alarm that caused the error
    pub fn set_rel_alarm_alarm_id(&self) -> Option<AlarmId> {
        self.alarm(ServiceId::SetRelAlarm)
    }

    /// SetRelAlarm: relative expiry
    pub fn set_rel_alarm_increment(&self) -> Option<Tick> {
        self.tick(ServiceId::SetRelAlarm)
    }

    /// SetRelAlarm: cycle
    pub fn set_rel_alarm_cycle(&self) -> Option<Tick> {
        self.cycle(ServiceId::SetRelAlarm)
    }

    /// SetAbsAlarm: alarm that caused the error
    pub fn set_abs_alarm_alarm_id(&self) -> Option<AlarmId> {
        self.alarm(ServiceId::SetAbsAlarm)
    }

    /// SetAbsAlarm: absolute expiry
    pub fn set_abs_alarm_start(&self) -> Option<Tick> {
        self.tick(ServiceId::SetAbsAlarm)
    }

    /// SetAbsAlarm: cycle
    pub fn set_abs_alarm_cycle(&self) -> Option<Tick> {
        self.cycle(ServiceId::SetAbsAlarm)
    }

    /// CancelAlarm: alarm that caused the error
    pub fn cancel_alarm_alarm_id(&self) -> Option<AlarmId> {
        self.alarm(ServiceId::CancelAlarm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_service_drops_previous_arguments() {
        let mut descriptor = ServiceCallDescriptor::new();
        descriptor.set_service(ServiceId::SetRelAlarm);
        descriptor.set_id(ObjectId::Alarm(AlarmId::new(2)));
        descriptor.set_param(ServiceParam::Tick(10));
        descriptor.set_cycle(100);

        descriptor.set_service(ServiceId::TerminateTask);
        assert_eq!(descriptor.service(), Some(ServiceId::TerminateTask));
        assert_eq!(descriptor.id(), ObjectId::None);
        assert_eq!(descriptor.param(), ServiceParam::None);
        assert_eq!(descriptor.cycle(), None);
    }

    #[test]
    fn accessors_answer_only_for_the_recorded_service() {
        let mut descriptor = ServiceCallDescriptor::new();
        descriptor.set_service(ServiceId::SetEvent);
        descriptor.set_id(ObjectId::Task(TaskId::new(3)));
        descriptor.set_param(ServiceParam::Mask(EventMask::new(0b101)));

        let info = ErrorInfo::new(&descriptor);
        assert_eq!(info.service_id(), Some(ServiceId::SetEvent));
        assert_eq!(info.set_event_task_id(), Some(TaskId::new(3)));
        assert_eq!(info.set_event_mask(), Some(EventMask::new(0b101)));
        assert_eq!(info.activate_task_task_id(), None);
        assert_eq!(info.get_event_task_id(), None);
        assert_eq!(info.clear_event_mask(), None);
    }

    #[test]
    fn alarm_accessors_report_both_ticks() {
        let mut descriptor = ServiceCallDescriptor::new();
        descriptor.set_service(ServiceId::SetAbsAlarm);
        descriptor.set_id(ObjectId::Alarm(AlarmId::new(1)));
        descriptor.set_param(ServiceParam::Tick(500));
        descriptor.set_cycle(50);

        let info = ErrorInfo::new(&descriptor);
        assert_eq!(info.set_abs_alarm_alarm_id(), Some(AlarmId::new(1)));
        assert_eq!(info.set_abs_alarm_start(), Some(500));
        assert_eq!(info.set_abs_alarm_cycle(), Some(50));
        assert_eq!(info.set_rel_alarm_cycle(), None);
        assert_eq!(info.set_rel_alarm_increment(), None);
    }

    #[test]
    fn output_slots_are_identified_by_address() {
        let slot = 0u32;
        let a = OutputRef::of(&slot);
        assert_eq!(a, OutputRef::from_address(a.address()));
        assert_ne!(a.address(), 0);
    }
}
