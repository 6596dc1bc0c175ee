//! Checked Service Calls
//!
//! This module provides the error-checking front of every OSEK service that
//! can fail. A [`ServiceGate`] owns the kernel lock, the ErrorHook and the
//! service call descriptor; each of its service methods runs the same
//! sequence:
//!
//! ```text
//! enter critical section (per LockPolicy)
//!   record service id + arguments        (ErrorHook builds only)
//!   run the service's checks in order    (first error wins)
//!   apply resource effect                (Get/ReleaseResource, on success)
//!   call ErrorHook                       (on error, ErrorHook builds only)
//! leave critical section
//! return status
//! ```
//!
//! The semantic effect of the other services (dispatching, events, alarm
//! expiry) belongs to the scheduler: the caller runs it when the gate
//! returns `Ok(())`.
//!
//! # Service Categories
//!
//! - **Task management**: ActivateTask, TerminateTask, ChainTask, Schedule,
//!   GetTaskID, GetTaskState
//! - **Interrupt handling**: Enable/Disable/Resume/SuspendAllInterrupts,
//!   Resume/SuspendOSInterrupts
//! - **Resource management**: GetResource, ReleaseResource
//! - **Event control**: SetEvent, ClearEvent, GetEvent, WaitEvent
//! - **Alarms**: GetAlarmBase, GetAlarm, SetRelAlarm, SetAbsAlarm, CancelAlarm
//! - **Operating system execution**: GetActiveApplicationMode, StartOS,
//!   ShutdownOS

#![deny(missing_docs)]

pub mod alarm;
pub mod event;
pub mod resource;
pub mod system;
pub mod task;

use crate::config::Config;
use crate::debug_print;
use crate::error::{ErrorCode, OsError, StatusResult};
use crate::hook::{ErrorHook, ErrorReporter};
use crate::scheduler::KernelView;
use crate::sync::{CriticalSection, KernelLock, LockPolicy};

/// Number of checked services
pub const SERVICE_COUNT: usize = 26;

/// OSEK service identifiers (`OSServiceId_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServiceId {
    // Task management (1-6)
    /// ActivateTask
    ActivateTask = 1,
    /// TerminateTask
    TerminateTask = 2,
    /// ChainTask
    ChainTask = 3,
    /// Schedule
    Schedule = 4,
    /// GetTaskID
    GetTaskId = 5,
    /// GetTaskState
    GetTaskState = 6,

    // Interrupt handling (7-12)
    /// EnableAllInterrupts
    EnableAllInterrupts = 7,
    /// DisableAllInterrupts
    DisableAllInterrupts = 8,
    /// ResumeAllInterrupts
    ResumeAllInterrupts = 9,
    /// SuspendAllInterrupts
    SuspendAllInterrupts = 10,
    /// ResumeOSInterrupts
    ResumeOsInterrupts = 11,
    /// SuspendOSInterrupts
    SuspendOsInterrupts = 12,

    // Resource management (13-14)
    /// GetResource
    GetResource = 13,
    /// ReleaseResource
    ReleaseResource = 14,

    // Event control (15-18)
    /// SetEvent
    SetEvent = 15,
    /// ClearEvent
    ClearEvent = 16,
    /// GetEvent
    GetEvent = 17,
    /// WaitEvent
    WaitEvent = 18,

    // Alarms (19-23)
    /// GetAlarmBase
    GetAlarmBase = 19,
    /// GetAlarm
    GetAlarm = 20,
    /// SetRelAlarm
    SetRelAlarm = 21,
    /// SetAbsAlarm
    SetAbsAlarm = 22,
    /// CancelAlarm
    CancelAlarm = 23,

    // Operating system execution (24-26)
    /// GetActiveApplicationMode
    GetActiveApplicationMode = 24,
    /// StartOS
    StartOs = 25,
    /// ShutdownOS
    ShutdownOs = 26,
}

impl ServiceId {
    /// Every service, in identifier order
    pub const ALL: [ServiceId; SERVICE_COUNT] = [
        ServiceId::ActivateTask,
        ServiceId::TerminateTask,
        ServiceId::ChainTask,
        ServiceId::Schedule,
        ServiceId::GetTaskId,
        ServiceId::GetTaskState,
        ServiceId::EnableAllInterrupts,
        ServiceId::DisableAllInterrupts,
        ServiceId::ResumeAllInterrupts,
        ServiceId::SuspendAllInterrupts,
        ServiceId::ResumeOsInterrupts,
        ServiceId::SuspendOsInterrupts,
        ServiceId::GetResource,
        ServiceId::ReleaseResource,
        ServiceId::SetEvent,
        ServiceId::ClearEvent,
        ServiceId::GetEvent,
        ServiceId::WaitEvent,
        ServiceId::GetAlarmBase,
        ServiceId::GetAlarm,
        ServiceId::SetRelAlarm,
        ServiceId::SetAbsAlarm,
        ServiceId::CancelAlarm,
        ServiceId::GetActiveApplicationMode,
        ServiceId::StartOs,
        ServiceId::ShutdownOs,
    ];

    /// Raw `OSServiceId_*` value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// OSEK name of the service
    pub const fn name(self) -> &'static str {
        match self {
            ServiceId::ActivateTask => "ActivateTask",
            ServiceId::TerminateTask => "TerminateTask",
            ServiceId::ChainTask => "ChainTask",
            ServiceId::Schedule => "Schedule",
            ServiceId::GetTaskId => "GetTaskID",
            ServiceId::GetTaskState => "GetTaskState",
            ServiceId::EnableAllInterrupts => "EnableAllInterrupts",
            ServiceId::DisableAllInterrupts => "DisableAllInterrupts",
            ServiceId::ResumeAllInterrupts => "ResumeAllInterrupts",
            ServiceId::SuspendAllInterrupts => "SuspendAllInterrupts",
            ServiceId::ResumeOsInterrupts => "ResumeOSInterrupts",
            ServiceId::SuspendOsInterrupts => "SuspendOSInterrupts",
            ServiceId::GetResource => "GetResource",
            ServiceId::ReleaseResource => "ReleaseResource",
            ServiceId::SetEvent => "SetEvent",
            ServiceId::ClearEvent => "ClearEvent",
            ServiceId::GetEvent => "GetEvent",
            ServiceId::WaitEvent => "WaitEvent",
            ServiceId::GetAlarmBase => "GetAlarmBase",
            ServiceId::GetAlarm => "GetAlarm",
            ServiceId::SetRelAlarm => "SetRelAlarm",
            ServiceId::SetAbsAlarm => "SetAbsAlarm",
            ServiceId::CancelAlarm => "CancelAlarm",
            ServiceId::GetActiveApplicationMode => "GetActiveApplicationMode",
            ServiceId::StartOs => "StartOS",
            ServiceId::ShutdownOs => "ShutdownOS",
        }
    }

    /// Condition under which the service takes the kernel lock
    pub const fn lock_policy(self) -> LockPolicy {
        match self {
            ServiceId::ActivateTask
            | ServiceId::TerminateTask
            | ServiceId::ChainTask
            | ServiceId::Schedule
            | ServiceId::GetTaskState
            | ServiceId::SetEvent
            | ServiceId::ClearEvent
            | ServiceId::GetEvent
            | ServiceId::WaitEvent => LockPolicy::WhenHookOrTasks,
            ServiceId::GetResource | ServiceId::ReleaseResource => {
                LockPolicy::WhenHookOrResources
            }
            ServiceId::SetRelAlarm | ServiceId::SetAbsAlarm | ServiceId::CancelAlarm => {
                LockPolicy::WhenHookOrAlarms
            }
            ServiceId::GetTaskId
            | ServiceId::EnableAllInterrupts
            | ServiceId::DisableAllInterrupts
            | ServiceId::ResumeAllInterrupts
            | ServiceId::SuspendAllInterrupts
            | ServiceId::ResumeOsInterrupts
            | ServiceId::SuspendOsInterrupts
            | ServiceId::GetAlarmBase
            | ServiceId::GetAlarm
            | ServiceId::GetActiveApplicationMode
            | ServiceId::StartOs
            | ServiceId::ShutdownOs => LockPolicy::WhenHook,
        }
    }
}

impl TryFrom<u8> for ServiceId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let index = usize::from(value).checked_sub(1).ok_or(value)?;
        ServiceId::ALL.get(index).copied().ok_or(value)
    }
}

/// Service call statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ErrorStats {
    /// Service calls checked
    pub service_calls: u64,
    /// Service calls that ran inside a critical section
    pub locked_calls: u64,
    /// Service calls that returned an error
    pub errors_reported: u64,
    /// Times the ErrorHook was called
    pub hook_invocations: u64,
    by_code: [u64; 8],
}

impl ErrorStats {
    /// Number of calls that returned `error`
    pub fn errors_of(&self, error: OsError) -> u64 {
        self.by_code
            .get(usize::from(error.as_u8()))
            .copied()
            .unwrap_or(0)
    }

    fn record(&mut self, error: OsError) {
        self.errors_reported += 1;
        if let Some(count) = self.by_code.get_mut(usize::from(error.as_u8())) {
            *count += 1;
        }
    }
}

/// Error-checking front of the kernel services.
///
/// There is one gate per kernel. It is the single owner of the service call
/// descriptor; the descriptor is only written inside a critical section of
/// `lock` and only read by the hook.
pub struct ServiceGate<L: KernelLock, H: ErrorHook> {
    lock: L,
    reporter: ErrorReporter<H>,
    stats: ErrorStats,
}

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// Create a gate for `config`
    pub const fn new(config: Config, lock: L, hook: H) -> Self {
        Self {
            lock,
            reporter: ErrorReporter::new(config, hook),
            stats: ErrorStats {
                service_calls: 0,
                locked_calls: 0,
                errors_reported: 0,
                hook_invocations: 0,
                by_code: [0; 8],
            },
        }
    }

    /// Configuration the gate checks against
    pub const fn config(&self) -> &Config {
        self.reporter.config()
    }

    /// The kernel lock
    pub const fn lock(&self) -> &L {
        &self.lock
    }

    /// The application ErrorHook
    pub fn hook(&self) -> &H {
        self.reporter.hook()
    }

    /// The application ErrorHook, mutably
    pub fn hook_mut(&mut self) -> &mut H {
        self.reporter.hook_mut()
    }

    /// Statistics since creation
    pub const fn stats(&self) -> &ErrorStats {
        &self.stats
    }

    /// Run a service that has no effect of its own: record, check, report.
    fn call<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        service: ServiceId,
        record: impl FnOnce(&mut ErrorReporter<H>),
        checks: impl FnOnce(&Config, &K) -> ErrorCode,
    ) -> StatusResult {
        let config = *self.reporter.config();
        let section = CriticalSection::enter(&self.lock, service.lock_policy(), &config);

        self.reporter.record_service(service);
        record(&mut self.reporter);
        let status = checks(&config, kernel);
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

    /// Run a service that has neither arguments nor checks
    fn call_unchecked(&mut self, service: ServiceId) -> StatusResult {
        let config = *self.reporter.config();
        let section = CriticalSection::enter(&self.lock, service.lock_policy(), &config);

        self.reporter.record_service(service);
        conclude(
            &mut self.reporter,
            &mut self.stats,
            service,
            ErrorCode::Ok,
            section.is_locked(),
        );

        drop(section);
        Ok(())
    }
}

/// Account for a finished check and call the hook on error.
fn conclude<H: ErrorHook>(
    reporter: &mut ErrorReporter<H>,
    stats: &mut ErrorStats,
    service: ServiceId,
    status: ErrorCode,
    locked: bool,
) {
    stats.service_calls += 1;
    if locked {
        stats.locked_calls += 1;
    }
    if let Err(error) = status.into_result() {
        stats.record(error);
        debug_print!(WARNING, "{} failed: {}", service.name(), error);
        if reporter.dispatch_on_error(status) {
            stats.hook_invocations += 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Gate fixtures shared by the service tests

    use core::cell::Cell;

    use super::{ServiceGate, ServiceId};
    use crate::alarm::{AlarmId, Tick};
    use crate::config::Config;
    use crate::descriptor::{ErrorInfo, OutputRef};
    use crate::error::OsError;
    use crate::hook::ErrorHook;
    use crate::resource::{ResourceDescriptor, ResourceId};
    use crate::scheduler::KernelTables;
    use crate::sync::KernelLock;
    use crate::task::{EventMask, Priority, TaskClass, TaskDescriptor, TaskId, TaskState};

    /// Lock that panics on re-entry and counts acquisitions
    #[derive(Debug, Default)]
    pub struct CountingLock {
        depth: Cell<u32>,
        acquisitions: Cell<u32>,
    }

    impl CountingLock {
        pub fn acquisitions(&self) -> u32 {
            self.acquisitions.get()
        }
    }

    impl KernelLock for CountingLock {
        fn acquire(&self) {
            assert_eq!(self.depth.get(), 0, "re-entered kernel lock");
            self.depth.set(1);
            self.acquisitions.set(self.acquisitions.get() + 1);
        }

        fn release(&self) {
            assert_eq!(self.depth.get(), 1, "released an unheld lock");
            self.depth.set(0);
        }
    }

    /// What the hook could read back for one error
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Recorded {
        pub error: OsError,
        pub service: Option<ServiceId>,
        pub task: Option<TaskId>,
        pub resource: Option<ResourceId>,
        pub alarm: Option<AlarmId>,
        pub mask: Option<EventMask>,
        pub output: Option<OutputRef>,
        pub tick: Option<Tick>,
        pub cycle: Option<Tick>,
    }

    #[derive(Debug, Default)]
    pub struct Recorder {
        calls: heapless::Vec<Recorded, 16>,
    }

    impl Recorder {
        pub fn last(&self) -> Option<Recorded> {
            self.calls.last().copied()
        }
    }

    impl ErrorHook for Recorder {
        fn on_error(&mut self, error: OsError, info: &ErrorInfo<'_>) {
            let task = info
                .activate_task_task_id()
                .or(info.chain_task_task_id())
                .or(info.get_task_state_task_id())
                .or(info.set_event_task_id())
                .or(info.get_event_task_id());
            let resource = info
                .get_resource_res_id()
                .or(info.release_resource_res_id());
            let alarm = info
                .get_alarm_base_alarm_id()
                .or(info.get_alarm_alarm_id())
                .or(info.set_rel_alarm_alarm_id())
                .or(info.set_abs_alarm_alarm_id())
                .or(info.cancel_alarm_alarm_id());
            let mask = info
                .set_event_mask()
                .or(info.clear_event_mask())
                .or(info.wait_event_mask());
            let output = info
                .get_task_id_task_id()
                .or(info.get_task_state_state())
                .or(info.get_event_event())
                .or(info.get_alarm_base_info())
                .or(info.get_alarm_tick());
            let tick = info
                .set_rel_alarm_increment()
                .or(info.set_abs_alarm_start());
            let cycle = info.set_rel_alarm_cycle().or(info.set_abs_alarm_cycle());
            let recorded = Recorded {
                error,
                service: info.service_id(),
                task,
                resource,
                alarm,
                mask,
                output,
                tick,
                cycle,
            };
            self.calls.push(recorded).unwrap();
        }
    }

    /// Two tasks, three resources and two alarms; `running` is dispatched.
    pub struct Fixture {
        pub tables: KernelTables,
        /// Basic task of priority 3
        pub running: TaskId,
        /// Extended task of priority 1, ready
        pub other: TaskId,
        /// Ceiling 5
        pub outer: ResourceId,
        /// Ceiling 6
        pub inner: ResourceId,
        /// Ceiling 2, below `running`
        pub low: ResourceId,
    }

    pub fn fixture() -> Fixture {
        let mut tables = KernelTables::new();
        let running = tables
            .add_task(TaskDescriptor::new(Priority::new(3), TaskClass::Basic))
            .unwrap();
        let other = tables
            .add_task(
                TaskDescriptor::new(Priority::new(1), TaskClass::Extended)
                    .with_state(TaskState::Ready),
            )
            .unwrap();
        let outer = tables
            .add_resource(ResourceDescriptor::new(Priority::new(5)))
            .unwrap();
        let inner = tables
            .add_resource(ResourceDescriptor::new(Priority::new(6)))
            .unwrap();
        let low = tables
            .add_resource(ResourceDescriptor::new(Priority::new(2)))
            .unwrap();
        tables.set_alarm_count(2).unwrap();
        tables.run(running).unwrap();
        Fixture {
            tables,
            running,
            other,
            outer,
            inner,
            low,
        }
    }

    pub fn gate(config: Config) -> ServiceGate<CountingLock, Recorder> {
        ServiceGate::new(config, CountingLock::default(), Recorder::default())
    }
}
