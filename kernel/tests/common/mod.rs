//! Shared fixtures for the service gate integration tests

#![allow(dead_code)]

use std::cell::Cell;

use osek_errors::alarm::AlarmId;
use osek_errors::resource::{ResourceDescriptor, ResourceId};
use osek_errors::task::{EventMask, Priority, TaskClass, TaskDescriptor, TaskId, TaskState};
use osek_errors::{
    Config, ErrorHook, ErrorInfo, KernelLock, KernelTables, OsError, OutputRef, ServiceGate,
    ServiceId, StatusResult,
};

/// Non-reentrant lock that counts acquisitions
#[derive(Debug, Default)]
pub struct CountingLock {
    depth: Cell<u32>,
    acquisitions: Cell<u32>,
}

impl CountingLock {
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.get()
    }

    pub fn is_held(&self) -> bool {
        self.depth.get() != 0
    }
}

impl KernelLock for CountingLock {
    fn acquire(&self) {
        assert_eq!(self.depth.get(), 0, "kernel lock re-entered");
        self.depth.set(1);
        self.acquisitions.set(self.acquisitions.get() + 1);
    }

    fn release(&self) {
        assert_eq!(self.depth.get(), 1, "kernel lock released while free");
        self.depth.set(0);
    }
}

/// Hook keeping every error with the service it was raised in
#[derive(Debug, Default)]
pub struct Capture {
    pub errors: Vec<(OsError, Option<ServiceId>)>,
}

impl ErrorHook for Capture {
    fn on_error(&mut self, error: OsError, info: &ErrorInfo<'_>) {
        self.errors.push((error, info.service_id()));
    }
}

pub type Gate = ServiceGate<CountingLock, Capture>;

pub fn gate(config: Config) -> Gate {
    ServiceGate::new(config, CountingLock::default(), Capture::default())
}

/// Kernel with one running basic task and resources of the given ceilings
pub struct World {
    pub tables: KernelTables,
    pub task: TaskId,
    pub extended: TaskId,
    pub resources: Vec<ResourceId>,
}

pub const ALARMS: usize = 4;

pub fn world(priority: u8, ceilings: &[u8]) -> World {
    let mut tables = KernelTables::new();
    let task = tables
        .add_task(TaskDescriptor::new(Priority::new(priority), TaskClass::Basic))
        .unwrap();
    let extended = tables
        .add_task(
            TaskDescriptor::new(Priority::new(0), TaskClass::Extended).with_state(TaskState::Ready),
        )
        .unwrap();
    let resources = ceilings
        .iter()
        .map(|&ceiling| {
            tables
                .add_resource(ResourceDescriptor::new(Priority::new(ceiling)))
                .unwrap()
        })
        .collect();
    tables.set_alarm_count(ALARMS).unwrap();
    tables.run(task).unwrap();
    World {
        tables,
        task,
        extended,
        resources,
    }
}

/// Call `service` through the gate with in-range arguments
pub fn invoke(gate: &mut Gate, world: &mut World, service: ServiceId) -> StatusResult {
    let slot = 0u32;
    let out = OutputRef::of(&slot);
    let tables = &mut world.tables;
    let task = world.extended;
    let resource = world.resources.first().copied().unwrap_or(ResourceId::NONE);
    let alarm = AlarmId::new(0);
    let mask = EventMask::new(1);
    match service {
        ServiceId::ActivateTask => gate.activate_task(tables, task),
        ServiceId::TerminateTask => gate.terminate_task(tables),
        ServiceId::ChainTask => gate.chain_task(tables, task),
        ServiceId::Schedule => gate.schedule(tables),
        ServiceId::GetTaskId => gate.get_task_id(tables, out),
        ServiceId::GetTaskState => gate.get_task_state(tables, task, out),
        ServiceId::EnableAllInterrupts => gate.enable_all_interrupts(),
        ServiceId::DisableAllInterrupts => gate.disable_all_interrupts(),
        ServiceId::ResumeAllInterrupts => gate.resume_all_interrupts(),
        ServiceId::SuspendAllInterrupts => gate.suspend_all_interrupts(),
        ServiceId::ResumeOsInterrupts => gate.resume_os_interrupts(),
        ServiceId::SuspendOsInterrupts => gate.suspend_os_interrupts(),
        ServiceId::GetResource => gate.get_resource(tables, resource),
        ServiceId::ReleaseResource => gate.release_resource(tables, resource),
        ServiceId::SetEvent => gate.set_event(tables, task, mask),
        ServiceId::ClearEvent => gate.clear_event(tables, mask),
        ServiceId::GetEvent => gate.get_event(tables, task, out),
        ServiceId::WaitEvent => gate.wait_event(tables, mask),
        ServiceId::GetAlarmBase => gate.get_alarm_base(tables, alarm, out),
        ServiceId::GetAlarm => gate.get_alarm(tables, alarm, out),
        ServiceId::SetRelAlarm => gate.set_rel_alarm(tables, alarm, 5, 0),
        ServiceId::SetAbsAlarm => gate.set_abs_alarm(tables, alarm, 5, 10),
        ServiceId::CancelAlarm => gate.cancel_alarm(tables, alarm),
        ServiceId::GetActiveApplicationMode => gate.get_active_application_mode(),
        ServiceId::StartOs => gate.start_os(),
        ServiceId::ShutdownOs => gate.shutdown_os(),
    }
}
