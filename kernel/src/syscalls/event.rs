//! Event control services

use super::{ServiceGate, ServiceId};
use crate::checks::Validation;
use crate::descriptor::{ObjectId, OutputRef, ServiceParam};
use crate::error::StatusResult;
use crate::hook::ErrorHook;
use crate::scheduler::KernelView;
use crate::sync::KernelLock;
use crate::task::{EventMask, TaskId};

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// SetEvent: the target must exist, be an extended task and not be
    /// suspended.
    pub fn set_event<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        task: TaskId,
        mask: EventMask,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::SetEvent,
            |r| {
                r.record_identifier(ObjectId::Task(task));
                r.record_parameter(ServiceParam::Mask(mask));
            },
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_id(task)
                    .extended_task(task)
                    .not_suspended(task)
                    .finish()
            },
        )
    }

    /// ClearEvent: task level only, and only from an extended task.
    pub fn clear_event<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        mask: EventMask,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::ClearEvent,
            |r| r.record_parameter(ServiceParam::Mask(mask)),
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_call_level()
                    .running_extended()
                    .finish()
            },
        )
    }

    /// GetEvent: same target checks as SetEvent.
    pub fn get_event<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        task: TaskId,
        event: OutputRef,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::GetEvent,
            |r| {
                r.record_identifier(ObjectId::Task(task));
                r.record_parameter(ServiceParam::MaskRef(event));
            },
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_id(task)
                    .extended_task(task)
                    .not_suspended(task)
                    .finish()
            },
        )
    }

    /// WaitEvent: as ClearEvent, and the caller must not hold a resource
    /// since it may be put to wait.
    pub fn wait_event<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        mask: EventMask,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::WaitEvent,
            |r| r.record_parameter(ServiceParam::Mask(mask)),
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_call_level()
                    .running_extended()
                    .still_holding()
                    .finish()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{fixture, gate};
    use crate::config::Config;
    use crate::descriptor::OutputRef;
    use crate::error::OsError;
    use crate::scheduler::ResourceLedger;
    use crate::task::{EventMask, ExecutionState, TaskId, TaskState};

    const MASK: EventMask = EventMask::new(0b10);

    #[test]
    fn set_event_target_checks_in_order() {
        let mut f = fixture();
        let mut gate = gate(Config::full());

        assert_eq!(
            gate.set_event(&f.tables, TaskId::new(12), MASK),
            Err(OsError::InvalidId)
        );
        assert_eq!(
            gate.set_event(&f.tables, f.running, MASK),
            Err(OsError::AccessDenied),
            "basic task"
        );

        f.tables.set_task_state(f.other, TaskState::Suspended).unwrap();
        assert_eq!(
            gate.set_event(&f.tables, f.other, MASK),
            Err(OsError::InvalidState)
        );
        f.tables.set_task_state(f.other, TaskState::Waiting).unwrap();
        assert_eq!(gate.set_event(&f.tables, f.other, MASK), Ok(()));

        let seen = gate.hook().last().unwrap();
        assert_eq!(seen.error, OsError::InvalidState);
        assert_eq!(seen.task, Some(f.other));
        assert_eq!(seen.mask, Some(MASK));
    }

    #[test]
    fn get_event_records_the_output_slot() {
        let f = fixture();
        let slot = EventMask::EMPTY;
        let mut gate = gate(Config::full());
        assert_eq!(
            gate.get_event(&f.tables, f.running, OutputRef::of(&slot)),
            Err(OsError::AccessDenied)
        );
        let seen = gate.hook().last().unwrap();
        assert_eq!(seen.output, Some(OutputRef::of(&slot)));
    }

    #[test]
    fn basic_task_cannot_clear_or_wait() {
        let f = fixture();
        let mut gate = gate(Config::full());
        assert_eq!(gate.clear_event(&f.tables, MASK), Err(OsError::AccessDenied));
        assert_eq!(gate.wait_event(&f.tables, MASK), Err(OsError::AccessDenied));
    }

    #[test]
    fn extended_task_waits_only_empty_handed() {
        let mut f = fixture();
        f.tables.run(f.other).unwrap();
        let mut gate = gate(Config::full());
        assert_eq!(gate.clear_event(&f.tables, MASK), Ok(()));
        assert_eq!(gate.wait_event(&f.tables, MASK), Ok(()));

        let other = f.other;
        let outer = f.outer;
        f.tables.task_mut(other).unwrap().resources.push(outer).unwrap();
        assert_eq!(
            gate.wait_event(&f.tables, MASK),
            Err(OsError::ResourceStillHeld)
        );

        f.tables.set_execution_state(ExecutionState::Isr);
        assert_eq!(
            gate.wait_event(&f.tables, MASK),
            Err(OsError::WrongCallLevel)
        );
    }
}
