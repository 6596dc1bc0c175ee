//! Task management services

use super::{ServiceGate, ServiceId};
use crate::checks::Validation;
use crate::descriptor::{ObjectId, OutputRef, ServiceParam};
use crate::error::StatusResult;
use crate::hook::ErrorHook;
use crate::scheduler::KernelView;
use crate::sync::KernelLock;
use crate::task::TaskId;

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// ActivateTask: `InvalidId` for an unknown task.
    pub fn activate_task<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        task: TaskId,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::ActivateTask,
            |r| r.record_identifier(ObjectId::Task(task)),
            |config, kernel| Validation::new(config, kernel).task_id(task).finish(),
        )
    }

    /// TerminateTask: `WrongCallLevel` outside task level, then
    /// `ResourceStillHeld` while the running task holds a resource.
    pub fn terminate_task<K: KernelView + ?Sized>(&mut self, kernel: &K) -> StatusResult {
        self.call(
            kernel,
            ServiceId::TerminateTask,
            |_| {},
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_call_level()
                    .still_holding()
                    .finish()
            },
        )
    }

    /// ChainTask: call level, then the successor's identifier, then held
    /// resources.
    pub fn chain_task<K: KernelView + ?Sized>(&mut self, kernel: &K, task: TaskId) -> StatusResult {
        self.call(
            kernel,
            ServiceId::ChainTask,
            |r| r.record_identifier(ObjectId::Task(task)),
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_call_level()
                    .task_id(task)
                    .still_holding()
                    .finish()
            },
        )
    }

    /// Schedule: same checks as TerminateTask.
    pub fn schedule<K: KernelView + ?Sized>(&mut self, kernel: &K) -> StatusResult {
        self.call(
            kernel,
            ServiceId::Schedule,
            |_| {},
            |config, kernel| {
                Validation::new(config, kernel)
                    .task_call_level()
                    .still_holding()
                    .finish()
            },
        )
    }

    /// GetTaskID: never fails; records the output slot for the hook.
    pub fn get_task_id<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        task_id: OutputRef,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::GetTaskId,
            |r| r.record_identifier(ObjectId::TaskIdRef(task_id)),
            |config, kernel| Validation::new(config, kernel).finish(),
        )
    }

    /// GetTaskState: `InvalidId` for an unknown task.
    pub fn get_task_state<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        task: TaskId,
        state: OutputRef,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::GetTaskState,
            |r| {
                r.record_identifier(ObjectId::Task(task));
                r.record_parameter(ServiceParam::TaskStateRef(state));
            },
            |config, kernel| Validation::new(config, kernel).task_id(task).finish(),
        )
    }
}
