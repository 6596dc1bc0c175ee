//! Call Level and Task Class Checks

use crate::config::Config;
use crate::error::ErrorCode;
use crate::scheduler::KernelView;
use crate::task::{ExecutionState, TaskId, TaskState};

/// Report `WrongCallLevel` unless the caller runs at task level.
///
/// A build without tasks has no task level, so the check always fails there.
pub fn check_task_call_level<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if !config.tasks() || kernel.execution_state() != ExecutionState::Task {
        *result = ErrorCode::WrongCallLevel;
    }
}

/// Report `AccessDenied` when `task` is not an extended task
pub fn check_extended_task<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    task: TaskId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if let Some(descriptor) = kernel.task(task) {
        if !descriptor.is_extended() {
            *result = ErrorCode::AccessDenied;
        }
    }
}

/// Report `AccessDenied` when the running task is not an extended task
pub fn check_running_extended<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if !kernel.running().is_some_and(|task| task.is_extended()) {
        *result = ErrorCode::AccessDenied;
    }
}

/// Report `InvalidState` when `task` is suspended
pub fn check_not_suspended<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    task: TaskId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if kernel
        .task(task)
        .is_some_and(|descriptor| descriptor.state == TaskState::Suspended)
    {
        *result = ErrorCode::InvalidState;
    }
}
