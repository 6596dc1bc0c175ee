//! Scheduler Interface
//!
//! The error layer does not own tasks or resources. It reads them through
//! [`KernelView`], which the scheduler/dispatcher implements over its
//! static configuration tables, and mutates resource ownership through
//! [`ResourceLedger`] only once a GetResource/ReleaseResource call has
//! passed every check.
//!
//! [`KernelTables`] is a fixed-capacity implementation of both traits.
//! Hosts without their own tables (simulators, unit tests) use it directly.

#![deny(missing_docs)]

use heapless::Vec;
use thiserror_no_std::Error;

use crate::alarm::MAX_ALARMS;
use crate::resource::{MAX_RESOURCES, ResourceDescriptor, ResourceId};
use crate::task::{ExecutionState, MAX_TASKS, TaskDescriptor, TaskId, TaskState};

/// Read-only view of the scheduler state needed by the checks
pub trait KernelView {
    /// What the processor is executing
    fn execution_state(&self) -> ExecutionState;

    /// Task owning the processor, `None` outside task context
    fn running_task(&self) -> Option<TaskId>;

    /// Number of configured tasks
    fn task_count(&self) -> usize;

    /// Number of configured resources
    fn resource_count(&self) -> usize;

    /// Number of configured alarms
    fn alarm_count(&self) -> usize;

    /// Task table lookup
    fn task(&self, id: TaskId) -> Option<&TaskDescriptor>;

    /// Resource table lookup
    fn resource(&self, id: ResourceId) -> Option<&ResourceDescriptor>;

    /// Descriptor of the running task
    fn running(&self) -> Option<&TaskDescriptor> {
        self.running_task().and_then(|id| self.task(id))
    }
}

/// Mutable access to resource ownership and held-resource stacks
pub trait ResourceLedger: KernelView {
    /// Mutable task table lookup
    fn task_mut(&mut self, id: TaskId) -> Option<&mut TaskDescriptor>;

    /// Mutable resource table lookup
    fn resource_mut(&mut self, id: ResourceId) -> Option<&mut ResourceDescriptor>;
}

/// Errors raised while building [`KernelTables`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// More than [`MAX_TASKS`] tasks
    #[error("task table full")]
    TooManyTasks,
    /// More than [`MAX_RESOURCES`] resources
    #[error("resource table full")]
    TooManyResources,
    /// More than [`MAX_ALARMS`] alarms
    #[error("alarm table full")]
    TooManyAlarms,
    /// Reference to a task that is not in the table
    #[error("unknown task")]
    UnknownTask,
}

/// Result type for table construction
pub type TableResult<T> = Result<T, TableError>;

/// Fixed-capacity task and resource tables
#[derive(Debug, Clone, Default)]
pub struct KernelTables {
    tasks: Vec<TaskDescriptor, MAX_TASKS>,
    resources: Vec<ResourceDescriptor, MAX_RESOURCES>,
    alarm_count: usize,
    running: Option<TaskId>,
    execution_state: ExecutionState,
}

impl KernelTables {
    /// Create empty tables
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            resources: Vec::new(),
            alarm_count: 0,
            running: None,
            execution_state: ExecutionState::Init,
        }
    }

    /// Append a task and return its identifier
    pub fn add_task(&mut self, task: TaskDescriptor) -> TableResult<TaskId> {
        let id = TaskId::new(self.tasks.len() as u32);
        self.tasks.push(task).map_err(|_| TableError::TooManyTasks)?;
        Ok(id)
    }

    /// Append a resource and return its identifier
    pub fn add_resource(&mut self, resource: ResourceDescriptor) -> TableResult<ResourceId> {
        let id = ResourceId::new(self.resources.len() as i32);
        self.resources
            .push(resource)
            .map_err(|_| TableError::TooManyResources)?;
        Ok(id)
    }

    /// Declare the number of configured alarms
    pub fn set_alarm_count(&mut self, count: usize) -> TableResult<()> {
        if count > MAX_ALARMS {
            return Err(TableError::TooManyAlarms);
        }
        self.alarm_count = count;
        Ok(())
    }

    /// Dispatch `task`: it becomes the running task at task level
    pub fn run(&mut self, task: TaskId) -> TableResult<()> {
        if let Some(previous) = self.running.and_then(|id| self.tasks.get_mut(id.index())) {
            if previous.state == TaskState::Running {
                previous.state = TaskState::Ready;
            }
        }
        let descriptor = self
            .tasks
            .get_mut(task.index())
            .ok_or(TableError::UnknownTask)?;
        descriptor.state = TaskState::Running;
        self.running = Some(task);
        self.execution_state = ExecutionState::Task;
        Ok(())
    }

    /// Set the execution state without changing the running task
    pub fn set_execution_state(&mut self, state: ExecutionState) {
        self.execution_state = state;
    }

    /// Change the state of a task
    pub fn set_task_state(&mut self, task: TaskId, state: TaskState) -> TableResult<()> {
        let descriptor = self
            .tasks
            .get_mut(task.index())
            .ok_or(TableError::UnknownTask)?;
        descriptor.state = state;
        Ok(())
    }
}

impl KernelView for KernelTables {
    fn execution_state(&self) -> ExecutionState {
        self.execution_state
    }

    fn running_task(&self) -> Option<TaskId> {
        self.running
    }

    fn task_count(&self) -> usize {
        self.tasks.len()
    }

    fn resource_count(&self) -> usize {
        self.resources.len()
    }

    fn alarm_count(&self) -> usize {
        self.alarm_count
    }

    fn task(&self, id: TaskId) -> Option<&TaskDescriptor> {
        self.tasks.get(id.index())
    }

    fn resource(&self, id: ResourceId) -> Option<&ResourceDescriptor> {
        self.resources.get(id.index()?)
    }
}

impl ResourceLedger for KernelTables {
    fn task_mut(&mut self, id: TaskId) -> Option<&mut TaskDescriptor> {
        self.tasks.get_mut(id.index())
    }

    fn resource_mut(&mut self, id: ResourceId) -> Option<&mut ResourceDescriptor> {
        self.resources.get_mut(id.index()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskClass};

    #[test]
    fn identifiers_follow_insertion_order() {
        let mut tables = KernelTables::new();
        let a = tables
            .add_task(TaskDescriptor::new(Priority::new(1), TaskClass::Basic))
            .unwrap();
        let b = tables
            .add_task(TaskDescriptor::new(Priority::new(2), TaskClass::Extended))
            .unwrap();
        let r = tables
            .add_resource(ResourceDescriptor::new(Priority::new(2)))
            .unwrap();
        assert_eq!((a.as_u32(), b.as_u32(), r.as_i32()), (0, 1, 0));
        assert_eq!(tables.task_count(), 2);
        assert_eq!(tables.resource_count(), 1);
    }

    #[test]
    fn run_switches_running_task() {
        let mut tables = KernelTables::new();
        let a = tables
            .add_task(TaskDescriptor::new(Priority::new(1), TaskClass::Basic))
            .unwrap();
        let b = tables
            .add_task(TaskDescriptor::new(Priority::new(2), TaskClass::Basic))
            .unwrap();
        tables.run(a).unwrap();
        tables.run(b).unwrap();
        assert_eq!(tables.running_task(), Some(b));
        assert_eq!(tables.execution_state(), ExecutionState::Task);
        assert_eq!(tables.task(a).map(|t| t.state), Some(TaskState::Ready));
        assert_eq!(tables.running().map(|t| t.state), Some(TaskState::Running));
    }

    #[test]
    fn lookups_outside_tables_fail() {
        let mut tables = KernelTables::new();
        assert!(tables.task(TaskId::new(0)).is_none());
        assert!(tables.resource(ResourceId::NONE).is_none());
        assert_eq!(tables.run(TaskId::new(3)), Err(TableError::UnknownTask));
        assert_eq!(tables.set_alarm_count(MAX_ALARMS + 1), Err(TableError::TooManyAlarms));
    }
}
