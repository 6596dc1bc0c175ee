//! Identifier Checks
//!
//! Range checks of task, resource and alarm identifiers against the size
//! of the static tables. When an object kind is absent from the build,
//! every identifier of that kind is invalid. Resource identifiers also
//! admit [`ResourceId::NONE`].
//!
//! Without extended checking these are no-ops: keeping identifiers in
//! range is then the caller's responsibility.

use crate::alarm::AlarmId;
use crate::config::Config;
use crate::error::ErrorCode;
use crate::resource::ResourceId;
use crate::scheduler::KernelView;
use crate::task::TaskId;

/// Report `InvalidId` for a task identifier outside `[0, task_count)`
pub fn check_task_id<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    task: TaskId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if !config.tasks() || task.index() >= kernel.task_count() {
        *result = ErrorCode::InvalidId;
    }
}

/// Report `InvalidId` for a resource identifier outside `[0, resource_count)`
/// other than [`ResourceId::NONE`]
pub fn check_resource_id<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    resource: ResourceId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() || resource.is_none() {
        return;
    }
    let in_range = config.resources()
        && resource
            .index()
            .is_some_and(|index| index < kernel.resource_count());
    if !in_range {
        *result = ErrorCode::InvalidId;
    }
}

/// Report `InvalidId` for an alarm identifier outside `[0, alarm_count)`
pub fn check_alarm_id<K: KernelView + ?Sized>(
    config: &Config,
    kernel: &K,
    alarm: AlarmId,
    result: &mut ErrorCode,
) {
    if !config.extended() || result.is_err() {
        return;
    }
    if !config.alarms() || alarm.index() >= kernel.alarm_count() {
        *result = ErrorCode::InvalidId;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;
    use crate::resource::ResourceDescriptor;
    use crate::scheduler::KernelTables;
    use crate::task::{Priority, TaskClass, TaskDescriptor};

    fn tables() -> KernelTables {
        let mut tables = KernelTables::new();
        for _ in 0..3 {
            tables
                .add_task(TaskDescriptor::new(Priority::new(1), TaskClass::Basic))
                .unwrap();
        }
        for _ in 0..2 {
            tables
                .add_resource(ResourceDescriptor::new(Priority::new(1)))
                .unwrap();
        }
        tables.set_alarm_count(4).unwrap();
        tables
    }

    fn task_result(config: Config, id: u32) -> ErrorCode {
        let mut result = ErrorCode::Ok;
        check_task_id(&config, &tables(), TaskId::new(id), &mut result);
        result
    }

    fn resource_result(config: Config, id: i32) -> ErrorCode {
        let mut result = ErrorCode::Ok;
        check_resource_id(&config, &tables(), ResourceId::new(id), &mut result);
        result
    }

    #[test]
    fn task_ids_are_checked_against_table_size() {
        assert_eq!(task_result(Config::full(), 2), ErrorCode::Ok);
        assert_eq!(task_result(Config::full(), 3), ErrorCode::InvalidId);
        assert_eq!(task_result(Config::standard(), 3), ErrorCode::Ok);
    }

    #[test]
    fn every_task_id_is_invalid_without_tasks() {
        let config = Config::full().with(Features::TASKS, false);
        assert_eq!(task_result(config, 0), ErrorCode::InvalidId);
    }

    #[test]
    fn resource_sentinel_is_accepted() {
        assert_eq!(resource_result(Config::full(), -1), ErrorCode::Ok);
        assert_eq!(resource_result(Config::full(), -2), ErrorCode::InvalidId);
        assert_eq!(resource_result(Config::full(), 1), ErrorCode::Ok);
        assert_eq!(resource_result(Config::full(), 2), ErrorCode::InvalidId);
    }

    #[test]
    fn only_sentinel_is_valid_without_resources() {
        let config = Config::full().with(Features::RESOURCES, false);
        assert_eq!(resource_result(config, -1), ErrorCode::Ok);
        assert_eq!(resource_result(config, 0), ErrorCode::InvalidId);
    }

    #[test]
    fn alarm_ids_are_checked_against_alarm_count() {
        let mut result = ErrorCode::Ok;
        check_alarm_id(&Config::full(), &tables(), AlarmId::new(3), &mut result);
        assert_eq!(result, ErrorCode::Ok);
        check_alarm_id(&Config::full(), &tables(), AlarmId::new(4), &mut result);
        assert_eq!(result, ErrorCode::InvalidId);
    }

    #[test]
    fn earlier_error_is_kept() {
        let mut result = ErrorCode::WrongCallLevel;
        check_task_id(&Config::full(), &tables(), TaskId::new(99), &mut result);
        assert_eq!(result, ErrorCode::WrongCallLevel);
    }
}
