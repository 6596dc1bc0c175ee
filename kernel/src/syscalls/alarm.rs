//! Alarm services
//!
//! Only the alarm identifier is checked here. Range checks of increments,
//! start values and cycles against the counter's [`AlarmBase`] are done by
//! the counter driver, which owns the base.
//!
//! [`AlarmBase`]: crate::alarm::AlarmBase

use super::{ServiceGate, ServiceId};
use crate::alarm::{AlarmId, Tick};
use crate::checks::Validation;
use crate::descriptor::{ObjectId, OutputRef, ServiceParam};
use crate::error::StatusResult;
use crate::hook::ErrorHook;
use crate::scheduler::KernelView;
use crate::sync::KernelLock;

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// GetAlarmBase
    pub fn get_alarm_base<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        alarm: AlarmId,
        info: OutputRef,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::GetAlarmBase,
            |r| {
                r.record_identifier(ObjectId::Alarm(alarm));
                r.record_parameter(ServiceParam::AlarmBaseRef(info));
            },
            |config, kernel| Validation::new(config, kernel).alarm_id(alarm).finish(),
        )
    }

    /// GetAlarm
    pub fn get_alarm<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        alarm: AlarmId,
        tick: OutputRef,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::GetAlarm,
            |r| {
                r.record_identifier(ObjectId::Alarm(alarm));
                r.record_parameter(ServiceParam::TickRef(tick));
            },
            |config, kernel| Validation::new(config, kernel).alarm_id(alarm).finish(),
        )
    }

    /// SetRelAlarm
    pub fn set_rel_alarm<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        alarm: AlarmId,
        increment: Tick,
        cycle: Tick,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::SetRelAlarm,
            |r| {
                r.record_identifier(ObjectId::Alarm(alarm));
                r.record_parameter(ServiceParam::Tick(increment));
                r.record_cycle(cycle);
            },
            |config, kernel| Validation::new(config, kernel).alarm_id(alarm).finish(),
        )
    }

    /// SetAbsAlarm
    pub fn set_abs_alarm<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        alarm: AlarmId,
        start: Tick,
        cycle: Tick,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::SetAbsAlarm,
            |r| {
                r.record_identifier(ObjectId::Alarm(alarm));
                r.record_parameter(ServiceParam::Tick(start));
                r.record_cycle(cycle);
            },
            |config, kernel| Validation::new(config, kernel).alarm_id(alarm).finish(),
        )
    }

    /// CancelAlarm
    pub fn cancel_alarm<K: KernelView + ?Sized>(
        &mut self,
        kernel: &K,
        alarm: AlarmId,
    ) -> StatusResult {
        self.call(
            kernel,
            ServiceId::CancelAlarm,
            |r| r.record_identifier(ObjectId::Alarm(alarm)),
            |config, kernel| Validation::new(config, kernel).alarm_id(alarm).finish(),
        )
    }
}
