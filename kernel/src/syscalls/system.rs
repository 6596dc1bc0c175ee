//! Interrupt handling and operating system execution services
//!
//! None of these has an error to detect. They still go through the gate, so
//! an ErrorHook build records the service id under the kernel lock.

use super::{ServiceGate, ServiceId};
use crate::error::StatusResult;
use crate::hook::ErrorHook;
use crate::sync::KernelLock;

impl<L: KernelLock, H: ErrorHook> ServiceGate<L, H> {
    /// EnableAllInterrupts
    pub fn enable_all_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::EnableAllInterrupts)
    }

    /// DisableAllInterrupts
    pub fn disable_all_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::DisableAllInterrupts)
    }

    /// ResumeAllInterrupts
    pub fn resume_all_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::ResumeAllInterrupts)
    }

    /// SuspendAllInterrupts
    pub fn suspend_all_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::SuspendAllInterrupts)
    }

    /// ResumeOSInterrupts
    pub fn resume_os_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::ResumeOsInterrupts)
    }

    /// SuspendOSInterrupts
    pub fn suspend_os_interrupts(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::SuspendOsInterrupts)
    }

    /// GetActiveApplicationMode
    pub fn get_active_application_mode(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::GetActiveApplicationMode)
    }

    /// StartOS
    pub fn start_os(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::StartOs)
    }

    /// ShutdownOS
    pub fn shutdown_os(&mut self) -> StatusResult {
        self.call_unchecked(ServiceId::ShutdownOs)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::gate;
    use crate::config::Config;

    #[test]
    fn unchecked_services_lock_only_with_the_hook() {
        let mut hooked = gate(Config::full());
        let mut plain = gate(Config::standard());
        for gate in [&mut hooked, &mut plain] {
            gate.enable_all_interrupts().unwrap();
            gate.disable_all_interrupts().unwrap();
            gate.resume_all_interrupts().unwrap();
            gate.suspend_all_interrupts().unwrap();
            gate.resume_os_interrupts().unwrap();
            gate.suspend_os_interrupts().unwrap();
            gate.get_active_application_mode().unwrap();
            gate.start_os().unwrap();
            gate.shutdown_os().unwrap();
        }
        assert_eq!(hooked.lock().acquisitions(), 9);
        assert_eq!(plain.lock().acquisitions(), 0);
        assert_eq!(hooked.stats().service_calls, 9);
        assert_eq!(hooked.stats().errors_reported, 0);
        assert_eq!(hooked.hook().last(), None);
    }
}
