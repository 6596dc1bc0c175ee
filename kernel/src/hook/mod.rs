//! ErrorHook Dispatch
//!
//! The ErrorHook is the application's window on failed service calls. When
//! the `error-hook` switch is on, each checked service records its
//! identifier and arguments through an [`ErrorReporter`] and, on failure,
//! the reporter calls the hook with the status and an [`ErrorInfo`] view of
//! what was recorded.
//!
//! With the switch off every method of the reporter returns immediately,
//! so services record unconditionally and pay nothing in that build.
//!
//! The hook runs inside the service's critical section. It must not call
//! back into services that take the kernel lock; since the hook only
//! receives a shared view of the descriptor it cannot reach the service
//! gate that invoked it.

#![deny(missing_docs)]

use crate::alarm::Tick;
use crate::config::Config;
use crate::debug_print;
use crate::descriptor::{ErrorInfo, ObjectId, ServiceCallDescriptor, ServiceParam};
use crate::error::{ErrorCode, OsError};
use crate::syscalls::ServiceId;

/// Application callback for failed service calls
pub trait ErrorHook {
    /// Called once per failed service call, with the returned error
    fn on_error(&mut self, error: OsError, info: &ErrorInfo<'_>);
}

/// Hook that ignores every error
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl ErrorHook for NoHook {
    fn on_error(&mut self, _error: OsError, _info: &ErrorInfo<'_>) {}
}

impl<F> ErrorHook for F
where
    F: FnMut(OsError, &ErrorInfo<'_>),
{
    fn on_error(&mut self, error: OsError, info: &ErrorInfo<'_>) {
        self(error, info);
    }
}

/// Owner of the service call descriptor and the application hook
#[derive(Debug)]
pub struct ErrorReporter<H: ErrorHook> {
    config: Config,
    descriptor: ServiceCallDescriptor,
    hook: H,
}

impl<H: ErrorHook> ErrorReporter<H> {
    /// Create a reporter with an empty descriptor
    pub const fn new(config: Config, hook: H) -> Self {
        Self {
            config,
            descriptor: ServiceCallDescriptor::new(),
            hook,
        }
    }

    /// Configuration the reporter runs under
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The application hook
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// The application hook, mutably
    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Record the service being checked. Clears the previous call's arguments.
    pub fn record_service(&mut self, service: ServiceId) {
        if self.config.error_hook() {
            self.descriptor.set_service(service);
        }
    }

    /// Record the identifier argument of the current service
    pub fn record_identifier(&mut self, id: ObjectId) {
        if self.config.error_hook() {
            self.descriptor.set_id(id);
        }
    }

    /// Record the secondary argument of the current service
    pub fn record_parameter(&mut self, param: ServiceParam) {
        if self.config.error_hook() {
            self.descriptor.set_param(param);
        }
    }

    /// Record the cycle of SetRelAlarm / SetAbsAlarm
    pub fn record_cycle(&mut self, cycle: Tick) {
        if self.config.error_hook() {
            self.descriptor.set_cycle(cycle);
        }
    }

    /// Call the hook when `code` is an error. Returns whether it was called.
    pub fn dispatch_on_error(&mut self, code: ErrorCode) -> bool {
        if !self.config.error_hook() {
            return false;
        }
        let Err(error) = code.into_result() else {
            return false;
        };

        debug_print!(
            DEBUG,
            "ErrorHook: {} in {:?}",
            error,
            self.descriptor.service()
        );
        let info = ErrorInfo::new(&self.descriptor);
        self.hook.on_error(error, &info);
        true
    }
}
