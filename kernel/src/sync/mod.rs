//! Kernel Lock and Locking Policy
//!
//! A service call can be preempted by a higher priority task or an
//! interrupt, so the service call descriptor and the task/resource tables
//! are only touched inside a critical section of the single kernel-wide
//! lock. That lock is not reentrant: each service takes it at most once.
//!
//! Why a service needs the lock depends on the build:
//!
//! - With the ErrorHook, every service records its arguments in the shared
//!   descriptor and may call back into application code, so every service
//!   locks, including pure queries.
//! - Without the ErrorHook, only services that read or change task,
//!   resource or alarm state lock, and only when that object kind exists.
//!
//! [`LockPolicy`] names the condition of one service and resolves it to at
//! most one [`LockReason`] per configuration, so a service never locks twice.

#![deny(missing_docs)]
#![warn(clippy::undocumented_unsafe_blocks)]

use core::cell::Cell;

use crate::config::Config;
use crate::debug_print;

/// Kernel-wide mutual exclusion primitive.
///
/// Implementations must not block or suspend and must be callable from any
/// context that can issue a service call. Acquiring twice without a release
/// in between is a contract violation.
pub trait KernelLock {
    /// Enter the critical section
    fn acquire(&self);

    /// Leave the critical section
    fn release(&self);
}

impl<L: KernelLock + ?Sized> KernelLock for &L {
    fn acquire(&self) {
        (**self).acquire();
    }

    fn release(&self) {
        (**self).release();
    }
}

/// Why a critical section was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// The service call descriptor is written and the ErrorHook may run
    DiagnosticHook,
    /// Task state is read or changed
    TaskState,
    /// Resource ownership is read or changed
    ResourceState,
    /// Alarm state is changed
    AlarmState,
}

/// Locking condition of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPolicy {
    /// Lock only for the ErrorHook
    WhenHook,
    /// Lock for the ErrorHook, otherwise when tasks exist
    WhenHookOrTasks,
    /// Lock for the ErrorHook, otherwise when resources exist
    WhenHookOrResources,
    /// Lock for the ErrorHook, otherwise when alarms exist
    WhenHookOrAlarms,
}

impl LockPolicy {
    /// Reason to lock under `config`, `None` when the service runs unlocked
    pub const fn reason(self, config: &Config) -> Option<LockReason> {
        if config.error_hook() {
            return Some(LockReason::DiagnosticHook);
        }
        match self {
            LockPolicy::WhenHook => None,
            LockPolicy::WhenHookOrTasks if config.tasks() => Some(LockReason::TaskState),
            LockPolicy::WhenHookOrResources if config.resources() => {
                Some(LockReason::ResourceState)
            }
            LockPolicy::WhenHookOrAlarms if config.alarms() => Some(LockReason::AlarmState),
            _ => None,
        }
    }
}

/// Scope of a service call, holding the kernel lock when its policy asks for it.
///
/// The lock is released when the guard is dropped.
#[must_use = "the critical section ends when the guard is dropped"]
pub struct CriticalSection<'a, L: KernelLock + ?Sized> {
    lock: Option<&'a L>,
    reason: Option<LockReason>,
}

impl<'a, L: KernelLock + ?Sized> CriticalSection<'a, L> {
    /// Enter the section selected by `policy` under `config`
    pub fn enter(lock: &'a L, policy: LockPolicy, config: &Config) -> Self {
        let reason = policy.reason(config);
        if let Some(reason) = reason {
            debug_print!(TRACE, "kernel lock taken ({:?})", reason);
            lock.acquire();
        }
        Self {
            lock: reason.map(|_| lock),
            reason,
        }
    }

    /// Why the lock is held, `None` when it is not
    pub const fn reason(&self) -> Option<LockReason> {
        self.reason
    }

    /// Whether the lock is held
    pub const fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
}

impl<L: KernelLock + ?Sized> Drop for CriticalSection<'_, L> {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            lock.release();
        }
    }
}

/// [`KernelLock`] over the `critical-section` crate.
///
/// On single-core Cortex-M this masks interrupts (`cortex-m`'s
/// `critical-section-single-core` implementation); host builds use the
/// implementation registered by the binary, such as `critical-section/std`.
#[derive(Default)]
pub struct CriticalSectionLock {
    held: Cell<bool>,
    restore: Cell<Option<critical_section::RestoreState>>,
}

impl CriticalSectionLock {
    /// Create an unlocked lock
    pub const fn new() -> Self {
        Self {
            held: Cell::new(false),
            restore: Cell::new(None),
        }
    }

    /// Whether the critical section is currently entered
    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

impl core::fmt::Debug for CriticalSectionLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CriticalSectionLock")
            .field("held", &self.held.get())
            .finish_non_exhaustive()
    }
}

impl KernelLock for CriticalSectionLock {
    fn acquire(&self) {
        debug_assert!(!self.held.get(), "kernel lock is not reentrant");
        // SAFETY: every acquire is paired with exactly one `release` by
        // `CriticalSection`, which restores the state in reverse order.
        let restore = unsafe { critical_section::acquire() };
        self.restore.set(Some(restore));
        self.held.set(true);
    }

    fn release(&self) {
        if let Some(restore) = self.restore.take() {
            self.held.set(false);
            // SAFETY: `restore` was returned by the matching `acquire` and is
            // consumed exactly once.
            unsafe { critical_section::release(restore) };
        }
    }
}
