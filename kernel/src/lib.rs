//! OSEK Error Handling Layer
//!
//! Error detection and ErrorHook dispatch for the system services of an
//! OSEK/VDX kernel. The library sits between the service entry points and
//! the scheduler: each checked service validates its arguments and the
//! caller's context against the static task, resource and alarm tables,
//! enforces the priority ceiling protocol on resources and, on failure,
//! reports the OSEK status code to the application ErrorHook together with
//! the identifier and arguments of the failed call.
//!
//! # Architecture
//!
//! - [`config`]: build-time switches folded into one [`Config`] value
//! - [`error`]: OSEK `StatusType` codes and the [`OsError`] type
//! - [`scheduler`]: the read-only [`KernelView`] of the kernel tables
//! - [`checks`]: individual checks and the [`Validation`] chain
//! - [`sync`]: kernel lock and the per-service [`LockPolicy`]
//! - [`descriptor`] and [`hook`]: service call recording and ErrorHook
//! - [`syscalls`]: the [`ServiceGate`] running every checked service
//!
//! # Safety
//!
//! The only unsafe code enters and leaves the `critical-section` crate's
//! global critical section in [`sync::CriticalSectionLock`]. All shared
//! kernel state is reached through `&`/`&mut` borrows handed in by the
//! caller.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(missing_docs)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::panic)]
#![warn(clippy::unwrap_used)]

pub mod macros;

pub mod alarm;
pub mod checks;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hook;
pub mod resource;
pub mod scheduler;
pub mod sync;
pub mod syscalls;
pub mod task;

pub use checks::Validation;
pub use config::{CONFIG, Config, Features};
pub use descriptor::{ErrorInfo, OutputRef};
pub use error::{ErrorCode, OsError, StatusResult};
pub use hook::{ErrorHook, NoHook};
pub use scheduler::{KernelTables, KernelView, ResourceLedger};
pub use sync::{CriticalSectionLock, KernelLock, LockPolicy};
pub use syscalls::{ErrorStats, ServiceGate, ServiceId};
