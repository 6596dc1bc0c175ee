//! Build-Time Configuration
//!
//! The OSEK error layer is parameterized by five independent switches:
//! which object kinds exist in the static configuration (tasks, resources,
//! alarms), whether extended error checking is performed, and whether the
//! application ErrorHook is called.
//!
//! The switches are Cargo features, but the code never branches on
//! `#[cfg(feature = ...)]` directly. They are folded into the [`CONFIG`]
//! constant with `cfg!`, so every checking path is type-checked in every
//! build and the compiler removes the branches of disabled features.
//! A [`Config`] can also be built at runtime, which is how the tests walk
//! every combination of the matrix.
//!
//! | Feature           | Switch                    |
//! |-------------------|---------------------------|
//! | `tasks`           | [`Features::TASKS`]       |
//! | `resources`       | [`Features::RESOURCES`]   |
//! | `alarms`          | [`Features::ALARMS`]      |
//! | `extended-checks` | [`Features::EXTENDED`]    |
//! | `error-hook`      | [`Features::ERROR_HOOK`]  |

#![deny(missing_docs)]

use bitflags::bitflags;

bitflags! {
    /// Set of enabled build-time switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u8 {
        /// At least one task is configured
        const TASKS = 1 << 0;
        /// At least one resource is configured
        const RESOURCES = 1 << 1;
        /// At least one alarm is configured
        const ALARMS = 1 << 2;
        /// Extended error checking
        const EXTENDED = 1 << 3;
        /// ErrorHook is called on service failure
        const ERROR_HOOK = 1 << 4;
    }
}

/// Number of distinct switch combinations
pub const FEATURE_COMBINATIONS: u8 = 1 << 5;

/// Resolved configuration of the error layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    features: Features,
}

impl Config {
    /// Create a configuration from an explicit switch set
    pub const fn new(features: Features) -> Self {
        Self { features }
    }

    /// Configuration selected by the crate's Cargo features
    pub const fn from_cargo_features() -> Self {
        let mut bits = 0;
        if cfg!(feature = "tasks") {
            bits |= Features::TASKS.bits();
        }
        if cfg!(feature = "resources") {
            bits |= Features::RESOURCES.bits();
        }
        if cfg!(feature = "alarms") {
            bits |= Features::ALARMS.bits();
        }
        if cfg!(feature = "extended-checks") {
            bits |= Features::EXTENDED.bits();
        }
        if cfg!(feature = "error-hook") {
            bits |= Features::ERROR_HOOK.bits();
        }
        Self::new(Features::from_bits_truncate(bits))
    }

    /// Everything enabled: extended checking with an ErrorHook
    pub const fn full() -> Self {
        Self::new(Features::all())
    }

    /// Production-style configuration: all object kinds, standard checking, no hook
    pub const fn standard() -> Self {
        Self::new(Features::TASKS.union(Features::RESOURCES).union(Features::ALARMS))
    }

    /// Enabled switches
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Whether tasks exist in this build
    pub const fn tasks(&self) -> bool {
        self.features.contains(Features::TASKS)
    }

    /// Whether resources exist in this build
    pub const fn resources(&self) -> bool {
        self.features.contains(Features::RESOURCES)
    }

    /// Whether alarms exist in this build
    pub const fn alarms(&self) -> bool {
        self.features.contains(Features::ALARMS)
    }

    /// Whether extended error checking is performed
    pub const fn extended(&self) -> bool {
        self.features.contains(Features::EXTENDED)
    }

    /// Whether the ErrorHook is called
    pub const fn error_hook(&self) -> bool {
        self.features.contains(Features::ERROR_HOOK)
    }

    /// Same configuration with `features` switched on or off
    #[must_use]
    pub const fn with(self, features: Features, enabled: bool) -> Self {
        if enabled {
            Self::new(self.features.union(features))
        } else {
            Self::new(self.features.difference(features))
        }
    }

    /// Iterate over all [`FEATURE_COMBINATIONS`] configurations
    pub fn matrix() -> impl Iterator<Item = Config> {
        (0..FEATURE_COMBINATIONS).map(|bits| Config::new(Features::from_bits_truncate(bits)))
    }
}

impl Default for Config {
    fn default() -> Self {
        CONFIG
    }
}

/// The configuration this crate was built with
pub const CONFIG: Config = Config::from_cargo_features();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_covers_every_combination_once() {
        let all: heapless::Vec<Config, 32> = Config::matrix().collect();
        assert_eq!(all.len(), usize::from(FEATURE_COMBINATIONS));
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn with_toggles_single_switch() {
        let config = Config::full().with(Features::ERROR_HOOK, false);
        assert!(!config.error_hook());
        assert!(config.extended());
        assert!(config.with(Features::ERROR_HOOK, true).error_hook());
    }

    #[test]
    fn standard_has_no_checking_or_hook() {
        let config = Config::standard();
        assert!(config.tasks() && config.resources() && config.alarms());
        assert!(!config.extended());
        assert!(!config.error_hook());
    }

    #[test]
    fn default_features_enable_everything() {
        if cfg!(all(
            feature = "tasks",
            feature = "resources",
            feature = "alarms",
            feature = "extended-checks",
            feature = "error-hook"
        )) {
            assert_eq!(CONFIG, Config::full());
        }
    }
}
