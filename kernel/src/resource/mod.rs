//! Resource Objects
//!
//! Resources implement the OSEK priority ceiling protocol. Each resource
//! has a ceiling priority equal to the highest base priority among the
//! tasks allowed to lock it, and at most one owner at a time.
//!
//! Invariant: an owner, when set, always has a base priority not above
//! the ceiling of the resource it owns.

#![deny(missing_docs)]

use static_assertions::const_assert;

use crate::task::{Priority, TaskId};

/// Maximum number of resources in a static configuration
pub const MAX_RESOURCES: usize = 64;

const_assert!(MAX_RESOURCES <= i32::MAX as usize);

/// Resource identifier. `-1` is reserved for "no resource".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(i32);

impl ResourceId {
    /// Reserved "no resource" identifier
    pub const NONE: ResourceId = ResourceId(-1);

    /// Create a new resource ID
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Whether this is the reserved "no resource" value
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Table index, `None` for negative identifiers
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

/// Resource descriptor as exposed by the resource table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Highest base priority of any task allowed to lock the resource
    pub ceiling_priority: Priority,
    /// Task currently holding the resource
    pub owner: Option<TaskId>,
}

impl ResourceDescriptor {
    /// Create a free resource
    pub const fn new(ceiling_priority: Priority) -> Self {
        Self {
            ceiling_priority,
            owner: None,
        }
    }

    /// Whether some task holds the resource
    pub const fn is_taken(&self) -> bool {
        self.owner.is_some()
    }

    /// Whether a task of `priority` may lock this resource
    pub fn admits(&self, priority: Priority) -> bool {
        priority <= self.ceiling_priority
    }
}
