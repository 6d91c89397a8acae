//! Shared primitive types used across the entire scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An employee is identified by their display name. Names are unique
/// within a roster.
pub type Employee = String;

/// A calendar year being scheduled.
pub type Year = i32;

/// The three on-call roles filled every scheduled day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Primary,
    Backup1,
    Backup2,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Primary, Role::Backup1, Role::Backup2];

    /// Stable column value used by the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Backup1 => "backup1",
            Self::Backup2 => "backup2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "p" | "1" => Some(Self::Primary),
            "backup1" | "b1" | "2" => Some(Self::Backup1),
            "backup2" | "b2" | "3" => Some(Self::Backup2),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Primary => "Primary",
            Self::Backup1 => "Backup 1",
            Self::Backup2 => "Backup 2",
        };
        f.write_str(label)
    }
}

/// Per-employee workload totals. Backup1 and backup2 share one counter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleCounts {
    pub primary: u32,
    pub backup:  u32,
}

impl RoleCounts {
    pub fn new(primary: u32, backup: u32) -> Self {
        Self { primary, backup }
    }
}
