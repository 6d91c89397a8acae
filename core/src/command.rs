use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    primary::InitialOrder,
    types::{Role, Year},
};

/// Every operation a caller can request of the engine.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ScheduleCommand {
    // ── Roster ────────────────────────────────────
    AddEmployee { name: String },
    RemoveEmployee { name: String },
    ListEmployees,
    LoadDemoRoster,

    // ── Generation ────────────────────────────────
    Generate(GenerationRequest),

    // ── Reports ───────────────────────────────────
    ViewReport { year: Year },
    ViewDifferences { year: Year },
    ListYears,

    // ── Edits ─────────────────────────────────────
    ViewDays { year: Year, range: String },
    Edit { year: Year, edits: Vec<ManualEdit> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub year:              Year,
    pub order:             InitialOrder,
    /// Add last year's edit differences to the primary baselines.
    #[serde(default)]
    pub compensate:        bool,
    /// Required to replace an existing schedule for `year`.
    #[serde(default)]
    pub confirm_overwrite: bool,
}

/// Reassign one role on one date to the employee at a 1-based roster index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManualEdit {
    pub date:           NaiveDate,
    pub role:           Role,
    pub employee_index: usize,
}
