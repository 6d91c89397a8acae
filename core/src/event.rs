//! The generation and edit event log.
//!
//! Every generation and every manual edit leaves a trail of events in
//! `event_log`. Soft constraint violations are recorded here so they stay
//! observable after the run that produced them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    backup::SoftFlagKind,
    counts::ReportKind,
    types::{Employee, Role, Year},
};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleEvent {
    // ── Generation ─────────────────────────────────
    GenerationStarted {
        year:        Year,
        seed:        Option<u64>,
        roster_size: usize,
        compensated: bool,
    },
    BaselinesComputed {
        year:                 Year,
        nonzero_differences:  usize,
    },
    PrimaryWeekAssigned {
        year:       Year,
        week_start: NaiveDate,
        employee:   Employee,
    },
    DaysUncovered {
        year:  Year,
        count: usize,
        first: NaiveDate,
        last:  NaiveDate,
    },
    SoftConstraintViolated {
        year:     Year,
        date:     NaiveDate,
        role:     Role,
        kind:     SoftFlagKind,
        employee: Employee,
    },
    GenerationCompleted {
        year:           Year,
        scheduled_days: usize,
        soft_flags:     usize,
    },

    // ── Manual edits ───────────────────────────────
    AssignmentEdited {
        year:         Year,
        change_id:    String,
        date:         NaiveDate,
        role:         Role,
        old_employee: Option<Employee>,
        new_employee: Employee,
    },
    ReportRefreshed {
        year: Year,
        kind: ReportKind,
    },
}

impl ScheduleEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::GenerationStarted { .. }      => "generation_started",
            Self::BaselinesComputed { .. }      => "baselines_computed",
            Self::PrimaryWeekAssigned { .. }    => "primary_week_assigned",
            Self::DaysUncovered { .. }          => "days_uncovered",
            Self::SoftConstraintViolated { .. } => "soft_constraint_violated",
            Self::GenerationCompleted { .. }    => "generation_completed",
            Self::AssignmentEdited { .. }       => "assignment_edited",
            Self::ReportRefreshed { .. }        => "report_refreshed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub year:       Year,
    pub event_type: String,
    pub payload:    String, // JSON-serialized ScheduleEvent
}
