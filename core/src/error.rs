use chrono::NaiveDate;
use thiserror::Error;

use crate::types::Year;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Employee list is empty. Add employees first.")]
    EmptyRoster,

    #[error("At least 3 employees are required to fill primary, backup 1 and backup 2 (have {size})")]
    RosterTooSmall { size: usize },

    #[error("Invalid employee name '{name}': {reason}")]
    InvalidEmployeeName { name: String, reason: String },

    #[error("Employee '{name}' already exists")]
    DuplicateEmployee { name: String },

    #[error("Employee '{name}' not found")]
    EmployeeNotFound { name: String },

    #[error("'{input}' is not a valid year")]
    InvalidYear { input: String },

    #[error("Year {year} is in the past (current year is {current}); enter a valid future year")]
    YearInPast { year: Year, current: Year },

    #[error("A schedule for {year} already exists; overwrite must be confirmed")]
    ScheduleExists { year: Year },

    #[error("No schedule data available for {year}. Generate schedule first.")]
    ScheduleNotFound { year: Year },

    #[error("Invalid date format '{input}': expected YYYY-MM-DD or YYYY-MM-DD to YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("No schedule entries found between {start} and {end}")]
    NoAssignmentsInRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid selection: employee #{index} (roster has {roster_size} employees)")]
    UnknownEmployeeIndex { index: usize, roster_size: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
