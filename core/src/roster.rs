//! The ordered employee roster.
//!
//! Order matters only for tie-breaks: the backup assigner sorts stably,
//! so on equal load the earlier roster entry wins. The roster is stored
//! independently of any schedule year.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ScheduleError, ScheduleResult},
    types::Employee,
};

/// Minimum roster size able to fill three distinct roles per day.
pub const MIN_SCHEDULABLE: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    /// Build a roster, validating every name against `reserved_token`.
    pub fn new<I, S>(names: I, reserved_token: &str) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self::default();
        for name in names {
            roster.add(name.into(), reserved_token)?;
        }
        Ok(roster)
    }

    /// Wrap names already validated on the way into the store.
    pub(crate) fn from_stored(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn add(&mut self, name: String, reserved_token: &str) -> ScheduleResult<()> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ScheduleError::InvalidEmployeeName {
                name,
                reason: "name is empty".into(),
            });
        }
        if !reserved_token.is_empty() && name.contains(reserved_token) {
            return Err(ScheduleError::InvalidEmployeeName {
                reason: format!("'{reserved_token}' is reserved for test mode"),
                name,
            });
        }
        if self.contains(&name) {
            return Err(ScheduleError::DuplicateEmployee { name });
        }
        self.employees.push(name);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> ScheduleResult<Employee> {
        let name = name.trim();
        let pos = self
            .employees
            .iter()
            .position(|e| e == name)
            .ok_or_else(|| ScheduleError::EmployeeNotFound { name: name.to_string() })?;
        Ok(self.employees.remove(pos))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.employees.iter().any(|e| e == name)
    }

    /// Look up an employee by the 1-based index shown to users.
    pub fn by_index(&self, index: usize) -> ScheduleResult<&Employee> {
        index
            .checked_sub(1)
            .and_then(|i| self.employees.get(i))
            .ok_or(ScheduleError::UnknownEmployeeIndex {
                index,
                roster_size: self.employees.len(),
            })
    }

    /// Fail unless the roster can fill primary, backup1 and backup2 daily.
    pub fn ensure_schedulable(&self) -> ScheduleResult<()> {
        match self.employees.len() {
            0 => Err(ScheduleError::EmptyRoster),
            n if n < MIN_SCHEDULABLE => Err(ScheduleError::RosterTooSmall { size: n }),
            _ => Ok(()),
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
