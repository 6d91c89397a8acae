//! Date-indexed assignment maps, one per role.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Employee, Role};

/// Date → employee for a single role. Keys are unique dates.
pub type AssignmentMap = BTreeMap<NaiveDate, Employee>;

/// One structured (date, role, employee) record, the unit the store
/// persists and the runner exchanges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub date:     NaiveDate,
    pub role:     Role,
    pub employee: Employee,
}

/// The three roles for one day, as shown to a user editing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayAssignment {
    pub date:    NaiveDate,
    pub primary: Option<Employee>,
    pub backup1: Option<Employee>,
    pub backup2: Option<Employee>,
}

/// A full schedule: the primary, backup1 and backup2 maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub primary: AssignmentMap,
    pub backup1: AssignmentMap,
    pub backup2: AssignmentMap,
}

impl Schedule {
    pub fn map(&self, role: Role) -> &AssignmentMap {
        match role {
            Role::Primary => &self.primary,
            Role::Backup1 => &self.backup1,
            Role::Backup2 => &self.backup2,
        }
    }

    pub fn map_mut(&mut self, role: Role) -> &mut AssignmentMap {
        match role {
            Role::Primary => &mut self.primary,
            Role::Backup1 => &mut self.backup1,
            Role::Backup2 => &mut self.backup2,
        }
    }

    pub fn get(&self, date: NaiveDate, role: Role) -> Option<&Employee> {
        self.map(role).get(&date)
    }

    /// Replace the holder of `role` on `date`, returning the previous one.
    pub fn set(&mut self, date: NaiveDate, role: Role, employee: Employee) -> Option<Employee> {
        self.map_mut(role).insert(date, employee)
    }

    /// A date is scheduled when it has a primary.
    pub fn is_scheduled(&self, date: NaiveDate) -> bool {
        self.primary.contains_key(&date)
    }

    /// Scheduled dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.primary.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.backup1.is_empty() && self.backup2.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> DayAssignment {
        DayAssignment {
            date,
            primary: self.primary.get(&date).cloned(),
            backup1: self.backup1.get(&date).cloned(),
            backup2: self.backup2.get(&date).cloned(),
        }
    }

    /// Flatten into records ordered by date, then role.
    pub fn records(&self) -> Vec<AssignmentRecord> {
        let mut records: Vec<AssignmentRecord> = Role::ALL
            .iter()
            .flat_map(|&role| {
                self.map(role).iter().map(move |(date, employee)| AssignmentRecord {
                    date: *date,
                    role,
                    employee: employee.clone(),
                })
            })
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.role.cmp(&b.role)));
        records
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AssignmentRecord>,
    {
        let mut schedule = Self::default();
        for r in records {
            schedule.set(r.date, r.role, r.employee);
        }
        schedule
    }
}
