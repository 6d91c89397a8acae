//! Count recomputation: rebuild aggregate workload from assignment maps.
//!
//! A pure fold over the maps. Recomputing from the same schedule always
//! yields the same counters regardless of traversal order, so it is safe
//! to call after generation and again after every manual edit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    assignment::{AssignmentMap, Schedule},
    history::PrimaryCounts,
    roster::Roster,
    types::{Employee, RoleCounts, Year},
};

/// Per-employee (primary, backup) totals for one year.
pub type LoadCounters = BTreeMap<Employee, RoleCounts>;

/// Count every role occurrence for roster employees. Names in the maps
/// that are not on the roster (e.g. removed employees) are skipped.
pub fn recompute_counts(roster: &Roster, schedule: &Schedule) -> LoadCounters {
    let mut counters: LoadCounters = roster
        .iter()
        .map(|e| (e.clone(), RoleCounts::default()))
        .collect();

    fold_role(&mut counters, &schedule.primary, |c| &mut c.primary);
    fold_role(&mut counters, &schedule.backup1, |c| &mut c.backup);
    fold_role(&mut counters, &schedule.backup2, |c| &mut c.backup);

    counters
}

fn fold_role(
    counters: &mut LoadCounters,
    map:      &AssignmentMap,
    field:    impl Fn(&mut RoleCounts) -> &mut u32,
) {
    for (date, employee) in map {
        match counters.get_mut(employee) {
            Some(c) => *field(c) += 1,
            None => log::debug!("counts: skipping {employee} on {date}, not on roster"),
        }
    }
}

/// Project counters onto their primary component.
pub fn primary_counts(counters: &LoadCounters) -> PrimaryCounts {
    counters.iter().map(|(e, c)| (e.clone(), c.primary)).collect()
}

/// Which of the two per-year reports a row belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Snapshot taken at generation. Never modified by edits.
    Original,
    /// Refreshed after every manual edit.
    Live,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Live => "live",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRow {
    pub employee:      Employee,
    pub primary_count: u32,
    pub backup_count:  u32,
}

/// An aggregate report, rows in roster order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub year: Year,
    pub kind: ReportKind,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn from_counters(year: Year, kind: ReportKind, roster: &Roster, counters: &LoadCounters) -> Self {
        let rows = roster
            .iter()
            .map(|e| {
                let c = counters.get(e).copied().unwrap_or_default();
                ReportRow {
                    employee:      e.clone(),
                    primary_count: c.primary,
                    backup_count:  c.backup,
                }
            })
            .collect();
        Self { year, kind, rows }
    }

    pub fn counters(&self) -> LoadCounters {
        self.rows
            .iter()
            .map(|r| (r.employee.clone(), RoleCounts::new(r.primary_count, r.backup_count)))
            .collect()
    }

    pub fn primary_counts(&self) -> PrimaryCounts {
        self.rows.iter().map(|r| (r.employee.clone(), r.primary_count)).collect()
    }

    pub fn get(&self, employee: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.employee == employee)
    }
}
