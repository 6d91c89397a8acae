//! Daily backup assignment.
//!
//! Runs strictly after the primary plan is complete: every day needs to
//! see tomorrow's primary. For each date, in ascending order:
//!
//!   1. Eligible = roster − today's primary − yesterday's backups
//!                 − tomorrow's primary.
//!   2. Sort eligible by (baseline backup + running backup), stable, so
//!      roster order breaks ties.
//!   3. Backup1 = first eligible whose last backup1 day is more than one
//!      day ago; if none, the least loaded (flagged GapRelaxed).
//!   4. Backup2 = same against what is left, with its own last-day table.
//!   5. If nothing is eligible, take the least-loaded roster member not
//!      already holding a role today (flagged Forced).
//!
//! Flags are soft: generation always completes.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{
    assignment::AssignmentMap,
    error::{ScheduleError, ScheduleResult},
    history::BaselineCounts,
    roster::Roster,
    types::{Employee, Role, Year},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoftFlagKind {
    /// No eligible candidate met the gap rule; least loaded taken anyway.
    GapRelaxed,
    /// Nobody was eligible; adjacency rules ignored.
    Forced,
}

/// A recorded, accepted deviation from the adjacency rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoftFlag {
    pub date:     NaiveDate,
    pub role:     Role,
    pub kind:     SoftFlagKind,
    pub employee: Employee,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupPlan {
    pub backup1: AssignmentMap,
    pub backup2: AssignmentMap,
    /// Backup days (either slot) assigned to each employee this year.
    pub counts:  BTreeMap<Employee, u32>,
    pub flags:   Vec<SoftFlag>,
}

/// Mutable state threaded through the daily loop.
struct BackupContext<'a> {
    baselines:    &'a BaselineCounts,
    plan:         BackupPlan,
    /// Last day each employee held the role. Absent means never this year.
    last_backup1: HashMap<Employee, NaiveDate>,
    last_backup2: HashMap<Employee, NaiveDate>,
}

impl<'a> BackupContext<'a> {
    fn new(roster: &Roster, baselines: &'a BaselineCounts) -> Self {
        Self {
            baselines,
            plan: BackupPlan {
                counts: roster.iter().map(|e| (e.clone(), 0)).collect(),
                ..BackupPlan::default()
            },
            last_backup1: HashMap::new(),
            last_backup2: HashMap::new(),
        }
    }

    fn load(&self, employee: &Employee) -> u64 {
        let base = self.baselines.get(employee).map(|b| b.backup).unwrap_or(0) as u64;
        base + self.plan.counts.get(employee).copied().unwrap_or(0) as u64
    }

    fn last_table(&self, role: Role) -> &HashMap<Employee, NaiveDate> {
        match role {
            Role::Backup2 => &self.last_backup2,
            _ => &self.last_backup1,
        }
    }

    fn yesterday_backups(&self, date: NaiveDate) -> Vec<Employee> {
        date.pred_opt()
            .map(|prev| {
                [self.plan.backup1.get(&prev), self.plan.backup2.get(&prev)]
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fill `role` on `date` from `eligible`, removing the chosen employee.
    fn pick(
        &mut self,
        date:     NaiveDate,
        role:     Role,
        eligible: &mut Vec<Employee>,
        roster:   &Roster,
        taken:    &[&Employee],
    ) -> ScheduleResult<Employee> {
        let chosen = if eligible.is_empty() {
            let forced = roster
                .iter()
                .filter(|e| !taken.contains(e))
                .min_by_key(|e| self.load(e))
                .cloned()
                .ok_or(ScheduleError::RosterTooSmall { size: roster.len() })?;
            self.flag(date, role, SoftFlagKind::Forced, &forced);
            forced
        } else {
            let last = self.last_table(role);
            let gap_ok = eligible.iter().position(|e| {
                last.get(e)
                    .map(|d| *d + Duration::days(1) < date)
                    .unwrap_or(true)
            });
            match gap_ok {
                Some(pos) => eligible.remove(pos),
                None => {
                    let relaxed = eligible.remove(0);
                    self.flag(date, role, SoftFlagKind::GapRelaxed, &relaxed);
                    relaxed
                }
            }
        };

        self.record(date, role, &chosen);
        Ok(chosen)
    }

    fn record(&mut self, date: NaiveDate, role: Role, employee: &Employee) {
        *self.plan.counts.entry(employee.clone()).or_default() += 1;
        let (map, last) = match role {
            Role::Backup2 => (&mut self.plan.backup2, &mut self.last_backup2),
            _ => (&mut self.plan.backup1, &mut self.last_backup1),
        };
        map.insert(date, employee.clone());
        last.insert(employee.clone(), date);
    }

    fn flag(&mut self, date: NaiveDate, role: Role, kind: SoftFlagKind, employee: &Employee) {
        log::warn!("backup: {kind:?} {role} on {date} -> {employee}");
        self.plan.flags.push(SoftFlag {
            date,
            role,
            kind,
            employee: employee.clone(),
        });
    }
}

/// Assign backup1 and backup2 for every date of `primary`.
pub fn assign_backups(
    roster:    &Roster,
    primary:   &AssignmentMap,
    baselines: &BaselineCounts,
    year:      Year,
) -> ScheduleResult<BackupPlan> {
    roster.ensure_schedulable()?;
    let mut ctx = BackupContext::new(roster, baselines);

    for (&date, today_primary) in primary {
        let yesterday = ctx.yesterday_backups(date);
        let next_primary = date.succ_opt().and_then(|next| primary.get(&next));

        let mut eligible: Vec<Employee> = roster
            .iter()
            .filter(|e| *e != today_primary)
            .filter(|e| !yesterday.contains(e))
            .filter(|e| Some(*e) != next_primary)
            .cloned()
            .collect();
        eligible.sort_by_key(|e| ctx.load(e));

        let backup1 = ctx.pick(date, Role::Backup1, &mut eligible, roster, &[today_primary])?;
        ctx.pick(date, Role::Backup2, &mut eligible, roster, &[today_primary, &backup1])?;
    }

    let plan = ctx.plan;
    log::info!(
        "year={year} backup: {} days assigned, {} soft flag(s)",
        plan.backup1.len(),
        plan.flags.len()
    );
    Ok(plan)
}
