//! Historical load tracking: carry the prior year's workload forward.
//!
//! Baselines seed the fairness comparison of a new year. Only primary
//! load is compensated for manual edits; backup load carries forward
//! as-is.
//!
//! Sign convention: difference = original − edited. Positive means the
//! employee ended up working LESS than generated and is owed load, so
//! their baseline goes UP and they are picked less often next year.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    counts::LoadCounters,
    error::{ScheduleError, ScheduleResult},
    roster::Roster,
    types::{Employee, RoleCounts},
};

/// Per-employee starting totals for a new year. Never negative.
pub type BaselineCounts = BTreeMap<Employee, RoleCounts>;

/// Per-employee aggregate primary counts for one report.
pub type PrimaryCounts = BTreeMap<Employee, u32>;

/// original − edited primary count per employee.
pub type WorkloadDifference = BTreeMap<Employee, i64>;

/// Everything the tracker consumes from the workload store.
/// Every field may be empty when no history exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadHistory {
    /// The prior year's live report.
    pub prior_year:      LoadCounters,
    /// Primary counts as originally generated.
    pub original_counts: PrimaryCounts,
    /// Primary counts after manual edits.
    pub edited_counts:   PrimaryCounts,
}

/// One entry per employee appearing in the original counts. Employees
/// missing from either side count as 0 there.
pub fn workload_differences(original: &PrimaryCounts, edited: &PrimaryCounts) -> WorkloadDifference {
    original
        .iter()
        .map(|(emp, &orig)| {
            let edit = edited.get(emp).copied().unwrap_or(0);
            (emp.clone(), orig as i64 - edit as i64)
        })
        .collect()
}

/// Compute the new year's baselines for every roster employee.
///
/// With `compensate`, primary = max(prior + difference, 0); otherwise
/// primary = prior. Backup is always the prior backup count.
pub fn compute_baselines(
    roster:      &Roster,
    prior_year:  &LoadCounters,
    differences: &WorkloadDifference,
    compensate:  bool,
) -> ScheduleResult<BaselineCounts> {
    if roster.is_empty() {
        return Err(ScheduleError::EmptyRoster);
    }

    let baselines = roster
        .iter()
        .map(|emp| {
            let prior = prior_year.get(emp).copied().unwrap_or_default();
            let primary = if compensate {
                let diff = differences.get(emp).copied().unwrap_or(0);
                (prior.primary as i64 + diff).clamp(0, u32::MAX as i64) as u32
            } else {
                prior.primary
            };
            (emp.clone(), RoleCounts::new(primary, prior.backup))
        })
        .collect();

    Ok(baselines)
}

/// Differences worth reporting to a user: non-zero entries only.
pub fn notable_differences(differences: &WorkloadDifference) -> impl Iterator<Item = (&Employee, i64)> {
    differences
        .iter()
        .filter(|(_, &d)| d != 0)
        .map(|(e, &d)| (e, d))
}

/// Human-readable summary line for one difference.
pub fn describe_difference(employee: &str, diff: i64) -> String {
    let direction = if diff > 0 { "Worked less" } else { "Worked more" };
    format!("{employee}: {direction} by {} assignments", diff.unsigned_abs())
}
