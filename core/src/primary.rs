//! Weekly primary assignment.
//!
//! One primary per calendar week, chosen greedily as the least-loaded
//! employee (baseline + running count). Ties go to whoever is earliest in
//! the rotation queue; the chosen employee moves to the back of the queue.
//! With equal baselines any two employees end within one week of each other.
//!
//! KNOWN GAP: the week count is a policy input (52 by default). Days before
//! the first Monday, and days after the last scheduled week in years that
//! need a 53rd week, are left unscheduled and reported in `uncovered`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::{
    assignment::AssignmentMap,
    calendar,
    error::{ScheduleError, ScheduleResult},
    history::BaselineCounts,
    rng::{RngBank, StreamSlot},
    roster::Roster,
    types::{Employee, Year},
};

/// How the rotation queue is ordered before the first week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", content = "seed", rename_all = "snake_case")]
pub enum InitialOrder {
    /// Deterministic shuffle of the roster from this master seed.
    Seeded(u64),
    /// Roster order, no shuffle.
    Fixed,
}

impl InitialOrder {
    pub fn seed(&self) -> Option<u64> {
        match self {
            Self::Seeded(seed) => Some(*seed),
            Self::Fixed => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekAssignment {
    pub week_start: NaiveDate,
    pub employee:   Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryPlan {
    /// Rotation queue order before week 1.
    pub initial_order: Vec<Employee>,
    pub weeks:         Vec<WeekAssignment>,
    /// Every in-year day of the scheduled weeks.
    pub dates:         AssignmentMap,
    /// Weeks assigned to each employee this year.
    pub counts:        BTreeMap<Employee, u32>,
    /// Days of the year with no primary.
    pub uncovered:     Vec<NaiveDate>,
}

/// FIFO rotation queue used to break ties.
struct RotationQueue {
    queue: VecDeque<Employee>,
}

impl RotationQueue {
    fn new(order: Vec<Employee>) -> Self {
        Self { queue: order.into() }
    }

    /// Pop the least-loaded employee (earliest in queue on ties) and push
    /// it to the back.
    fn take_least_loaded(&mut self, load: impl Fn(&Employee) -> u64) -> Option<Employee> {
        let pos = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(i, e)| (load(e), *i))
            .map(|(i, _)| i)?;
        let chosen = self.queue.remove(pos)?;
        self.queue.push_back(chosen.clone());
        Some(chosen)
    }
}

/// Build the starting rotation order.
pub fn initial_rotation(roster: &Roster, order: InitialOrder) -> Vec<Employee> {
    let mut rotation = roster.employees().to_vec();
    if let InitialOrder::Seeded(seed) = order {
        RngBank::new(seed)
            .for_stream(StreamSlot::PrimaryRotation)
            .shuffle(&mut rotation);
    }
    rotation
}

/// Assign one primary per week for `weeks` weeks from the first Monday of
/// `year`, then expand to a date map clipped to the year.
pub fn assign_primaries(
    roster:    &Roster,
    baselines: &BaselineCounts,
    year:      Year,
    weeks:     u32,
    order:     InitialOrder,
) -> ScheduleResult<PrimaryPlan> {
    if roster.is_empty() {
        return Err(ScheduleError::EmptyRoster);
    }

    let initial_order = initial_rotation(roster, order);
    let mut queue = RotationQueue::new(initial_order.clone());
    let mut counts: BTreeMap<Employee, u32> =
        roster.iter().map(|e| (e.clone(), 0)).collect();

    let mut week_plan = Vec::with_capacity(weeks as usize);
    let mut dates = AssignmentMap::new();

    for week_start in calendar::week_starts(year, weeks)? {
        let chosen = queue
            .take_least_loaded(|e| {
                let base = baselines.get(e).map(|b| b.primary).unwrap_or(0) as u64;
                base + counts.get(e).copied().unwrap_or(0) as u64
            })
            .ok_or(ScheduleError::EmptyRoster)?;

        *counts.entry(chosen.clone()).or_default() += 1;
        for day in calendar::days_of_week_in_year(week_start, year) {
            dates.insert(day, chosen.clone());
        }
        log::debug!("year={year} primary: week of {week_start} -> {chosen}");
        week_plan.push(WeekAssignment { week_start, employee: chosen });
    }

    let uncovered = uncovered_days(year, &dates)?;
    if !uncovered.is_empty() {
        log::warn!(
            "year={year} primary: {} day(s) left unscheduled by the {weeks}-week policy",
            uncovered.len()
        );
    }

    Ok(PrimaryPlan {
        initial_order,
        weeks: week_plan,
        dates,
        counts,
        uncovered,
    })
}

fn uncovered_days(year: Year, dates: &AssignmentMap) -> ScheduleResult<Vec<NaiveDate>> {
    let jan1 = calendar::year_start(year)?;
    Ok(jan1
        .iter_days()
        .take_while(|d| d.year() == year)
        .filter(|d| !dates.contains_key(d))
        .collect())
}
