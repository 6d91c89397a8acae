//! Weekly primary assigner tests.
//!
//! Tests cover: least-loaded selection, rotation tie-breaks, baseline skew,
//! the 52-week calendar policy and its uncovered days.

use chrono::NaiveDate;
use oncall_core::{
    history::BaselineCounts,
    primary::{assign_primaries, InitialOrder},
    roster::Roster,
    types::RoleCounts,
};

fn roster(names: &[&str]) -> Roster {
    Roster::new(names.iter().copied(), "devintest").expect("valid roster")
}

fn zero_baselines(roster: &Roster) -> BaselineCounts {
    roster.iter().map(|e| (e.clone(), RoleCounts::default())).collect()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn fixed_order_rotates_round_robin() {
    let r = roster(&["A", "B", "C", "D"]);
    let plan = assign_primaries(&r, &zero_baselines(&r), 2025, 8, InitialOrder::Fixed).unwrap();

    let order: Vec<&str> = plan.weeks.iter().map(|w| w.employee.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C", "D", "A", "B", "C", "D"]);
    assert_eq!(plan.weeks[0].week_start, d(2025, 1, 6));
}

#[test]
fn baseline_skew_delays_loaded_employee() {
    let r = roster(&["A", "B", "C", "D"]);
    let mut baselines = zero_baselines(&r);
    baselines.insert("A".into(), RoleCounts::new(2, 0));

    let plan = assign_primaries(&r, &baselines, 2025, 7, InitialOrder::Fixed).unwrap();
    let order: Vec<&str> = plan.weeks.iter().map(|w| w.employee.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "D", "B", "C", "D", "A"]);
}

#[test]
fn full_year_is_fair_within_one_week() {
    for seed in [1u64, 42, 0xDEAD_BEEF, 9_999_999] {
        for size in [3usize, 5, 7, 18] {
            let names: Vec<String> = (0..size).map(|i| format!("Employee {i}")).collect();
            let r = Roster::new(names, "devintest").unwrap();
            let plan =
                assign_primaries(&r, &zero_baselines(&r), 2026, 52, InitialOrder::Seeded(seed)).unwrap();

            let max = plan.counts.values().max().copied().unwrap();
            let min = plan.counts.values().min().copied().unwrap();
            assert!(
                max - min <= 1,
                "seed {seed}, roster {size}: primary counts spread {min}..{max}"
            );
            assert_eq!(plan.counts.values().sum::<u32>(), 52);
        }
    }
}

#[test]
fn primary_is_constant_within_each_week() {
    let r = roster(&["A", "B", "C", "D", "E"]);
    let plan = assign_primaries(&r, &zero_baselines(&r), 2026, 52, InitialOrder::Seeded(7)).unwrap();

    for week in &plan.weeks {
        for offset in 0..7 {
            let day = week.week_start + chrono::Duration::days(offset);
            if let Some(emp) = plan.dates.get(&day) {
                assert_eq!(emp, &week.employee, "primary changed mid-week on {day}");
            }
        }
    }
}

#[test]
fn fifty_two_weeks_leave_edges_uncovered() {
    let r = roster(&["A", "B", "C"]);

    // 2025 starts on a Wednesday: Jan 1-5 precede the first Monday.
    let plan = assign_primaries(&r, &zero_baselines(&r), 2025, 52, InitialOrder::Fixed).unwrap();
    assert_eq!(plan.dates.len(), 360);
    assert_eq!(
        plan.uncovered,
        vec![d(2025, 1, 1), d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 4), d(2025, 1, 5)]
    );
    assert_eq!(plan.dates.keys().last().copied(), Some(d(2025, 12, 31)));

    // 2024 starts on a Monday and is a leap year: Dec 30-31 need a 53rd week.
    let plan = assign_primaries(&r, &zero_baselines(&r), 2024, 52, InitialOrder::Fixed).unwrap();
    assert_eq!(plan.dates.len(), 364);
    assert_eq!(plan.uncovered, vec![d(2024, 12, 30), d(2024, 12, 31)]);
}

#[test]
fn seeded_order_is_reproducible() {
    let r = roster(&["A", "B", "C", "D", "E", "F"]);
    let a = assign_primaries(&r, &zero_baselines(&r), 2026, 52, InitialOrder::Seeded(31337)).unwrap();
    let b = assign_primaries(&r, &zero_baselines(&r), 2026, 52, InitialOrder::Seeded(31337)).unwrap();
    assert_eq!(a.initial_order, b.initial_order);
    assert_eq!(a.weeks, b.weeks);
}

#[test]
fn empty_roster_is_rejected() {
    let r = Roster::default();
    let result = assign_primaries(&r, &BaselineCounts::new(), 2026, 52, InitialOrder::Fixed);
    assert!(matches!(result, Err(oncall_core::error::ScheduleError::EmptyRoster)));
}
