//! Historical load tracker tests.
//!
//! Tests cover: difference sign convention, compensation clamping,
//! backup pass-through, and defaults for missing history.

use oncall_core::{
    counts::LoadCounters,
    error::ScheduleError,
    history::{compute_baselines, workload_differences, PrimaryCounts, WorkloadDifference},
    roster::Roster,
    types::RoleCounts,
};

fn counts(pairs: &[(&str, u32)]) -> PrimaryCounts {
    pairs.iter().map(|(e, c)| (e.to_string(), *c)).collect()
}

fn prior(rows: &[(&str, u32, u32)]) -> LoadCounters {
    rows.iter()
        .map(|(e, p, b)| (e.to_string(), RoleCounts::new(*p, *b)))
        .collect()
}

#[test]
fn difference_is_original_minus_edited() {
    let original = counts(&[("A", 13), ("B", 13), ("C", 12)]);
    let edited = counts(&[("A", 11), ("B", 15)]);

    let diff = workload_differences(&original, &edited);
    assert_eq!(diff["A"], 2, "A worked less, positive difference");
    assert_eq!(diff["B"], -2, "B worked more, negative difference");
    assert_eq!(diff["C"], 12, "missing edited count defaults to 0");
    assert_eq!(diff.len(), 3);
}

#[test]
fn only_employees_in_original_counts_get_a_difference() {
    let diff = workload_differences(&counts(&[("A", 1)]), &counts(&[("A", 1), ("Z", 9)]));
    assert_eq!(diff.len(), 1);
    assert_eq!(diff["A"], 0);
}

#[test]
fn compensation_adds_difference_to_primary_only() {
    let roster = Roster::new(["A", "B"], "devintest").unwrap();
    let prior = prior(&[("A", 11, 40), ("B", 15, 38)]);
    let diff: WorkloadDifference = [("A".to_string(), 2), ("B".to_string(), -2)].into();

    let b = compute_baselines(&roster, &prior, &diff, true).unwrap();
    assert_eq!(b["A"], RoleCounts::new(13, 40));
    assert_eq!(b["B"], RoleCounts::new(13, 38));

    let b = compute_baselines(&roster, &prior, &diff, false).unwrap();
    assert_eq!(b["A"], RoleCounts::new(11, 40));
    assert_eq!(b["B"], RoleCounts::new(15, 38));
}

#[test]
fn compensation_never_goes_negative() {
    let roster = Roster::new(["A", "B", "C"], "devintest").unwrap();
    let prior = prior(&[("A", 3, 0), ("B", 0, 0)]);
    let diff: WorkloadDifference = [
        ("A".to_string(), -10),
        ("B".to_string(), i64::MIN / 2),
        ("C".to_string(), -1),
    ]
    .into();

    let b = compute_baselines(&roster, &prior, &diff, true).unwrap();
    for (emp, c) in &b {
        assert_eq!(c.primary, 0, "{emp} baseline should clamp at 0, got {}", c.primary);
    }
}

#[test]
fn missing_history_means_zero_baselines() {
    let roster = Roster::new(["A", "B", "C"], "devintest").unwrap();
    let b = compute_baselines(&roster, &LoadCounters::new(), &WorkloadDifference::new(), true).unwrap();
    assert_eq!(b.len(), 3);
    assert!(b.values().all(|c| *c == RoleCounts::default()));
}

#[test]
fn former_employees_in_history_are_ignored() {
    let roster = Roster::new(["A"], "devintest").unwrap();
    let prior = prior(&[("A", 5, 5), ("Gone", 9, 9)]);
    let b = compute_baselines(&roster, &prior, &WorkloadDifference::new(), false).unwrap();
    assert_eq!(b.len(), 1);
    assert_eq!(b["A"], RoleCounts::new(5, 5));
}

#[test]
fn empty_roster_fails() {
    let result = compute_baselines(
        &Roster::default(),
        &LoadCounters::new(),
        &WorkloadDifference::new(),
        true,
    );
    assert!(matches!(result, Err(ScheduleError::EmptyRoster)));
}
