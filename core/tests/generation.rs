//! Engine-level generation tests.
//!
//! Tests cover: pre-write validation, overwrite confirmation, soft-flag
//! events, and compensation carried from one year into the next.

use oncall_core::{
    command::{GenerationRequest, ManualEdit},
    engine::ScheduleEngine,
    error::ScheduleError,
    primary::InitialOrder,
    types::Role,
};

fn request(year: i32, seed: u64) -> GenerationRequest {
    GenerationRequest {
        year,
        order: InitialOrder::Seeded(seed),
        compensate: false,
        confirm_overwrite: false,
    }
}

fn engine_with(names: &[&str]) -> ScheduleEngine {
    let engine = ScheduleEngine::build_test().expect("test engine");
    for n in names {
        engine.add_employee(n).expect("add employee");
    }
    engine
}

#[test]
fn empty_roster_aborts_before_any_write() {
    let engine = ScheduleEngine::build_test().unwrap();
    let result = engine.generate(&request(2030, 1));

    assert!(matches!(result, Err(ScheduleError::EmptyRoster)));
    assert!(engine.store.generated_years().unwrap().is_empty());
    assert!(engine.store.events_for_year(2030).unwrap().is_empty());
    assert!(matches!(engine.live_report(2030), Err(ScheduleError::ScheduleNotFound { year: 2030 })));
}

#[test]
fn existing_schedule_requires_confirmation() {
    let engine = engine_with(&["A", "B", "C", "D", "E", "F"]);
    let first = engine.generate(&request(2030, 1)).unwrap();

    let refused = engine.generate(&request(2030, 2));
    assert!(matches!(refused, Err(ScheduleError::ScheduleExists { year: 2030 })));
    assert_eq!(engine.schedule(2030).unwrap(), first.schedule, "refusal must not write");

    let mut confirmed = request(2030, 2);
    confirmed.confirm_overwrite = true;
    let second = engine.generate(&confirmed).unwrap();
    assert_eq!(engine.schedule(2030).unwrap(), second.schedule);
}

#[test]
fn overwrite_discards_edit_history_of_replaced_schedule() {
    let engine = engine_with(&["A", "B", "C", "D", "E", "F"]);
    let first = engine.generate(&request(2030, 1)).unwrap();
    let date = first.weeks[3].week_start;
    engine
        .apply_edits(2030, &[ManualEdit { date, role: Role::Backup1, employee_index: 1 }])
        .unwrap();
    assert_eq!(engine.store.changes_for_year(2030).unwrap().len(), 1);

    let mut confirmed = request(2030, 2);
    confirmed.confirm_overwrite = true;
    engine.generate(&confirmed).unwrap();

    assert!(engine.store.changes_for_year(2030).unwrap().is_empty());
    assert_eq!(engine.store.event_count(2030, "assignment_edited").unwrap(), 0);
    assert_eq!(engine.store.event_count(2030, "report_refreshed").unwrap(), 0);
    assert_eq!(engine.store.event_count(2030, "generation_started").unwrap(), 1);
}

#[test]
fn past_years_are_refused_by_default_config() {
    let mut engine = engine_with(&["A", "B", "C"]);
    engine.config.allow_past_years = false;
    let result = engine.generate(&request(1999, 1));
    assert!(matches!(result, Err(ScheduleError::YearInPast { year: 1999, .. })));
}

#[test]
fn soft_flags_are_logged_as_events() {
    let engine = engine_with(&["A", "B", "C", "D"]);
    let outcome = engine.generate(&request(2030, 3)).unwrap();

    assert!(!outcome.flags.is_empty(), "four people cannot cover a year without forced picks");
    let logged = engine.store.event_count(2030, "soft_constraint_violated").unwrap();
    assert_eq!(logged as usize, outcome.flags.len());
    assert_eq!(engine.store.event_count(2030, "primary_week_assigned").unwrap(), 52);
    assert_eq!(engine.store.event_count(2030, "generation_completed").unwrap(), 1);
}

#[test]
fn uncovered_days_are_reported() {
    let engine = engine_with(&["A", "B", "C", "D", "E", "F"]);
    // 2030 starts on a Tuesday: Jan 1-6 precede the first Monday. The
    // 52nd week starts Dec 30 and is clipped to the year.
    let outcome = engine.generate(&request(2030, 3)).unwrap();
    assert_eq!(outcome.uncovered.len(), 6);
    assert_eq!(outcome.schedule.primary.len(), 359);
    assert_eq!(engine.store.event_count(2030, "days_uncovered").unwrap(), 1);
}

#[test]
fn compensation_restores_edited_primary_load() {
    let engine = engine_with(&["A", "B", "C", "D", "E", "F"]);
    let first = engine.generate(&request(2030, 8)).unwrap();

    // Move one full primary week from its owner to someone else.
    let week = &first.weeks[10];
    let owner = week.employee.clone();
    let roster = engine.roster().unwrap();
    let (taker_index, taker) = roster
        .iter()
        .enumerate()
        .find(|(_, e)| **e != owner)
        .map(|(i, e)| (i + 1, e.clone()))
        .unwrap();
    let edits: Vec<ManualEdit> = (0..7)
        .map(|i| ManualEdit {
            date: week.week_start + chrono::Duration::days(i),
            role: Role::Primary,
            employee_index: taker_index,
        })
        .collect();
    engine.apply_edits(2030, &edits).unwrap();

    let diffs = engine.pending_differences(2031).unwrap();
    assert_eq!(diffs[&owner], 7, "owner worked 7 days less than generated");
    assert_eq!(diffs[&taker], -7, "taker worked 7 days more than generated");

    let original = engine.original_report(2030).unwrap();
    let original_owner = original.get(&owner).unwrap().primary_count;
    let original_taker = original.get(&taker).unwrap().primary_count;

    let mut plain = request(2031, 8);
    plain.compensate = false;
    let uncompensated = engine.generate(&plain).unwrap();
    assert_eq!(uncompensated.baselines[&owner].primary, original_owner - 7);
    assert_eq!(uncompensated.baselines[&taker].primary, original_taker + 7);

    let mut comp = request(2031, 8);
    comp.compensate = true;
    comp.confirm_overwrite = true;
    let compensated = engine.generate(&comp).unwrap();
    assert_eq!(compensated.baselines[&owner].primary, original_owner);
    assert_eq!(compensated.baselines[&taker].primary, original_taker);

    // Backups are carried forward uncompensated.
    let live = engine.live_report(2030).unwrap();
    assert_eq!(compensated.baselines[&owner].backup, live.get(&owner).unwrap().backup_count);
}
