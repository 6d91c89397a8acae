//! The schedule engine: orchestrates generation and manual edits.
//!
//! GENERATION ORDER (fixed, never interleaved):
//!   1. Validate roster, year and overwrite confirmation (no writes yet).
//!   2. Historical load tracker: prior-year report + edit differences.
//!   3. Weekly primary assigner.
//!   4. Daily backup assigner (needs the complete primary map).
//!   5. Count recomputation → original snapshot + live report.
//!   6. Persist schedule, reports, generation row and event log in one
//!      transaction, replacing the year's earlier change and event logs.
//!
//! RULES:
//!   - Every validation failure is raised before the first write; a
//!     failed write rolls back the whole generation or edit batch.
//!   - The original report is written only by generation; edits refresh
//!     the live report and never touch it.
//!   - All randomness flows through the RngBank via InitialOrder.

use serde::{Deserialize, Serialize};

use crate::{
    assignment::{DayAssignment, Schedule},
    backup::{self, SoftFlag},
    calendar,
    command::{GenerationRequest, ManualEdit, ScheduleCommand},
    config::SchedulerConfig,
    counts::{self, Report, ReportKind},
    error::{ScheduleError, ScheduleResult},
    event::ScheduleEvent,
    history::{self, BaselineCounts, WorkloadDifference, WorkloadHistory},
    primary::{self, WeekAssignment},
    roster::Roster,
    store::{ScheduleChange, ScheduleStore},
    types::{Employee, Year},
};

pub struct ScheduleEngine {
    pub store:  ScheduleStore,
    pub config: SchedulerConfig,
}

/// Everything produced by one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub year:            Year,
    pub schedule:        Schedule,
    pub weeks:           Vec<WeekAssignment>,
    pub baselines:       BaselineCounts,
    pub differences:     WorkloadDifference,
    pub flags:           Vec<SoftFlag>,
    pub uncovered:       Vec<chrono::NaiveDate>,
    pub original_report: Report,
    pub live_report:     Report,
}

/// Compact view of a generation for runners and IPC clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub year:           Year,
    pub scheduled_days: usize,
    pub uncovered_days: usize,
    pub soft_flags:     usize,
    pub report:         Report,
}

impl From<&GenerationOutcome> for GenerationSummary {
    fn from(o: &GenerationOutcome) -> Self {
        Self {
            year:           o.year,
            scheduled_days: o.schedule.primary.len(),
            uncovered_days: o.uncovered.len(),
            soft_flags:     o.flags.len(),
            report:         o.live_report.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    pub changes:     Vec<ScheduleChange>,
    pub live_report: Report,
}

/// Result of a dispatched ScheduleCommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    Roster { employees: Vec<Employee> },
    Generated(GenerationSummary),
    Report(Report),
    Differences { year: Year, differences: WorkloadDifference },
    Years { years: Vec<Year> },
    Days { days: Vec<DayAssignment> },
    Edited(EditOutcome),
}

impl ScheduleEngine {
    pub fn new(store: ScheduleStore, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    /// In-memory engine with test config. Used by integration tests.
    pub fn build_test() -> ScheduleResult<Self> {
        let store = ScheduleStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, SchedulerConfig::default_test()))
    }

    // ── Roster ─────────────────────────────────────────────────

    pub fn roster(&self) -> ScheduleResult<Roster> {
        self.store.load_roster()
    }

    pub fn add_employee(&self, name: &str) -> ScheduleResult<Roster> {
        let mut roster = self.store.load_roster()?;
        roster.add(name.to_string(), &self.config.reserved_token)?;
        self.store.save_roster(&roster)?;
        log::info!("roster: added {}", name.trim());
        Ok(roster)
    }

    pub fn remove_employee(&self, name: &str) -> ScheduleResult<Roster> {
        let mut roster = self.store.load_roster()?;
        let removed = roster.remove(name)?;
        self.store.save_roster(&roster)?;
        log::info!("roster: removed {removed}");
        Ok(roster)
    }

    /// Replace the roster with the configured demo employees. The demo
    /// names bypass the reserved-token check that guards user input.
    pub fn load_demo_roster(&self) -> ScheduleResult<Roster> {
        let roster = Roster::new(self.config.demo_roster.iter().cloned(), "")?;
        self.store.save_roster(&roster)?;
        log::info!("roster: test mode activated with {} employees", roster.len());
        Ok(roster)
    }

    // ── History ────────────────────────────────────────────────

    /// Workload data carried into `year`: the previous year's live report
    /// and its original-vs-live primary counts. Empty when absent.
    pub fn workload_history(&self, year: Year) -> ScheduleResult<WorkloadHistory> {
        let prior = year - 1;
        let live = self.store.load_report(prior, ReportKind::Live)?;
        let original = self.store.load_report(prior, ReportKind::Original)?;
        Ok(WorkloadHistory {
            prior_year:      live.as_ref().map(Report::counters).unwrap_or_default(),
            original_counts: original.as_ref().map(Report::primary_counts).unwrap_or_default(),
            edited_counts:   live.as_ref().map(Report::primary_counts).unwrap_or_default(),
        })
    }

    /// Differences a generation of `year` would offer to compensate.
    pub fn pending_differences(&self, year: Year) -> ScheduleResult<WorkloadDifference> {
        let h = self.workload_history(year)?;
        Ok(history::workload_differences(&h.original_counts, &h.edited_counts))
    }

    // ── Generation ─────────────────────────────────────────────

    pub fn generate(&self, request: &GenerationRequest) -> ScheduleResult<GenerationOutcome> {
        let year = request.year;
        let roster = self.store.load_roster()?;
        roster.ensure_schedulable()?;
        self.validate_year(year)?;
        if !request.confirm_overwrite && self.store.schedule_exists(year)? {
            return Err(ScheduleError::ScheduleExists { year });
        }

        let weeks = self.config.weeks_per_year;
        let seed = request.order.seed();
        log::info!(
            "year={year} generating: {} employees, {weeks} weeks, seed={seed:?}, compensate={}",
            roster.len(),
            request.compensate
        );

        let history = self.workload_history(year)?;
        let differences =
            history::workload_differences(&history.original_counts, &history.edited_counts);
        for (emp, diff) in history::notable_differences(&differences) {
            log::info!("year={year} history: {}", history::describe_difference(emp, diff));
        }
        let baselines = history::compute_baselines(
            &roster,
            &history.prior_year,
            &differences,
            request.compensate,
        )?;

        let primary_plan = primary::assign_primaries(&roster, &baselines, year, weeks, request.order)?;
        let backup_plan = backup::assign_backups(&roster, &primary_plan.dates, &baselines, year)?;

        let schedule = Schedule {
            primary: primary_plan.dates,
            backup1: backup_plan.backup1,
            backup2: backup_plan.backup2,
        };
        let counters = counts::recompute_counts(&roster, &schedule);
        let original_report = Report::from_counters(year, ReportKind::Original, &roster, &counters);
        let live_report = Report::from_counters(year, ReportKind::Live, &roster, &counters);

        let mut events = vec![
            ScheduleEvent::GenerationStarted {
                year,
                seed,
                roster_size: roster.len(),
                compensated: request.compensate,
            },
            ScheduleEvent::BaselinesComputed {
                year,
                nonzero_differences: history::notable_differences(&differences).count(),
            },
        ];
        events.extend(primary_plan.weeks.iter().map(|w| ScheduleEvent::PrimaryWeekAssigned {
            year,
            week_start: w.week_start,
            employee:   w.employee.clone(),
        }));
        if let (Some(first), Some(last)) = (primary_plan.uncovered.first(), primary_plan.uncovered.last()) {
            events.push(ScheduleEvent::DaysUncovered {
                year,
                count: primary_plan.uncovered.len(),
                first: *first,
                last:  *last,
            });
        }
        events.extend(backup_plan.flags.iter().map(|f| ScheduleEvent::SoftConstraintViolated {
            year,
            date:     f.date,
            role:     f.role,
            kind:     f.kind,
            employee: f.employee.clone(),
        }));
        events.push(ScheduleEvent::GenerationCompleted {
            year,
            scheduled_days: schedule.primary.len(),
            soft_flags:     backup_plan.flags.len(),
        });

        self.store.in_transaction(|store| {
            store.clear_year_history(year)?;
            store.save_schedule(year, &schedule)?;
            store.save_report(&original_report)?;
            store.save_report(&live_report)?;
            store.record_generation(year, seed, request.compensate, weeks)?;
            for event in &events {
                store.append_event(year, event)?;
            }
            Ok(())
        })?;

        log::info!(
            "year={year} generated: {} days scheduled, {} uncovered, {} soft flag(s)",
            schedule.primary.len(),
            primary_plan.uncovered.len(),
            backup_plan.flags.len()
        );

        Ok(GenerationOutcome {
            year,
            schedule,
            weeks: primary_plan.weeks,
            baselines,
            differences,
            flags: backup_plan.flags,
            uncovered: primary_plan.uncovered,
            original_report,
            live_report,
        })
    }

    fn validate_year(&self, year: Year) -> ScheduleResult<()> {
        calendar::year_start(year)?;
        let current = calendar::current_year();
        if !self.config.allow_past_years && year < current {
            return Err(ScheduleError::YearInPast { year, current });
        }
        Ok(())
    }

    // ── Reports ────────────────────────────────────────────────

    pub fn live_report(&self, year: Year) -> ScheduleResult<Report> {
        self.store
            .load_report(year, ReportKind::Live)?
            .ok_or(ScheduleError::ScheduleNotFound { year })
    }

    pub fn original_report(&self, year: Year) -> ScheduleResult<Report> {
        self.store
            .load_report(year, ReportKind::Original)?
            .ok_or(ScheduleError::ScheduleNotFound { year })
    }

    pub fn schedule(&self, year: Year) -> ScheduleResult<Schedule> {
        let schedule = self.store.load_schedule(year)?;
        if schedule.is_empty() {
            return Err(ScheduleError::ScheduleNotFound { year });
        }
        Ok(schedule)
    }

    // ── Edits ──────────────────────────────────────────────────

    /// Scheduled days within a user-entered date or date range.
    pub fn days_in_range(&self, year: Year, range: &str) -> ScheduleResult<Vec<DayAssignment>> {
        let schedule = self.schedule(year)?;
        let (start, end) = calendar::parse_date_range(range)?;
        let days: Vec<DayAssignment> = calendar::dates_between(start, end)
            .filter(|d| schedule.is_scheduled(*d))
            .map(|d| schedule.day(d))
            .collect();
        if days.is_empty() {
            return Err(ScheduleError::NoAssignmentsInRange { start, end });
        }
        Ok(days)
    }

    /// Apply a batch of manual edits. Every edit is validated before any is
    /// applied; one bad edit rejects the whole batch.
    pub fn apply_edits(&self, year: Year, edits: &[ManualEdit]) -> ScheduleResult<EditOutcome> {
        let mut schedule = self.schedule(year)?;
        let roster = self.store.load_roster()?;

        let mut resolved = Vec::with_capacity(edits.len());
        for edit in edits {
            if !schedule.is_scheduled(edit.date) {
                return Err(ScheduleError::NoAssignmentsInRange {
                    start: edit.date,
                    end:   edit.date,
                });
            }
            let employee = roster.by_index(edit.employee_index)?.clone();
            resolved.push((edit, employee));
        }

        let mut changes = Vec::with_capacity(resolved.len());
        for (edit, employee) in resolved {
            let old_employee = schedule.set(edit.date, edit.role, employee.clone());
            log::info!(
                "year={year} edit: {} on {} {} -> {employee}",
                edit.role,
                edit.date,
                old_employee.as_deref().unwrap_or("(none)")
            );
            changes.push(ScheduleChange {
                change_id: uuid::Uuid::new_v4().to_string(),
                year,
                date: edit.date,
                role: edit.role,
                old_employee,
                new_employee: employee,
            });
        }

        let records: Vec<_> = changes
            .iter()
            .map(|c| crate::assignment::AssignmentRecord {
                date:     c.date,
                role:     c.role,
                employee: c.new_employee.clone(),
            })
            .collect();
        let live_report = self.store.in_transaction(|store| {
            store.save_records(year, &records)?;
            for change in &changes {
                store.append_change(change)?;
                store.append_event(
                    year,
                    &ScheduleEvent::AssignmentEdited {
                        year,
                        change_id:    change.change_id.clone(),
                        date:         change.date,
                        role:         change.role,
                        old_employee: change.old_employee.clone(),
                        new_employee: change.new_employee.clone(),
                    },
                )?;
            }
            self.refresh_live_report(year, &roster, &schedule)
        })?;

        Ok(EditOutcome { changes, live_report })
    }

    /// Rebuild the live report from the stored schedule.
    pub fn recalculate(&self, year: Year) -> ScheduleResult<Report> {
        let schedule = self.schedule(year)?;
        let roster = self.store.load_roster()?;
        self.refresh_live_report(year, &roster, &schedule)
    }

    fn refresh_live_report(&self, year: Year, roster: &Roster, schedule: &Schedule) -> ScheduleResult<Report> {
        let counters = counts::recompute_counts(roster, schedule);
        let report = Report::from_counters(year, ReportKind::Live, roster, &counters);
        self.store.save_report(&report)?;
        self.store.append_event(year, &ScheduleEvent::ReportRefreshed { year, kind: ReportKind::Live })?;
        Ok(report)
    }

    // ── Command dispatch ───────────────────────────────────────

    pub fn execute(&self, command: ScheduleCommand) -> ScheduleResult<CommandOutcome> {
        let outcome = match command {
            ScheduleCommand::AddEmployee { name } => roster_outcome(self.add_employee(&name)?),
            ScheduleCommand::RemoveEmployee { name } => roster_outcome(self.remove_employee(&name)?),
            ScheduleCommand::ListEmployees => roster_outcome(self.roster()?),
            ScheduleCommand::LoadDemoRoster => roster_outcome(self.load_demo_roster()?),
            ScheduleCommand::Generate(request) => {
                CommandOutcome::Generated(GenerationSummary::from(&self.generate(&request)?))
            }
            ScheduleCommand::ViewReport { year } => CommandOutcome::Report(self.live_report(year)?),
            ScheduleCommand::ViewDifferences { year } => CommandOutcome::Differences {
                year,
                differences: self.pending_differences(year)?,
            },
            ScheduleCommand::ListYears => CommandOutcome::Years {
                years: self.store.generated_years()?,
            },
            ScheduleCommand::ViewDays { year, range } => CommandOutcome::Days {
                days: self.days_in_range(year, &range)?,
            },
            ScheduleCommand::Edit { year, edits } => {
                CommandOutcome::Edited(self.apply_edits(year, &edits)?)
            }
        };
        Ok(outcome)
    }
}

fn roster_outcome(roster: Roster) -> CommandOutcome {
    CommandOutcome::Roster {
        employees: roster.employees().to_vec(),
    }
}
