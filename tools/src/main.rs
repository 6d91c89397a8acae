//! oncall-runner: headless driver for the on-call scheduler.
//!
//! Usage:
//!   oncall-runner roster-demo --db oncall.db
//!   oncall-runner roster-add --name "Ada Lovelace" --db oncall.db
//!   oncall-runner generate --year 2027 --seed 12345 --compensate --overwrite --db oncall.db
//!   oncall-runner report --year 2027 --db oncall.db
//!   oncall-runner days --year 2027 --range "2027-03-01 to 2027-03-07"
//!   oncall-runner edit --year 2027 --date 2027-03-02 --role backup1 --employee 4
//!   oncall-runner --ipc-mode --db oncall.db

use anyhow::{bail, Context, Result};
use oncall_core::{
    calendar,
    command::{GenerationRequest, ManualEdit, ScheduleCommand},
    config::SchedulerConfig,
    counts::Report,
    engine::{CommandOutcome, ScheduleEngine},
    history,
    primary::InitialOrder,
    store::ScheduleStore,
    types::Role,
};
use serde::Serialize;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(Serialize)]
struct IpcError {
    error: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or("oncall.db");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let ipc_mode = has_flag(&args, "--ipc-mode");

    let config = SchedulerConfig::load(data_dir)?;
    let store = ScheduleStore::open(db)?;
    store.migrate()?;
    let engine = ScheduleEngine::new(store, config);

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    let command = build_command(&engine, &args)?;
    match engine.execute(command) {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => bail!("{e}"),
    }
    Ok(())
}

/// One JSON ScheduleCommand per stdin line, one JSON outcome per stdout line.
fn run_ipc_loop(engine: &ScheduleEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim() == "quit" {
            break;
        }

        let response = match serde_json::from_str::<ScheduleCommand>(&buffer) {
            Ok(cmd) => match engine.execute(cmd) {
                Ok(outcome) => serde_json::to_string(&outcome)?,
                Err(e) => serde_json::to_string(&IpcError { error: e.to_string() })?,
            },
            Err(e) => serde_json::to_string(&IpcError { error: format!("bad command: {e}") })?,
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_command(engine: &ScheduleEngine, args: &[String]) -> Result<ScheduleCommand> {
    let sub = args.get(1).map(String::as_str).unwrap_or("help");
    let year = || -> Result<i32> {
        let raw = flag_value(args, "--year").context("--year is required")?;
        Ok(calendar::parse_year(raw, calendar::current_year(), true)?)
    };

    let command = match sub {
        "roster-list" => ScheduleCommand::ListEmployees,
        "roster-demo" => ScheduleCommand::LoadDemoRoster,
        "roster-add" => ScheduleCommand::AddEmployee {
            name: flag_value(args, "--name").context("--name is required")?.to_string(),
        },
        "roster-remove" => ScheduleCommand::RemoveEmployee {
            name: flag_value(args, "--name").context("--name is required")?.to_string(),
        },
        "years" => ScheduleCommand::ListYears,
        "generate" => {
            let raw = flag_value(args, "--year").context("--year is required")?;
            let year = calendar::parse_year(
                raw,
                calendar::current_year(),
                engine.config.allow_past_years,
            )?;
            let order = match flag_value(args, "--seed") {
                Some(s) if s == "fixed" => InitialOrder::Fixed,
                Some(s) => InitialOrder::Seeded(s.parse().context("--seed must be an integer")?),
                None => InitialOrder::Seeded(clock_seed()),
            };
            let compensate = has_flag(args, "--compensate");
            if !compensate {
                for (emp, diff) in engine
                    .pending_differences(year)?
                    .iter()
                    .filter(|(_, d)| **d != 0)
                {
                    println!("  note: {} (pass --compensate to adjust)", history::describe_difference(emp, *diff));
                }
            }
            ScheduleCommand::Generate(GenerationRequest {
                year,
                order,
                compensate,
                confirm_overwrite: has_flag(args, "--overwrite"),
            })
        }
        "report" => ScheduleCommand::ViewReport { year: year()? },
        "differences" => ScheduleCommand::ViewDifferences { year: year()? },
        "days" => ScheduleCommand::ViewDays {
            year:  year()?,
            range: flag_value(args, "--range").context("--range is required")?.to_string(),
        },
        "edit" => {
            let (date, _) = calendar::parse_date_range(
                flag_value(args, "--date").context("--date is required")?,
            )?;
            let role = Role::parse(flag_value(args, "--role").context("--role is required")?)
                .context("--role must be primary, backup1 or backup2")?;
            let employee_index = flag_value(args, "--employee")
                .context("--employee is required")?
                .parse()
                .context("--employee must be a roster number")?;
            ScheduleCommand::Edit {
                year:  year()?,
                edits: vec![ManualEdit { date, role, employee_index }],
            }
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    };
    Ok(command)
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Roster { employees } => {
            println!("=== EMPLOYEES ===");
            for (i, e) in employees.iter().enumerate() {
                println!("  {:>2}. {e}", i + 1);
            }
        }
        CommandOutcome::Generated(summary) => {
            println!("=== GENERATION SUMMARY ===");
            println!("  year:           {}", summary.year);
            println!("  scheduled days: {}", summary.scheduled_days);
            println!("  uncovered days: {}", summary.uncovered_days);
            println!("  soft flags:     {}", summary.soft_flags);
            print_report(&summary.report);
        }
        CommandOutcome::Report(report) => print_report(report),
        CommandOutcome::Differences { year, differences } => {
            println!("=== EDIT DIFFERENCES CARRIED INTO {year} ===");
            let notable: Vec<_> = history::notable_differences(differences).collect();
            if notable.is_empty() {
                println!("  (none)");
            }
            for (emp, diff) in notable {
                println!("  {}", history::describe_difference(emp, diff));
            }
        }
        CommandOutcome::Years { years } => {
            println!("=== SCHEDULED YEARS ===");
            for y in years {
                println!("  {y}");
            }
        }
        CommandOutcome::Days { days } => {
            for d in days {
                println!("{}", d.date);
                println!("  1. Primary:  {}", d.primary.as_deref().unwrap_or(""));
                println!("  2. Backup 1: {}", d.backup1.as_deref().unwrap_or(""));
                println!("  3. Backup 2: {}", d.backup2.as_deref().unwrap_or(""));
            }
        }
        CommandOutcome::Edited(edit) => {
            for c in &edit.changes {
                println!("{} for {} updated to {}", c.role, c.date, c.new_employee);
            }
            print_report(&edit.live_report);
        }
    }
}

fn print_report(report: &Report) {
    println!();
    println!("=== ON-CALL REPORT {} ({:?}) ===", report.year, report.kind);
    println!("  {:<20}{:<15}{}", "Employee", "Primary Count", "Backup Count");
    for row in &report.rows {
        println!("  {:<20}{:<15}{}", row.employee, row.primary_count, row.backup_count);
    }
}

fn print_usage() {
    println!("commands: roster-list | roster-demo | roster-add --name N | roster-remove --name N");
    println!("          generate --year Y [--seed S|fixed] [--compensate] [--overwrite]");
    println!("          report --year Y | differences --year Y | years");
    println!("          days --year Y --range R | edit --year Y --date D --role R --employee I");
    println!("flags:    --db PATH --data-dir DIR --ipc-mode");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Seed for runs that did not pass --seed.
fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u64
}
