//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine calls store methods; assigners never touch SQL.

use chrono::NaiveDate;
use rusqlite::{
    params,
    types::{FromSqlError, Type},
    Connection, Row,
};

use crate::{
    error::ScheduleResult,
    event::{EventLogEntry, ScheduleEvent},
    types::{Role, Year},
};

mod change;
mod report;
mod roster;
mod schedule;

pub use change::ScheduleChange;
pub use schedule::GenerationRecord;

pub struct ScheduleStore {
    conn: Connection,
}

impl ScheduleStore {
    /// Open (or create) the schedule database at `path`.
    pub fn open(path: &str) -> ScheduleResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ScheduleResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ScheduleResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Run `f` inside one transaction. Rolled back if `f` fails. Calls made
    /// while a transaction is already open join it.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> ScheduleResult<T>) -> ScheduleResult<T> {
        if !self.conn.is_autocommit() {
            return f(self);
        }
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, year: Year, event: &ScheduleEvent) -> ScheduleResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO event_log (year, event_type, payload) VALUES (?1, ?2, ?3)",
            params![year, event.type_name(), payload],
        )?;
        Ok(())
    }

    pub fn events_for_year(&self, year: Year) -> ScheduleResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, year, event_type, payload
             FROM event_log WHERE year = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![year], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    year:       row.get(1)?,
                    event_type: row.get(2)?,
                    payload:    row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, year: Year, event_type: &str) -> ScheduleResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE year = ?1 AND event_type = ?2",
            params![year, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ── Column helpers ─────────────────────────────────────────────

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, crate::calendar::DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn role_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Role> {
    let text: String = row.get(idx)?;
    Role::parse(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(FromSqlError::InvalidType))
    })
}

fn date_text(date: NaiveDate) -> String {
    date.format(crate::calendar::DATE_FORMAT).to_string()
}

fn now_text() -> String {
    chrono::Local::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use crate::{
        command::{GenerationRequest, ManualEdit},
        engine::ScheduleEngine,
        primary::InitialOrder,
        types::Role,
    };

    const YEAR: i32 = 2030;

    fn generated_engine() -> ScheduleEngine {
        let engine = ScheduleEngine::build_test().unwrap();
        engine.load_demo_roster().unwrap();
        engine.generate(&request(1, false)).unwrap();
        engine
    }

    fn request(seed: u64, confirm_overwrite: bool) -> GenerationRequest {
        GenerationRequest {
            year: YEAR,
            order: InitialOrder::Seeded(seed),
            compensate: false,
            confirm_overwrite,
        }
    }

    /// Make every insert into `table` fail.
    fn block_inserts(engine: &ScheduleEngine, table: &str) {
        engine
            .store
            .conn
            .execute_batch(&format!(
                "CREATE TRIGGER block_{table} BEFORE INSERT ON {table}
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;"
            ))
            .unwrap();
    }

    #[test]
    fn failed_change_log_write_rolls_back_edit_batch() {
        let engine = generated_engine();
        let schedule = engine.schedule(YEAR).unwrap();
        let live = engine.live_report(YEAR).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(YEAR, 3, 12).unwrap();
        let index = if schedule.get(date, Role::Backup1).map(String::as_str) == Some("Alice Smith") {
            2
        } else {
            1
        };

        block_inserts(&engine, "schedule_change");
        let result = engine.apply_edits(YEAR, &[ManualEdit { date, role: Role::Backup1, employee_index: index }]);

        assert!(result.is_err(), "blocked change log must fail the batch");
        assert_eq!(engine.schedule(YEAR).unwrap(), schedule, "assignments must be rolled back");
        assert_eq!(engine.live_report(YEAR).unwrap(), live);
        assert_eq!(engine.store.event_count(YEAR, "assignment_edited").unwrap(), 0);
        assert!(engine.store.conn.is_autocommit(), "transaction left open");
    }

    #[test]
    fn failed_event_write_rolls_back_regeneration() {
        let engine = generated_engine();
        let schedule = engine.schedule(YEAR).unwrap();
        let original = engine.original_report(YEAR).unwrap();
        let events = engine.store.events_for_year(YEAR).unwrap();

        block_inserts(&engine, "event_log");
        assert!(engine.generate(&request(2, true)).is_err());

        assert_eq!(engine.schedule(YEAR).unwrap(), schedule, "old schedule must survive");
        assert_eq!(engine.original_report(YEAR).unwrap(), original);
        assert_eq!(engine.store.events_for_year(YEAR).unwrap(), events);
        assert_eq!(engine.store.generation(YEAR).unwrap().unwrap().seed, Some(1));
    }

    #[test]
    fn nested_transactions_join_the_outer_one() {
        let engine = ScheduleEngine::build_test().unwrap();
        let result: crate::error::ScheduleResult<()> = engine.store.in_transaction(|store| {
            store.save_roster(&crate::roster::Roster::new(["A", "B", "C"], "").unwrap())?;
            Err(crate::error::ScheduleError::EmptyRoster)
        });
        assert!(result.is_err());
        assert!(engine.roster().unwrap().is_empty(), "inner save must roll back with the outer");
    }
}
