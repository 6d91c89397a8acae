//! Store methods for assignments and generation metadata.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{
    assignment::{AssignmentRecord, Schedule},
    error::ScheduleResult,
    types::{Role, Year},
};

use super::{date_column, date_text, now_text, role_column, ScheduleStore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRecord {
    pub year:         Year,
    pub seed:         Option<u64>,
    pub compensated:  bool,
    pub weeks:        u32,
    pub generated_at: String,
}

impl ScheduleStore {
    /// Replace everything stored for `year` with `schedule`.
    pub fn save_schedule(&self, year: Year, schedule: &Schedule) -> ScheduleResult<()> {
        self.in_transaction(|store| {
            store.conn.execute("DELETE FROM assignment WHERE year = ?1", params![year])?;
            let mut stmt = store.conn.prepare(
                "INSERT INTO assignment (year, date, role, employee) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for r in schedule.records() {
                stmt.execute(params![year, date_text(r.date), r.role.as_str(), r.employee])?;
            }
            Ok(())
        })
    }

    /// Upsert individual records without touching the rest of the year.
    pub fn save_records(&self, year: Year, records: &[AssignmentRecord]) -> ScheduleResult<()> {
        self.in_transaction(|store| {
            for r in records {
                store.conn.execute(
                    "INSERT OR REPLACE INTO assignment (year, date, role, employee)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![year, date_text(r.date), r.role.as_str(), r.employee],
                )?;
            }
            Ok(())
        })
    }

    pub fn load_schedule(&self, year: Year) -> ScheduleResult<Schedule> {
        let mut stmt = self.conn.prepare(
            "SELECT date, role, employee FROM assignment
             WHERE year = ?1 ORDER BY date ASC, role ASC",
        )?;
        let records = stmt
            .query_map(params![year], |row| {
                Ok(AssignmentRecord {
                    date:     date_column(row, 0)?,
                    role:     role_column(row, 1)?,
                    employee: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schedule::from_records(records))
    }

    pub fn assignment_count(&self, year: Year, role: Role) -> ScheduleResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM assignment WHERE year = ?1 AND role = ?2",
            params![year, role.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Generation metadata ────────────────────────────────────

    pub fn record_generation(
        &self,
        year:        Year,
        seed:        Option<u64>,
        compensated: bool,
        weeks:       u32,
    ) -> ScheduleResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO generation (year, seed, compensated, weeks, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![year, seed.map(|s| s as i64), compensated, weeks, now_text()],
        )?;
        Ok(())
    }

    pub fn generation(&self, year: Year) -> ScheduleResult<Option<GenerationRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT year, seed, compensated, weeks, generated_at
                 FROM generation WHERE year = ?1",
                params![year],
                |row| {
                    Ok(GenerationRecord {
                        year:         row.get(0)?,
                        seed:         row.get::<_, Option<i64>>(1)?.map(|s| s as u64),
                        compensated:  row.get(2)?,
                        weeks:        row.get(3)?,
                        generated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Years with a stored schedule, ascending.
    pub fn generated_years(&self) -> ScheduleResult<Vec<Year>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT year FROM assignment ORDER BY year ASC")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<Year>, _>>()?;
        Ok(years)
    }

    pub fn schedule_exists(&self, year: Year) -> ScheduleResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM assignment WHERE year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
