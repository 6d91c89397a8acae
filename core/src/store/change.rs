//! Store methods for the manual schedule-change log.

use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::{
    error::ScheduleResult,
    types::{Employee, Role, Year},
};

use super::{date_column, date_text, now_text, role_column, ScheduleStore};

/// One applied manual edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleChange {
    pub change_id:    String,
    pub year:         Year,
    pub date:         NaiveDate,
    pub role:         Role,
    pub old_employee: Option<Employee>,
    pub new_employee: Employee,
}

impl ScheduleStore {
    pub fn append_change(&self, change: &ScheduleChange) -> ScheduleResult<()> {
        self.conn.execute(
            "INSERT INTO schedule_change
                (change_id, year, date, role, old_employee, new_employee, changed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                change.change_id,
                change.year,
                date_text(change.date),
                change.role.as_str(),
                change.old_employee,
                change.new_employee,
                now_text(),
            ],
        )?;
        Ok(())
    }

    pub fn changes_for_year(&self, year: Year) -> ScheduleResult<Vec<ScheduleChange>> {
        let mut stmt = self.conn.prepare(
            "SELECT change_id, year, date, role, old_employee, new_employee
             FROM schedule_change WHERE year = ?1
             ORDER BY rowid ASC",
        )?;
        let changes = stmt
            .query_map(params![year], |row| {
                Ok(ScheduleChange {
                    change_id:    row.get(0)?,
                    year:         row.get(1)?,
                    date:         date_column(row, 2)?,
                    role:         role_column(row, 3)?,
                    old_employee: row.get(4)?,
                    new_employee: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(changes)
    }

    /// Drop the change log and event log of `year`. Used when a new
    /// generation replaces the schedule they describe.
    pub fn clear_year_history(&self, year: Year) -> ScheduleResult<()> {
        self.in_transaction(|store| {
            store.conn.execute("DELETE FROM schedule_change WHERE year = ?1", params![year])?;
            store.conn.execute("DELETE FROM event_log WHERE year = ?1", params![year])?;
            Ok(())
        })
    }
}
