//! Store methods for the original and live aggregate reports.

use rusqlite::params;

use crate::{
    counts::{Report, ReportKind, ReportRow},
    error::ScheduleResult,
    types::Year,
};

use super::ScheduleStore;

impl ScheduleStore {
    /// Replace the `report.kind` report for `report.year`.
    pub fn save_report(&self, report: &Report) -> ScheduleResult<()> {
        self.in_transaction(|store| {
            store.conn.execute(
                "DELETE FROM report WHERE year = ?1 AND kind = ?2",
                params![report.year, report.kind.as_str()],
            )?;
            for (position, row) in report.rows.iter().enumerate() {
                store.conn.execute(
                    "INSERT INTO report (year, kind, position, employee, primary_count, backup_count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        report.year,
                        report.kind.as_str(),
                        position as i64,
                        row.employee,
                        row.primary_count,
                        row.backup_count,
                    ],
                )?;
            }
            Ok(())
        })
    }

    /// The stored report, or None when the year has none of this kind.
    pub fn load_report(&self, year: Year, kind: ReportKind) -> ScheduleResult<Option<Report>> {
        let mut stmt = self.conn.prepare(
            "SELECT employee, primary_count, backup_count FROM report
             WHERE year = ?1 AND kind = ?2 ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map(params![year, kind.as_str()], |row| {
                Ok(ReportRow {
                    employee:      row.get(0)?,
                    primary_count: row.get(1)?,
                    backup_count:  row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(Report { year, kind, rows }))
    }
}
