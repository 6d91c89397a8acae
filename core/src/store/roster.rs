//! Store methods for the employee roster.

use rusqlite::params;

use crate::{error::ScheduleResult, roster::Roster};

use super::ScheduleStore;

impl ScheduleStore {
    /// The roster in stored order. Empty when none has been saved.
    pub fn load_roster(&self) -> ScheduleResult<Roster> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM employee ORDER BY position ASC")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Roster::from_stored(names))
    }

    /// Replace the stored roster, preserving order.
    pub fn save_roster(&self, roster: &Roster) -> ScheduleResult<()> {
        self.in_transaction(|store| {
            store.conn.execute("DELETE FROM employee", [])?;
            for (position, name) in roster.iter().enumerate() {
                store.conn.execute(
                    "INSERT INTO employee (position, name) VALUES (?1, ?2)",
                    params![position as i64, name],
                )?;
            }
            Ok(())
        })
    }
}
