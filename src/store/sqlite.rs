//! SQLite-backed task store.
//!
//! Tasks and results live in two indexed tables. Facility and service
//! identities are denormalized onto each row; their full records belong to
//! the topology collaborator. Result ids come from the rowid sequence, which
//! satisfies the monotonic-recency invariant the reducer relies on.
//!
//! Status columns hold the closed uppercase vocabulary. A row whose status
//! falls outside it fails the read for that record instead of being coerced.

use crate::domain::{Facility, Service, Task, TaskResult, TaskStatus};
use crate::error::Result;
use crate::store::traits::TaskStore;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rusqlite::{Connection, Row, params};
use std::path::Path;

const TASK_COLUMNS: &str = "id, facility_id, facility_name, service_id, service_name, \
     status, schedule, start_time, end_time, delay, recurrence, engine_id";

const RESULT_COLUMNS: &str = "id, task_id, service_id, service_name, destination, \
     status, return_code, standard_message, error_message, timestamp";

/// SQLite implementation of [`TaskStore`].
pub struct SqliteTaskStore {
    db: Connection,
}

/// Raw task row; status is parsed after the rusqlite mapping so an unknown
/// value surfaces as a crate error, not a database error.
struct TaskRow {
    id: i32,
    facility_id: i32,
    facility_name: String,
    service_id: Option<i32>,
    service_name: Option<String>,
    status: String,
    schedule: Option<DateTime<Utc>>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    delay: i32,
    recurrence: i32,
    engine_id: Option<i32>,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            facility_id: row.get(1)?,
            facility_name: row.get(2)?,
            service_id: row.get(3)?,
            service_name: row.get(4)?,
            status: row.get(5)?,
            schedule: row.get(6)?,
            start_time: row.get(7)?,
            end_time: row.get(8)?,
            delay: row.get(9)?,
            recurrence: row.get(10)?,
            engine_id: row.get(11)?,
        })
    }

    fn into_task(self) -> Result<Task> {
        let service = match (self.service_id, self.service_name) {
            (Some(id), Some(name)) => Some(Service { id, name }),
            _ => None,
        };

        Ok(Task {
            id: self.id,
            facility: Facility {
                id: self.facility_id,
                name: self.facility_name,
            },
            service,
            status: self.status.parse::<TaskStatus>()?,
            schedule: self.schedule,
            start_time: self.start_time,
            end_time: self.end_time,
            delay: self.delay,
            recurrence: self.recurrence,
            engine_id: self.engine_id,
        })
    }
}

struct ResultRow {
    id: i32,
    task_id: i32,
    service_id: i32,
    service_name: String,
    destination: String,
    status: String,
    return_code: i32,
    standard_message: Option<String>,
    error_message: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl ResultRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            task_id: row.get(1)?,
            service_id: row.get(2)?,
            service_name: row.get(3)?,
            destination: row.get(4)?,
            status: row.get(5)?,
            return_code: row.get(6)?,
            standard_message: row.get(7)?,
            error_message: row.get(8)?,
            timestamp: row.get(9)?,
        })
    }

    fn into_result(self) -> Result<TaskResult> {
        Ok(TaskResult {
            id: self.id,
            task_id: self.task_id,
            service: Service {
                id: self.service_id,
                name: self.service_name,
            },
            destination: self.destination,
            status: self.status.parse()?,
            return_code: self.return_code,
            standard_message: self.standard_message,
            error_message: self.error_message,
            timestamp: self.timestamp,
        })
    }
}

impl SqliteTaskStore {
    /// Open or create a store at the given database path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Connection::open(path.as_ref())?;
        Self::init_schema(&db)?;
        debug!("opened task store at {}", path.as_ref().display());
        Ok(Self { db })
    }

    /// Open an in-memory store. Useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { db })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                facility_id INTEGER NOT NULL,
                facility_name TEXT NOT NULL,
                service_id INTEGER,
                service_name TEXT,
                status TEXT NOT NULL,
                schedule TEXT,
                start_time TEXT,
                end_time TEXT,
                delay INTEGER NOT NULL DEFAULT 0,
                recurrence INTEGER NOT NULL DEFAULT 0,
                engine_id INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_facility ON tasks(facility_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);

            CREATE TABLE IF NOT EXISTS task_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL,
                service_id INTEGER NOT NULL,
                service_name TEXT NOT NULL,
                destination TEXT NOT NULL,
                status TEXT NOT NULL,
                return_code INTEGER NOT NULL DEFAULT 0,
                standard_message TEXT,
                error_message TEXT,
                timestamp TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_results_task ON task_results(task_id);
            CREATE INDEX IF NOT EXISTS idx_results_destination ON task_results(destination);
            "#,
        )?;
        Ok(())
    }

    fn query_tasks(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Task>> {
        let mut stmt = self.db.prepare(sql)?;
        let rows = stmt.query_map(params, TaskRow::from_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(tasks)
    }

    fn query_results(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<TaskResult>> {
        let mut stmt = self.db.prepare(sql)?;
        let rows = stmt.query_map(params, ResultRow::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?.into_result()?);
        }
        Ok(results)
    }
}

impl TaskStore for SqliteTaskStore {
    fn schedule_task(&mut self, task: &Task) -> Result<i32> {
        self.db.execute(
            r#"
            INSERT INTO tasks
            (facility_id, facility_name, service_id, service_name, status,
             schedule, start_time, end_time, delay, recurrence, engine_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                task.facility.id,
                task.facility.name,
                task.service.as_ref().map(|s| s.id),
                task.service.as_ref().map(|s| s.name.as_str()),
                task.status.as_str(),
                task.schedule,
                task.start_time,
                task.end_time,
                task.delay,
                task.recurrence,
                task.engine_id,
            ],
        )?;
        Ok(self.db.last_insert_rowid() as i32)
    }

    fn get_task(&self, service_id: i32, facility_id: i32) -> Result<Option<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE service_id = ?1 AND facility_id = ?2"
        );
        Ok(self
            .query_tasks(&sql, params![service_id, facility_id])?
            .into_iter()
            .next())
    }

    fn get_task_by_id(&self, id: i32) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        Ok(self.query_tasks(&sql, params![id])?.into_iter().next())
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");
        self.query_tasks(&sql, [])
    }

    fn list_tasks_for_facility(&self, facility_id: i32) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE facility_id = ?1 ORDER BY id");
        self.query_tasks(&sql, params![facility_id])
    }

    fn list_tasks_in_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE status = ?1 ORDER BY id");
        self.query_tasks(&sql, params![status.as_str()])
    }

    fn update_task(&mut self, task: &Task) -> Result<()> {
        let changed = self.db.execute(
            r#"
            UPDATE tasks SET
                facility_id = ?2, facility_name = ?3, service_id = ?4, service_name = ?5,
                status = ?6, schedule = ?7, start_time = ?8, end_time = ?9,
                delay = ?10, recurrence = ?11, engine_id = ?12
            WHERE id = ?1
            "#,
            params![
                task.id,
                task.facility.id,
                task.facility.name,
                task.service.as_ref().map(|s| s.id),
                task.service.as_ref().map(|s| s.name.as_str()),
                task.status.as_str(),
                task.schedule,
                task.start_time,
                task.end_time,
                task.delay,
                task.recurrence,
                task.engine_id,
            ],
        )?;

        if changed == 0 {
            return Err(crate::error::SyncstateError::TaskNotFound(task.id));
        }
        Ok(())
    }

    fn remove_task(&mut self, id: i32) -> Result<()> {
        let changed = self.db.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(crate::error::SyncstateError::TaskNotFound(id));
        }
        Ok(())
    }

    fn count_tasks(&self) -> Result<usize> {
        let count: i64 = self.db.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_result(&mut self, result: &TaskResult) -> Result<i32> {
        self.db.execute(
            r#"
            INSERT INTO task_results
            (task_id, service_id, service_name, destination, status,
             return_code, standard_message, error_message, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                result.task_id,
                result.service.id,
                result.service.name,
                result.destination,
                result.status.as_str(),
                result.return_code,
                result.standard_message,
                result.error_message,
                result.timestamp,
            ],
        )?;
        Ok(self.db.last_insert_rowid() as i32)
    }

    fn result_by_id(&self, id: i32) -> Result<Option<TaskResult>> {
        let sql = format!("SELECT {RESULT_COLUMNS} FROM task_results WHERE id = ?1");
        Ok(self.query_results(&sql, params![id])?.into_iter().next())
    }

    fn results_for_task(&self, task_id: i32) -> Result<Vec<TaskResult>> {
        let sql =
            format!("SELECT {RESULT_COLUMNS} FROM task_results WHERE task_id = ?1 ORDER BY id");
        self.query_results(&sql, params![task_id])
    }

    fn results_for_destinations(&self, destinations: &[String]) -> Result<Vec<TaskResult>> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=destinations.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM task_results WHERE destination IN ({placeholders}) ORDER BY id"
        );
        self.query_results(&sql, rusqlite::params_from_iter(destinations.iter()))
    }

    fn clear_results_for_task(&mut self, task_id: i32) -> Result<usize> {
        let removed = self
            .db
            .execute("DELETE FROM task_results WHERE task_id = ?1", params![task_id])?;
        Ok(removed)
    }

    fn clear_old_results(&mut self, days: u32) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let removed = self.db.execute(
            "DELETE FROM task_results WHERE timestamp IS NOT NULL AND timestamp < ?1",
            params![cutoff],
        )?;
        debug!("cleared {removed} results older than {days} days");
        Ok(removed)
    }
}
