mod path;

use crate::model::Task;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use path::resolve_db_path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    task TEXT NOT NULL,
    done INTEGER DEFAULT 0
);";

const INSERT_TASK: &str = "INSERT INTO tasks (date, task) VALUES (?1, ?2);";
const UPDATE_TASK: &str = "UPDATE tasks SET done = ?1 WHERE id = ?2;";
const COUNT_TASKS: &str = "SELECT COUNT(*) FROM tasks;";
const GET_TASK_BY_ID: &str = "SELECT id, date, task, done FROM tasks WHERE id = ?1;";
const GET_TASKS_FOR_DATE: &str =
    "SELECT id, date, task, done FROM tasks WHERE date = ?1 ORDER BY date, id;";

/// Tasks grouped by calendar day, days ascending.
pub type TasksByDate = BTreeMap<NaiveDate, Vec<Task>>;

/// Owns the single SQLite connection backing the `tasks` table.
///
/// Dropping the store releases the connection; `close` does the same but
/// reports errors raised while closing.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("unable to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("unable to open database {}", path.display()))?;
        info!("event=db_open status=ok path={}", path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("unable to open in-memory database")?;
        Ok(Self { conn })
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("unable to create tasks table")?;
        debug!("event=ensure_schema status=ok");
        Ok(())
    }

    pub fn insert_task(&self, description: &str, date: NaiveDate) -> Result<i64> {
        self.conn
            .execute(INSERT_TASK, params![date, description])
            .context("unable to insert task")?;
        let id = self.conn.last_insert_rowid();
        debug!("event=insert_task status=ok id={} date={}", id, date);
        Ok(id)
    }

    /// Sets the done flag. Unknown ids affect no rows and are not an error.
    pub fn update_task(&self, id: i64, done: bool) -> Result<usize> {
        let changed = self
            .conn
            .execute(UPDATE_TASK, params![done, id])
            .with_context(|| format!("unable to update task {}", id))?;
        debug!(
            "event=update_task status=ok id={} done={} rows={}",
            id, done, changed
        );
        Ok(changed)
    }

    pub fn count_tasks(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row(COUNT_TASKS, [], |row| row.get(0))
            .context("unable to count tasks")?;
        Ok(count)
    }

    pub fn get_task_by_id(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(GET_TASK_BY_ID, params![id], task_from_row)
            .optional()
            .with_context(|| format!("unable to read task {}", id))?;
        debug!("event=get_task_by_id id={} found={}", id, task.is_some());
        Ok(task)
    }

    pub fn get_tasks_for_date(&self, date: NaiveDate) -> Result<TasksByDate> {
        let mut stmt = self
            .conn
            .prepare(GET_TASKS_FOR_DATE)
            .context("unable to prepare task query")?;
        let tasks = stmt
            .query_map(params![date], task_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .with_context(|| format!("unable to read tasks for {}", date))?;
        debug!("event=get_tasks_for_date date={} rows={}", date, tasks.len());
        Ok(group_by_date(tasks))
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("unable to close database")?;
        debug!("event=db_close status=ok");
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        done: row.get(3)?,
    })
}

fn group_by_date(tasks: Vec<Task>) -> TasksByDate {
    tasks.into_iter().fold(TasksByDate::new(), |mut groups, task| {
        groups.entry(task.date).or_default().push(task);
        groups
    })
}

#[cfg(test)]
mod tests {
    use super::{TaskStore, group_by_date};
    use crate::model::Task;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn store() -> TaskStore {
        let store = TaskStore::open_in_memory().expect("open");
        store.ensure_schema().expect("schema");
        store
    }

    #[test]
    fn fresh_schema_has_no_tasks() {
        let store = store();
        assert_eq!(store.count_tasks().expect("count"), 0);
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let store = store();
        store.insert_task("Foo", day(3)).expect("insert");
        store.ensure_schema().expect("schema again");
        assert_eq!(store.count_tasks().expect("count"), 1);
    }

    #[test]
    fn insert_assigns_increasing_ids_from_one() {
        let store = store();
        assert_eq!(store.insert_task("Foo", day(3)).expect("insert"), 1);
        assert_eq!(store.insert_task("Bar", day(3)).expect("insert"), 2);
        assert_eq!(store.insert_task("Baz", day(4)).expect("insert"), 3);
        assert_eq!(store.count_tasks().expect("count"), 3);
    }

    #[test]
    fn new_task_starts_pending() {
        let store = store();
        let id = store.insert_task("Foo", day(3)).expect("insert");
        let task = store.get_task_by_id(id).expect("get").expect("present");
        assert!(!task.done);
    }

    #[test]
    fn update_sets_and_clears_done() {
        let store = store();
        let id = store.insert_task("Foo", day(3)).expect("insert");

        assert_eq!(store.update_task(id, true).expect("update"), 1);
        let task = store.get_task_by_id(id).expect("get").expect("present");
        assert_eq!(task.id, 1);
        assert!(task.done);

        store.update_task(id, false).expect("update");
        let task = store.get_task_by_id(id).expect("get").expect("present");
        assert!(!task.done);
    }

    #[test]
    fn update_unknown_id_is_silent() {
        let store = store();
        store.insert_task("Foo", day(3)).expect("insert");
        assert_eq!(store.update_task(999, true).expect("update"), 0);
        assert_eq!(store.count_tasks().expect("count"), 1);
    }

    #[test]
    fn get_missing_task_returns_none() {
        let store = store();
        assert!(store.get_task_by_id(1).expect("get").is_none());
    }

    #[test]
    fn description_and_date_survive_storage() {
        let store = store();
        let description = "write the report, then ✉ it";
        let id = store.insert_task(description, day(31)).expect("insert");
        let task = store.get_task_by_id(id).expect("get").expect("present");
        assert_eq!(task.description, description);
        assert_eq!(task.date, day(31));
    }

    #[test]
    fn get_tasks_for_date_filters_other_days() {
        let store = store();
        store.insert_task("Foo", day(3)).expect("insert");
        store.insert_task("Bar", day(4)).expect("insert");
        store.insert_task("Baz", day(4)).expect("insert");
        store.insert_task("Foo", day(5)).expect("insert");

        let groups = store.get_tasks_for_date(day(4)).expect("query");
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![day(4)]);
        let tasks = &groups[&day(4)];
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|task| task.date == day(4)));
        assert_eq!(tasks[0].description, "Bar");
        assert_eq!(tasks[1].description, "Baz");
    }

    #[test]
    fn get_tasks_for_empty_day_is_empty() {
        let store = store();
        store.insert_task("Foo", day(3)).expect("insert");
        assert!(store.get_tasks_for_date(day(9)).expect("query").is_empty());
    }

    #[test]
    fn group_by_date_keeps_insertion_order_within_day() {
        let task = |id, d| Task {
            id,
            date: day(d),
            description: format!("task {}", id),
            done: false,
        };
        let groups = group_by_date(vec![task(1, 5), task(2, 3), task(3, 5)]);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![day(3), day(5)]);
        let ids: Vec<i64> = groups[&day(5)].iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn file_store_persists_across_connections() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("db.sqlite3");

        let store = TaskStore::open(&path).expect("open");
        store.ensure_schema().expect("schema");
        let id = store.insert_task("Foo", day(3)).expect("insert");
        store.update_task(id, true).expect("update");
        store.close().expect("close");

        let store = TaskStore::open(&path).expect("reopen");
        store.ensure_schema().expect("schema");
        assert_eq!(store.count_tasks().expect("count"), 1);
        let task = store.get_task_by_id(id).expect("get").expect("present");
        assert!(task.done);
    }

    #[test]
    fn unparseable_stored_date_is_an_error() {
        let store = store();
        store
            .conn
            .execute(
                "INSERT INTO tasks (date, task) VALUES ('yesterday', 'Foo');",
                [],
            )
            .expect("raw insert");
        assert!(store.get_task_by_id(1).is_err());
    }
}
