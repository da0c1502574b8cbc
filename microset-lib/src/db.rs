//src/db.rs
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{named_params, Connection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{Intensity, Unit};

pub const DB_FILE_NAME: &str = "completions.sqlite";

// Timestamps are stored as local wall-clock text so that SQLite's
// date() groups rows by the user's calendar day.
const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
}

/// Opens a connection to the completion store under the data root.
pub fn open(root: &Path) -> Result<Connection, DbError> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
    }
    let conn = Connection::open(root.join(DB_FILE_NAME)).map_err(DbError::Connection)?;
    Ok(conn)
}

/// Initializes the completion tables if they don't exist.
pub fn init(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS exercise_completions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            count INTEGER NOT NULL,
            unit TEXT NOT NULL,
            category TEXT NOT NULL,
            intensity TEXT NOT NULL,
            task_description TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT 1
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS routine_completions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            routine_id TEXT NOT NULL,
            routine_name TEXT NOT NULL,
            routine_type TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            intensity TEXT NOT NULL,
            task_description TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_exercise_completions_timestamp
         ON exercise_completions(timestamp)",
        [],
    )
    .map_err(DbError::Connection)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_routine_completions_timestamp
         ON routine_completions(timestamp)",
        [],
    )
    .map_err(DbError::Connection)?;

    Ok(())
}

pub struct NewExerciseCompletion<'a> {
    pub name: &'a str,
    pub count: u32,
    pub unit: Unit,
    pub category: &'a str,
    pub intensity: Intensity,
    pub task_description: &'a str,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCompletion {
    pub id: i64,
    pub name: String,
    pub count: u32,
    pub unit: Unit,
    pub category: String,
    pub intensity: Intensity,
    pub task_description: String,
    pub timestamp: NaiveDateTime,
}

pub struct NewRoutineCompletion<'a> {
    pub routine_id: &'a str,
    pub routine_name: &'a str,
    pub routine_type: &'a str,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    pub task_description: &'a str,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineCompletion {
    pub id: i64,
    pub routine_id: String,
    pub routine_name: String,
    pub routine_type: String,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CategoryStat {
    pub count: u32,
    pub reps: u32,
}

/// Today's aggregates; this is also the `stats` JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayStats {
    pub date: NaiveDate,
    pub exercises: u32,
    pub reps: u32,
    pub routines: u32,
    pub routine_minutes: u32,
    pub categories: BTreeMap<String, CategoryStat>,
}

fn ts_to_string(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

fn ts_from_column(index: usize, raw: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Appends one exercise completion. Rows are never updated or deleted.
pub fn add_exercise_completion(
    conn: &Connection,
    record: &NewExerciseCompletion,
) -> Result<i64, DbError> {
    conn.execute(
        "INSERT INTO exercise_completions
            (name, count, unit, category, intensity, task_description, timestamp, completed)
         VALUES (:name, :count, :unit, :category, :intensity, :task, :ts, 1)",
        named_params! {
            ":name": record.name,
            ":count": record.count,
            ":unit": record.unit.to_string(),
            ":category": record.category,
            ":intensity": record.intensity.to_string(),
            ":task": record.task_description,
            ":ts": ts_to_string(record.timestamp),
        },
    )
    .map_err(DbError::InsertFailed)?;
    Ok(conn.last_insert_rowid())
}

/// Appends one routine completion.
pub fn add_routine_completion(
    conn: &Connection,
    record: &NewRoutineCompletion,
) -> Result<i64, DbError> {
    conn.execute(
        "INSERT INTO routine_completions
            (routine_id, routine_name, routine_type, duration_minutes,
             intensity, task_description, timestamp)
         VALUES (:id, :name, :type, :duration, :intensity, :task, :ts)",
        named_params! {
            ":id": record.routine_id,
            ":name": record.routine_name,
            ":type": record.routine_type,
            ":duration": record.duration_minutes,
            ":intensity": record.intensity.to_string(),
            ":task": record.task_description,
            ":ts": ts_to_string(record.timestamp),
        },
    )
    .map_err(DbError::InsertFailed)?;
    Ok(conn.last_insert_rowid())
}

/// Aggregates for a single calendar day, including the per-category
/// breakdown.
pub fn day_stats(conn: &Connection, date: NaiveDate) -> Result<TodayStats, DbError> {
    let date_str = date.format("%Y-%m-%d").to_string();

    let (exercises, reps): (u32, u32) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(count), 0)
             FROM exercise_completions
             WHERE completed = 1 AND date(timestamp) = :date",
            named_params! { ":date": date_str },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(DbError::QueryFailed)?;

    let (routines, routine_minutes): (u32, u32) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_minutes), 0)
             FROM routine_completions
             WHERE date(timestamp) = :date",
            named_params! { ":date": date_str },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(DbError::QueryFailed)?;

    let mut stmt = conn
        .prepare(
            "SELECT category, COUNT(*), COALESCE(SUM(count), 0)
             FROM exercise_completions
             WHERE completed = 1 AND date(timestamp) = :date
             GROUP BY category",
        )
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(named_params! { ":date": date_str }, |row| {
            Ok((
                row.get::<_, String>(0)?,
                CategoryStat {
                    count: row.get(1)?,
                    reps: row.get(2)?,
                },
            ))
        })
        .map_err(DbError::QueryFailed)?;

    let mut categories = BTreeMap::new();
    for row in rows {
        let (category, stat) = row.map_err(DbError::QueryFailed)?;
        categories.insert(category, stat);
    }

    Ok(TodayStats {
        date,
        exercises,
        reps,
        routines,
        routine_minutes,
        categories,
    })
}

/// Lists exercise completions, newest first, optionally bounded to
/// dates on or after `since`.
pub fn list_exercise_completions(
    conn: &Connection,
    since: Option<NaiveDate>,
) -> Result<Vec<ExerciseCompletion>, DbError> {
    let mut sql = "SELECT id, name, count, unit, category, intensity, task_description, timestamp
         FROM exercise_completions WHERE completed = 1"
        .to_string();
    if since.is_some() {
        sql.push_str(" AND date(timestamp) >= :since");
    }
    sql.push_str(" ORDER BY timestamp DESC");

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let map_row = |row: &rusqlite::Row| -> Result<ExerciseCompletion, rusqlite::Error> {
        let unit: String = row.get(3)?;
        let intensity: String = row.get(5)?;
        let ts: String = row.get(7)?;
        Ok(ExerciseCompletion {
            id: row.get(0)?,
            name: row.get(1)?,
            count: row.get(2)?,
            unit: Unit::from_db(&unit),
            category: row.get(4)?,
            intensity: Intensity::from_db(&intensity),
            task_description: row.get(6)?,
            timestamp: ts_from_column(7, &ts)?,
        })
    };
    let rows = if let Some(since) = since {
        let since_str = since.format("%Y-%m-%d").to_string();
        stmt.query_map(named_params! { ":since": since_str }, map_row)
            .map_err(DbError::QueryFailed)?
            .collect::<Result<Vec<_>, _>>()
    } else {
        stmt.query_map([], map_row)
            .map_err(DbError::QueryFailed)?
            .collect::<Result<Vec<_>, _>>()
    };
    rows.map_err(DbError::QueryFailed)
}

/// Lists routine completions, newest first.
pub fn list_routine_completions(
    conn: &Connection,
    since: Option<NaiveDate>,
) -> Result<Vec<RoutineCompletion>, DbError> {
    let mut sql = "SELECT id, routine_id, routine_name, routine_type, duration_minutes,
                intensity, timestamp
         FROM routine_completions WHERE 1=1"
        .to_string();
    if since.is_some() {
        sql.push_str(" AND date(timestamp) >= :since");
    }
    sql.push_str(" ORDER BY timestamp DESC");

    let mut stmt = conn.prepare(&sql).map_err(DbError::QueryFailed)?;
    let map_row = |row: &rusqlite::Row| -> Result<RoutineCompletion, rusqlite::Error> {
        let intensity: String = row.get(5)?;
        let ts: String = row.get(6)?;
        Ok(RoutineCompletion {
            id: row.get(0)?,
            routine_id: row.get(1)?,
            routine_name: row.get(2)?,
            routine_type: row.get(3)?,
            duration_minutes: row.get(4)?,
            intensity: Intensity::from_db(&intensity),
            timestamp: ts_from_column(6, &ts)?,
        })
    };
    let rows = if let Some(since) = since {
        let since_str = since.format("%Y-%m-%d").to_string();
        stmt.query_map(named_params! { ":since": since_str }, map_row)
            .map_err(DbError::QueryFailed)?
            .collect::<Result<Vec<_>, _>>()
    } else {
        stmt.query_map([], map_row)
            .map_err(DbError::QueryFailed)?
            .collect::<Result<Vec<_>, _>>()
    };
    rows.map_err(DbError::QueryFailed)
}

/// Distinct exercise names completed at or after `cutoff`, used to
/// keep suggestions from repeating what was just done.
pub fn recent_exercise_names(
    conn: &Connection,
    cutoff: NaiveDateTime,
) -> Result<Vec<String>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT name FROM exercise_completions
             WHERE completed = 1 AND timestamp >= :cutoff",
        )
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(
            named_params! { ":cutoff": ts_to_string(cutoff) },
            |row| row.get::<_, String>(0),
        )
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}
