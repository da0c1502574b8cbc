//src/day.rs
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DAY_FILE_NAME: &str = "day.json";

#[derive(Error, Debug)]
pub enum DayError {
    #[error("I/O error accessing day state: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize day state: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MorningStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl std::fmt::Display for MorningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MorningStatus::Pending => write!(f, "pending"),
            MorningStatus::Completed => write!(f, "completed"),
            MorningStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MorningState {
    pub status: MorningStatus,
    pub completed_at: Option<DateTime<Local>>,
    pub routine_used: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct WorkoutQueue {
    pub queued: bool,
    pub routine_id: Option<String>,
    pub routine_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub trigger: Option<String>,
    pub trigger_description: Option<String>,
    pub queued_at: Option<DateTime<Local>>,
    pub triggered_at: Option<DateTime<Local>>,
}

/// Per-calendar-day mutable state. The document has a one-day
/// lifecycle: loading on a later date discards it wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayState {
    pub date: NaiveDate,
    pub morning: MorningState,
    pub workout_queue: WorkoutQueue,
    pub deep_work_start: Option<DateTime<Local>>,
}

impl DayState {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            morning: MorningState::default(),
            workout_queue: WorkoutQueue::default(),
            deep_work_start: None,
        }
    }
}

fn day_path(root: &Path) -> PathBuf {
    root.join(DAY_FILE_NAME)
}

/// Loads the day state for `today`, resetting to defaults (and
/// persisting the reset) when the stored date is stale or the document
/// is missing/unreadable.
pub fn load(root: &Path, today: NaiveDate) -> Result<DayState, DayError> {
    let path = day_path(root);
    if path.exists() {
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str::<DayState>(&content) {
            Ok(state) if state.date == today => return Ok(state),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("day state at {:?} failed to parse: {e}; resetting", path);
            }
        }
    }
    let fresh = DayState::for_date(today);
    save(root, &fresh)?;
    Ok(fresh)
}

/// Saves the day state wholesale.
pub fn save(root: &Path, state: &DayState) -> Result<(), DayError> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    let content = serde_json::to_string_pretty(state)?;
    fs::write(day_path(root), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fresh_load_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let today = date(2025, 3, 10);
        let state = load(dir.path(), today).unwrap();
        assert_eq!(state.date, today);
        assert_eq!(state.morning.status, MorningStatus::Pending);
        assert!(!state.workout_queue.queued);
        assert!(dir.path().join(DAY_FILE_NAME).exists());
    }

    #[test]
    fn stale_date_resets_and_persists_new_date() {
        let dir = tempfile::tempdir().unwrap();
        let monday = date(2025, 3, 10);
        let mut state = load(dir.path(), monday).unwrap();
        state.morning.status = MorningStatus::Completed;
        state.workout_queue.queued = true;
        save(dir.path(), &state).unwrap();

        let tuesday = date(2025, 3, 11);
        let rolled = load(dir.path(), tuesday).unwrap();
        assert_eq!(rolled.date, tuesday);
        assert_eq!(rolled.morning.status, MorningStatus::Pending);
        assert!(!rolled.workout_queue.queued);

        // The written-back document reflects the new date.
        let content = fs::read_to_string(dir.path().join(DAY_FILE_NAME)).unwrap();
        let on_disk: DayState = serde_json::from_str(&content).unwrap();
        assert_eq!(on_disk.date, tuesday);
    }

    #[test]
    fn same_date_preserves_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let today = date(2025, 3, 10);
        let mut state = load(dir.path(), today).unwrap();
        state.morning.status = MorningStatus::Skipped;
        save(dir.path(), &state).unwrap();

        let again = load(dir.path(), today).unwrap();
        assert_eq!(again.morning.status, MorningStatus::Skipped);
    }

    #[test]
    fn corrupt_document_resets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DAY_FILE_NAME), "{ not json").unwrap();
        let today = date(2025, 3, 10);
        let state = load(dir.path(), today).unwrap();
        assert_eq!(state.date, today);
        assert_eq!(state.morning.status, MorningStatus::Pending);
    }
}
