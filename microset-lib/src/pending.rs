//src/pending.rs
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::ExerciseDef;

pub const PENDING_FILE_NAME: &str = "pending.json";
pub const LAST_SUGGESTED_FILE_NAME: &str = "last_suggested";

#[derive(Error, Debug)]
pub enum PendingError {
    #[error("I/O error accessing pending suggestion: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize pending suggestion: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The single in-flight suggestion. A new suggestion overwrites any
/// prior one; completing or skipping deletes the document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingSuggestion {
    pub kind: String,
    pub display: String,
    pub exercise: ExerciseDef,
    pub task_description: String,
    pub suggested_at: DateTime<Local>,
}

fn pending_path(root: &Path) -> PathBuf {
    root.join(PENDING_FILE_NAME)
}

fn stamp_path(root: &Path) -> PathBuf {
    root.join(LAST_SUGGESTED_FILE_NAME)
}

/// Reads the pending document; absent or unreadable means none.
pub fn load(root: &Path) -> Option<PendingSuggestion> {
    let path = pending_path(root);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(pending) => Some(pending),
        Err(e) => {
            tracing::warn!("pending suggestion at {:?} failed to parse: {e}", path);
            None
        }
    }
}

pub fn store(root: &Path, pending: &PendingSuggestion) -> Result<(), PendingError> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    let content = serde_json::to_string_pretty(pending)?;
    fs::write(pending_path(root), content)?;
    Ok(())
}

/// Deletes the pending document. Returns whether one existed.
pub fn clear(root: &Path) -> Result<bool, PendingError> {
    match fs::remove_file(pending_path(root)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// When a suggestion was last issued. This stamp drives the cooldown
/// and survives complete/skip, which only remove the pending document.
pub fn last_suggested(root: &Path) -> Option<DateTime<Local>> {
    let content = fs::read_to_string(stamp_path(root)).ok()?;
    match content.trim().parse::<DateTime<Local>>() {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!("last-suggested stamp failed to parse: {e}");
            None
        }
    }
}

pub fn stamp_last_suggested(root: &Path, now: DateTime<Local>) -> Result<(), PendingError> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    fs::write(stamp_path(root), now.to_rfc3339())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Intensity, Unit};

    fn sample(now: DateTime<Local>) -> PendingSuggestion {
        PendingSuggestion {
            kind: "exercise".into(),
            display: "10 pushups".into(),
            exercise: ExerciseDef {
                name: "pushups".into(),
                count: 10,
                unit: Unit::Reps,
                category: "upper".into(),
                intensity: Intensity::Moderate,
                equipment: None,
                custom: false,
            },
            task_description: "writing tests".into(),
            suggested_at: now,
        }
    }

    #[test]
    fn store_load_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).is_none());

        let pending = sample(Local::now());
        store(dir.path(), &pending).unwrap();
        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.display, "10 pushups");
        assert_eq!(loaded.task_description, "writing tests");

        assert!(clear(dir.path()).unwrap());
        assert!(load(dir.path()).is_none());
        // Clearing twice is not an error.
        assert!(!clear(dir.path()).unwrap());
    }

    #[test]
    fn stamp_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        assert!(last_suggested(dir.path()).is_none());

        let now = Local::now();
        stamp_last_suggested(dir.path(), now).unwrap();
        let read = last_suggested(dir.path()).unwrap();
        assert_eq!(read.timestamp(), now.timestamp());
    }
}
