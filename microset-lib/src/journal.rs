//src/journal.rs
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::Intensity;

pub const LOG_FILE_NAME: &str = "log.md";

fn journal_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE_NAME)
}

/// Appends one checked-off entry to the human-readable log, creating
/// the file and the current day's header as needed.
pub fn append(
    root: &Path,
    text: &str,
    category: &str,
    intensity: Intensity,
    now: DateTime<Local>,
) -> std::io::Result<()> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }
    let path = journal_path(root);
    let header = format!("## {}", now.format("%Y-%m-%d"));

    if !path.exists() {
        fs::write(&path, "# Workout Log\n\n---\n")?;
    }

    let content = fs::read_to_string(&path)?;
    let mut file = OpenOptions::new().append(true).open(&path)?;
    if !content.contains(&header) {
        writeln!(file, "\n{header}\n")?;
    }
    writeln!(
        file,
        "- [x] {} - **{text}** [{category}] ({intensity})",
        now.format("%H:%M")
    )?;
    Ok(())
}
