// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use rusqlite::Connection;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod catalog;
mod config;
pub mod day;
pub mod db;
mod journal;
pub mod logging;
pub mod notify;
mod pending;

// --- Expose public types ---
pub use catalog::{
    ExerciseDef, IdRecord, Intensity, IntensityPreference, RoutineDef, RoutineExercise,
    RoutinesData, Unit, WeeklyPattern,
};
pub use config::{parse_cli_value, Config, ConfigError, QuietHours};
pub use day::{DayState, MorningStatus, WorkoutQueue};
pub use db::{CategoryStat, DbError, ExerciseCompletion, RoutineCompletion, TodayStats};
pub use pending::PendingSuggestion;

/// Environment variable selecting the root storage directory. All
/// persisted documents live under it.
pub const DATA_DIR_ENV_VAR: &str = "MICROSET_DIR";

const APP_DIR_NAME: &str = "microset";

/// Suggestions avoid exercise names completed within this window,
/// unless that would empty the pool.
const RECENT_AVOIDANCE_HOURS: i64 = 3;

/// Resolves the storage root: `$MICROSET_DIR` if set, else the
/// platform data directory.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::data_dir().ok_or(ConfigError::CannotDetermineDataDir)?;
    Ok(base.join(APP_DIR_NAME))
}

/// Time periods for the history views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    Today,
    Week,
    Month,
    AllTime,
}

impl HistoryPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            HistoryPeriod::Today => "Today",
            HistoryPeriod::Week => "This Week",
            HistoryPeriod::Month => "This Month",
            HistoryPeriod::AllTime => "All Time",
        }
    }

    /// First date included in the period, `None` for all-time.
    /// Weeks start on Monday.
    pub fn since(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            HistoryPeriod::Today => Some(today),
            HistoryPeriod::Week => {
                let back = i64::from(today.weekday().num_days_from_monday());
                Some(today - Duration::days(back))
            }
            HistoryPeriod::Month => today.with_day(1),
            HistoryPeriod::AllTime => None,
        }
    }
}

/// Aggregated history for one period.
#[derive(Debug, Clone, Default)]
pub struct HistoryData {
    pub exercises: Vec<ExerciseCompletion>,
    pub routines: Vec<RoutineCompletion>,
    /// Reps per category, highest first.
    pub category_reps: Vec<(String, u32)>,
    /// Reps per day, oldest first.
    pub daily_reps: Vec<(NaiveDate, u32)>,
    pub total_reps: u32,
    pub total_routines: u32,
    pub total_routine_minutes: u32,
}

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    root: PathBuf,
    config_path: PathBuf,
}

impl AppService {
    /// Initializes the service at the default storage root.
    /// # Errors
    /// Returns `anyhow::Error` if the root cannot be determined or the
    /// config/database cannot be opened.
    pub fn initialize() -> Result<Self> {
        let root = default_data_dir().context("Failed to determine storage directory")?;
        Self::initialize_at(root)
    }

    /// Initializes the service at an explicit storage root.
    pub fn initialize_at(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create storage directory {root:?}"))?;
        let config_path = root.join(config::CONFIG_FILE_NAME);
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        let conn = db::open(&root).context("Failed to open completion store")?;
        db::init(&conn).context("Failed to initialize completion store schema")?;
        Ok(Self {
            config,
            conn,
            root,
            config_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    // --- Configuration mutations (each persists wholesale) ---

    pub fn set_theme(&mut self, theme: &str) -> Result<(), ConfigError> {
        self.config.theme = theme.to_string();
        self.save_config()
    }

    pub fn set_intensity_preference(
        &mut self,
        preference: IntensityPreference,
    ) -> Result<(), ConfigError> {
        self.config.intensity_preference = preference;
        self.save_config()
    }

    pub fn set_weekly_pattern(&mut self, pattern_id: &str) -> Result<(), ConfigError> {
        self.config.weekly_pattern = pattern_id.to_string();
        self.save_config()
    }

    /// Replaces the equipment selection; an empty selection falls back
    /// to bodyweight-only.
    pub fn set_equipment(&mut self, equipment: Vec<String>) -> Result<(), ConfigError> {
        self.config.equipment = if equipment.is_empty() {
            vec!["none".to_string()]
        } else {
            equipment
        };
        self.save_config()
    }

    /// Enables exactly the named categories, disabling the rest.
    pub fn set_enabled_categories(&mut self, enabled: &[String]) -> Result<(), ConfigError> {
        for (name, flag) in self.config.categories.iter_mut() {
            *flag = enabled.iter().any(|e| e == name);
        }
        self.save_config()
    }

    pub fn add_custom_exercise(&mut self, mut def: ExerciseDef) -> Result<(), ConfigError> {
        def.custom = true;
        self.config.custom_exercises.push(def);
        self.save_config()
    }

    pub fn update_custom_exercise(
        &mut self,
        index: usize,
        def: ExerciseDef,
    ) -> Result<(), ConfigError> {
        let slot = self
            .config
            .custom_exercises
            .get_mut(index)
            .ok_or(ConfigError::NoSuchCustomEntry(index))?;
        *slot = def;
        self.save_config()
    }

    pub fn delete_custom_exercise(&mut self, index: usize) -> Result<ExerciseDef, ConfigError> {
        if index >= self.config.custom_exercises.len() {
            return Err(ConfigError::NoSuchCustomEntry(index));
        }
        let removed = self.config.custom_exercises.remove(index);
        self.save_config()?;
        Ok(removed)
    }

    /// Adds a custom routine, generating a short id when absent.
    pub fn add_custom_routine(&mut self, mut def: RoutineDef) -> Result<String, ConfigError> {
        if def.id.is_empty() {
            def.id = short_id();
        }
        def.custom = true;
        let id = def.id.clone();
        self.config.custom_routines.push(def);
        self.save_config()?;
        Ok(id)
    }

    pub fn update_custom_routine(
        &mut self,
        index: usize,
        def: RoutineDef,
    ) -> Result<(), ConfigError> {
        let slot = self
            .config
            .custom_routines
            .get_mut(index)
            .ok_or(ConfigError::NoSuchCustomEntry(index))?;
        *slot = def;
        self.save_config()
    }

    pub fn delete_custom_routine(&mut self, index: usize) -> Result<RoutineDef, ConfigError> {
        if index >= self.config.custom_routines.len() {
            return Err(ConfigError::NoSuchCustomEntry(index));
        }
        let removed = self.config.custom_routines.remove(index);
        self.save_config()?;
        Ok(removed)
    }

    /// Adds a custom exercise from user-supplied JSON, validating the
    /// required fields before anything is persisted.
    /// # Errors
    /// Returns `anyhow::Error` with a user-facing message for invalid
    /// JSON or missing fields; the configuration is left untouched.
    pub fn add_custom_exercise_json(&mut self, raw: &str) -> Result<ExerciseDef> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Invalid JSON: {e}"))?;
        for field in ["name", "count", "category", "intensity"] {
            if value.get(field).is_none() {
                bail!("Missing required field '{field}'");
            }
        }
        let mut def: ExerciseDef = serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("Invalid exercise definition: {e}"))?;
        def.custom = true;
        self.config.custom_exercises.push(def.clone());
        self.save_config()?;
        Ok(def)
    }

    // --- Dotted-key configuration access ---

    /// The full configuration as a JSON value (the `config-get` body).
    pub fn config_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(&self.config).map_err(ConfigError::Serialize)
    }

    /// Sets a dot-nested key from a raw CLI value and persists.
    /// Returns the parsed value for echoing.
    pub fn config_set(&mut self, key: &str, raw: &str) -> Result<Value, ConfigError> {
        let value = config::parse_cli_value(raw);
        self.config = config::set_by_key(&self.config, key, value.clone())?;
        self.save_config()?;
        Ok(value)
    }

    /// Adds a value to a list-valued key. Returns the parsed value and
    /// whether it was newly added.
    pub fn config_add(&mut self, key: &str, raw: &str) -> Result<(Value, bool), ConfigError> {
        let value = config::parse_cli_value(raw);
        let (updated, added) = config::add_to_list(&self.config, key, value.clone())?;
        if added {
            self.config = updated;
            self.save_config()?;
        }
        Ok((value, added))
    }

    /// Removes a value from a list-valued key.
    pub fn config_remove(&mut self, key: &str, raw: &str) -> Result<(Value, bool), ConfigError> {
        let value = config::parse_cli_value(raw);
        let (updated, removed) = config::remove_from_list(&self.config, key, value.clone())?;
        if removed {
            self.config = updated;
            self.save_config()?;
        }
        Ok((value, removed))
    }

    // --- Catalog ---

    /// All exercise definitions: bundled plus user customs.
    pub fn exercises(&self) -> Vec<ExerciseDef> {
        let mut all = catalog::bundled_exercises();
        all.extend(self.config.custom_exercises.iter().cloned());
        all
    }

    /// All routine definitions: bundled samples plus user customs.
    pub fn routines(&self) -> Vec<RoutineDef> {
        let mut all = catalog::routines_data().sample_routines;
        all.extend(self.config.custom_routines.iter().cloned());
        all
    }

    /// The bundled routine metadata (types, equipment, patterns).
    pub fn routines_data(&self) -> RoutinesData {
        catalog::routines_data()
    }

    /// Finds a routine by id, or by name case-insensitively.
    pub fn find_routine(&self, identifier: &str) -> Option<RoutineDef> {
        self.routines()
            .into_iter()
            .find(|r| r.id == identifier || r.name.eq_ignore_ascii_case(identifier))
    }

    /// Focus categories for a weekday name (lowercase), per the active
    /// weekly pattern. `None` when the pattern has no schedule.
    pub fn focus_for_day(&self, weekday: &str) -> Option<Vec<String>> {
        let data = catalog::routines_data();
        let pattern = data
            .weekly_patterns
            .iter()
            .find(|p| p.id == self.config.weekly_pattern)?;
        let schedule = pattern.schedule.as_ref()?;
        Some(schedule.get(weekday).cloned().unwrap_or_default())
    }

    pub fn todays_focus(&self) -> Option<Vec<String>> {
        self.focus_for_day(&weekday_name(Local::now()))
    }

    // --- Completion logging ---

    /// Records one exercise completion and appends it to the journal.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store or journal failures.
    pub fn log_exercise(
        &self,
        name: &str,
        count: u32,
        unit: Unit,
        category: &str,
        intensity: Intensity,
        task_description: &str,
    ) -> Result<i64> {
        let now = Local::now();
        let id = db::add_exercise_completion(
            &self.conn,
            &db::NewExerciseCompletion {
                name,
                count,
                unit,
                category,
                intensity,
                task_description,
                timestamp: now.naive_local(),
            },
        )
        .context("Failed to record exercise completion")?;

        let text = match unit {
            Unit::Reps => format!("{count} {name}"),
            unit => format!("{count} {unit} {name}"),
        };
        journal::append(&self.root, &text, category, intensity, now)
            .context("Failed to append journal entry")?;
        Ok(id)
    }

    /// Records one routine completion and appends it to the journal.
    pub fn log_routine(&self, routine: &RoutineDef, task_description: &str) -> Result<i64> {
        let now = Local::now();
        let id = db::add_routine_completion(
            &self.conn,
            &db::NewRoutineCompletion {
                routine_id: &routine.id,
                routine_name: &routine.name,
                routine_type: &routine.kind,
                duration_minutes: routine.duration_minutes,
                intensity: routine.intensity,
                task_description,
                timestamp: now.naive_local(),
            },
        )
        .context("Failed to record routine completion")?;

        let text = format!("{} ({} min)", routine.name, routine.duration_minutes);
        journal::append(&self.root, &text, &routine.kind, routine.intensity, now)
            .context("Failed to append journal entry")?;
        Ok(id)
    }

    // --- Suggestions ---

    /// The exercises eligible for suggestion right now: filtered by
    /// owned equipment, enabled categories, intensity preference, and
    /// recent-exercise avoidance. The last two filters are skipped
    /// when they would empty the pool.
    pub fn suggestion_pool(&self, now: DateTime<Local>) -> Result<Vec<ExerciseDef>> {
        let mut owned: BTreeSet<&str> = self.config.equipment.iter().map(String::as_str).collect();
        owned.insert("none");

        let mut pool: Vec<ExerciseDef> = self
            .exercises()
            .into_iter()
            .filter(|e| match &e.equipment {
                None => true,
                Some(required) => required.iter().any(|r| owned.contains(r.as_str())),
            })
            .filter(|e| self.config.categories.get(&e.category).copied().unwrap_or(true))
            .collect();

        let preference = self.config.intensity_preference;
        let preferred: Vec<ExerciseDef> = pool
            .iter()
            .filter(|e| preference.accepts(e.intensity))
            .cloned()
            .collect();
        if !preferred.is_empty() {
            pool = preferred;
        }

        let cutoff = (now - Duration::hours(RECENT_AVOIDANCE_HOURS)).naive_local();
        let recent = db::recent_exercise_names(&self.conn, cutoff)
            .context("Failed to look up recent completions")?;
        let fresh: Vec<ExerciseDef> = pool
            .iter()
            .filter(|e| !recent.contains(&e.name))
            .cloned()
            .collect();
        if !fresh.is_empty() {
            pool = fresh;
        }

        Ok(pool)
    }

    /// Picks one suggestion from the current pool, or `None` when
    /// nothing matches the filters.
    pub fn pick_suggestion(&self, now: DateTime<Local>) -> Result<Option<ExerciseDef>> {
        let pool = self.suggestion_pool(now)?;
        if pool.is_empty() {
            return Ok(None);
        }
        let index = pick_index(pool.len());
        Ok(pool.into_iter().nth(index))
    }

    /// One-shot suggestion for automation hooks: silently does nothing
    /// when disabled, inside quiet hours, or within the cooldown
    /// window; otherwise writes the pending document plus the cooldown
    /// stamp and returns the display line.
    pub fn suggest_for_hook(
        &self,
        task: Option<&str>,
        now: DateTime<Local>,
    ) -> Result<Option<String>> {
        if !self.config.enabled {
            return Ok(None);
        }
        if self.config.quiet_hours.contains(now.time()) {
            return Ok(None);
        }
        if let Some(last) = pending::last_suggested(&self.root) {
            let cooldown = Duration::minutes(self.config.cooldown_minutes as i64);
            if now.signed_duration_since(last) < cooldown {
                return Ok(None);
            }
        }

        let Some(exercise) = self.pick_suggestion(now)? else {
            return Ok(None);
        };
        let display = exercise.display_line();
        let record = PendingSuggestion {
            kind: "exercise".to_string(),
            display: display.clone(),
            exercise,
            task_description: task.unwrap_or("task").to_string(),
            suggested_at: now,
        };
        pending::store(&self.root, &record).context("Failed to write pending suggestion")?;
        pending::stamp_last_suggested(&self.root, now)
            .context("Failed to write cooldown stamp")?;
        Ok(Some(display))
    }

    pub fn pending(&self) -> Option<PendingSuggestion> {
        pending::load(&self.root)
    }

    /// Consumes the pending suggestion: records the completion, fires
    /// a notification, deletes the document. `None` when nothing was
    /// pending.
    pub fn complete_pending(&self) -> Result<Option<PendingSuggestion>> {
        let Some(record) = pending::load(&self.root) else {
            return Ok(None);
        };
        let exercise = &record.exercise;
        self.log_exercise(
            &exercise.name,
            exercise.count,
            exercise.unit,
            &exercise.category,
            exercise.intensity,
            &record.task_description,
        )?;
        let stats = self.stats_today()?;
        notify::notify(
            "microset",
            "Logged!",
            &format!("Today: {} reps", stats.reps),
        );
        pending::clear(&self.root).context("Failed to clear pending suggestion")?;
        Ok(Some(record))
    }

    /// Deletes the pending suggestion without recording anything.
    /// Returns whether one existed.
    pub fn skip_pending(&self) -> Result<bool> {
        pending::clear(&self.root).context("Failed to clear pending suggestion")
    }

    // --- Day state ---

    pub fn day_state(&self) -> Result<DayState, day::DayError> {
        day::load(&self.root, Local::now().date_naive())
    }

    pub fn morning_complete(&self, routine: Option<&str>) -> Result<DayState, day::DayError> {
        let now = Local::now();
        let mut state = day::load(&self.root, now.date_naive())?;
        state.morning.status = MorningStatus::Completed;
        state.morning.completed_at = Some(now);
        if let Some(routine) = routine {
            state.morning.routine_used = Some(routine.to_string());
        }
        day::save(&self.root, &state)?;
        Ok(state)
    }

    pub fn morning_skip(&self) -> Result<DayState, day::DayError> {
        let now = Local::now();
        let mut state = day::load(&self.root, now.date_naive())?;
        state.morning.status = MorningStatus::Skipped;
        day::save(&self.root, &state)?;
        Ok(state)
    }

    /// Queues a routine for later. `None` when the identifier matches
    /// no routine.
    pub fn queue_routine(
        &self,
        identifier: &str,
        trigger_type: &str,
        description: Option<&str>,
    ) -> Result<Option<WorkoutQueue>> {
        let Some(routine) = self.find_routine(identifier) else {
            return Ok(None);
        };
        let now = Local::now();
        let mut state = day::load(&self.root, now.date_naive())?;
        state.workout_queue = WorkoutQueue {
            queued: true,
            routine_id: Some(routine.id.clone()),
            routine_name: Some(routine.name.clone()),
            duration_minutes: Some(routine.duration_minutes),
            trigger: Some(trigger_type.to_string()),
            trigger_description: description.map(str::to_string),
            queued_at: Some(now),
            triggered_at: None,
        };
        day::save(&self.root, &state)?;
        Ok(Some(state.workout_queue))
    }

    /// Fires the queued workout: stamps `triggered_at` and sends one
    /// notification. `None` when nothing is queued.
    pub fn trigger_queue(&self) -> Result<Option<WorkoutQueue>> {
        let now = Local::now();
        let mut state = day::load(&self.root, now.date_naive())?;
        if !state.workout_queue.queued {
            return Ok(None);
        }
        state.workout_queue.triggered_at = Some(now);
        day::save(&self.root, &state)?;

        let queue = &state.workout_queue;
        let routine_name = queue.routine_name.as_deref().unwrap_or("workout");
        let subtitle = match queue.duration_minutes {
            Some(minutes) => format!("{minutes} min"),
            None => String::new(),
        };
        let body = queue
            .trigger_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("{routine_name}: {d}"))
            .unwrap_or_else(|| routine_name.to_string());
        notify::notify("Workout time!", &subtitle, &body);

        Ok(Some(state.workout_queue))
    }

    /// Clears the workout queue back to defaults.
    pub fn cancel_queue(&self) -> Result<WorkoutQueue, day::DayError> {
        let now = Local::now();
        let mut state = day::load(&self.root, now.date_naive())?;
        state.workout_queue = WorkoutQueue::default();
        day::save(&self.root, &state)?;
        Ok(state.workout_queue)
    }

    // --- Stats & history ---

    pub fn stats_today(&self) -> Result<TodayStats> {
        self.stats_for(Local::now().date_naive())
    }

    pub fn stats_for(&self, date: NaiveDate) -> Result<TodayStats> {
        db::day_stats(&self.conn, date).context("Failed to aggregate day stats")
    }

    /// Aggregated history for a period ending today.
    pub fn history(&self, period: HistoryPeriod, today: NaiveDate) -> Result<HistoryData> {
        let since = period.since(today);
        let exercises = db::list_exercise_completions(&self.conn, since)
            .context("Failed to list exercise completions")?;
        let routines = db::list_routine_completions(&self.conn, since)
            .context("Failed to list routine completions")?;

        let mut by_category: std::collections::BTreeMap<String, u32> = Default::default();
        let mut by_day: std::collections::BTreeMap<NaiveDate, u32> = Default::default();
        let mut total_reps = 0u32;
        for completion in &exercises {
            *by_category.entry(completion.category.clone()).or_default() += completion.count;
            *by_day.entry(completion.timestamp.date()).or_default() += completion.count;
            total_reps += completion.count;
        }
        let mut category_reps: Vec<(String, u32)> = by_category.into_iter().collect();
        category_reps.sort_by(|a, b| b.1.cmp(&a.1));

        let total_routine_minutes = routines.iter().map(|r| r.duration_minutes).sum();

        Ok(HistoryData {
            total_reps,
            total_routines: routines.len() as u32,
            total_routine_minutes,
            category_reps,
            daily_reps: by_day.into_iter().collect(),
            exercises,
            routines,
        })
    }
}

// --- Helper Functions ---

/// Lowercase weekday name ("monday".."sunday") for schedule lookups.
pub fn weekday_name(now: DateTime<Local>) -> String {
    now.format("%A").to_string().to_lowercase()
}

/// Index into a suggestion pool, derived from the subsecond clock.
fn pick_index(len: usize) -> usize {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    nanos as usize % len
}

/// Short identifier for custom routines.
fn short_id() -> String {
    let full = uuid::Uuid::new_v4().simple().to_string();
    full[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_index_stays_in_bounds() {
        for len in 1..20 {
            let index = pick_index(len);
            assert!(index < len);
        }
    }

    #[test]
    fn short_ids_are_short_and_distinct() {
        let a = short_id();
        let b = short_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn history_period_boundaries() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(HistoryPeriod::Today.since(wednesday), Some(wednesday));
        assert_eq!(
            HistoryPeriod::Week.since(wednesday),
            NaiveDate::from_ymd_opt(2025, 3, 10)
        );
        assert_eq!(
            HistoryPeriod::Month.since(wednesday),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(HistoryPeriod::AllTime.since(wednesday), None);
    }
}
