//src/config.rs
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{ExerciseDef, IntensityPreference, RoutineDef};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine data directory.")]
    CannotDetermineDataDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (JSON): {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config data: {0}")]
    Serialize(serde_json::Error),
    #[error("Config key '{0}' does not hold a list")]
    NotAList(String),
    #[error("Config key '{0}' cannot be set: {1}")]
    InvalidValue(String, String),
    #[error("No custom entry at index {0}")]
    NoSuchCustomEntry(usize),
}

/// Quiet-hours window during which automated suggestions stay silent.
/// `start`/`end` are "HH:MM"; the window may cross midnight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: "22:00".to_string(),
            end: "08:00".to_string(),
        }
    }
}

impl QuietHours {
    pub fn contains(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        let (Some(start), Some(end)) = (parse_hhmm(&self.start), parse_hhmm(&self.end)) else {
            tracing::warn!(
                "quiet_hours window '{}'..'{}' is not HH:MM; ignoring",
                self.start,
                self.end
            );
            return false;
        };
        if start <= end {
            now >= start && now < end
        } else {
            // Window crosses midnight, e.g. 22:00..08:00.
            now >= start || now < end
        }
    }
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

fn default_categories() -> BTreeMap<String, bool> {
    ["legs", "upper", "cardio", "core", "mobility", "full"]
        .into_iter()
        .map(|c| (c.to_string(), true))
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub enabled: bool,
    pub cooldown_minutes: u64,
    pub theme: String,
    pub categories: BTreeMap<String, bool>,
    pub intensity_preference: IntensityPreference,
    pub equipment: Vec<String>,
    pub weekly_pattern: String,
    pub custom_exercises: Vec<ExerciseDef>,
    pub custom_routines: Vec<RoutineDef>,
    pub quiet_hours: QuietHours,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_minutes: 30,
            theme: "fire".to_string(),
            categories: default_categories(),
            intensity_preference: IntensityPreference::default(),
            equipment: vec!["none".to_string()],
            weekly_pattern: "freestyle".to_string(),
            custom_exercises: Vec::new(),
            custom_routines: Vec::new(),
            quiet_hours: QuietHours::default(),
        }
    }
}

impl Config {
    /// Category names currently enabled for suggestions.
    pub fn enabled_categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Loads the configuration document, filling missing keys from
/// defaults. A missing file is created with defaults.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)?;
        // Field-level #[serde(default)] fills anything the document omits.
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    } else {
        let config = Config::default();
        save(config_path, &config)?;
        Ok(config)
    }
}

/// Saves the configuration wholesale.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    fs::write(config_path, content)?;
    Ok(())
}

/// Parses a CLI-supplied value: JSON first, then boolean keywords,
/// then the raw string.
pub fn parse_cli_value(raw: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return value;
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn to_value(config: &Config) -> Result<Value, ConfigError> {
    serde_json::to_value(config).map_err(ConfigError::Serialize)
}

fn from_value(key: &str, value: Value) -> Result<Config, ConfigError> {
    serde_json::from_value(value)
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

/// Sets a (possibly dot-nested) key and returns the resulting
/// configuration. The edit is validated against the schema before it
/// is accepted, so a bad value never reaches disk.
pub fn set_by_key(config: &Config, key: &str, value: Value) -> Result<Config, ConfigError> {
    let mut doc = to_value(config)?;
    let mut target = &mut doc;
    let segments: Vec<&str> = key.split('.').collect();
    for segment in &segments[..segments.len() - 1] {
        let obj = target
            .as_object_mut()
            .ok_or_else(|| ConfigError::InvalidValue(key.to_string(), "not an object".into()))?;
        target = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    let leaf = segments[segments.len() - 1];
    let obj = target
        .as_object_mut()
        .ok_or_else(|| ConfigError::InvalidValue(key.to_string(), "not an object".into()))?;
    obj.insert(leaf.to_string(), value);
    from_value(key, doc)
}

fn list_at<'a>(doc: &'a mut Value, key: &str) -> Result<&'a mut Vec<Value>, ConfigError> {
    let mut target = doc;
    for segment in key.split('.') {
        let obj = target
            .as_object_mut()
            .ok_or_else(|| ConfigError::NotAList(key.to_string()))?;
        target = obj
            .get_mut(segment)
            .ok_or_else(|| ConfigError::NotAList(key.to_string()))?;
    }
    target
        .as_array_mut()
        .ok_or_else(|| ConfigError::NotAList(key.to_string()))
}

/// Appends a value to a list-valued key (deduplicating). Returns the
/// new configuration and whether the value was actually added.
pub fn add_to_list(
    config: &Config,
    key: &str,
    value: Value,
) -> Result<(Config, bool), ConfigError> {
    let mut doc = to_value(config)?;
    let list = list_at(&mut doc, key)?;
    if list.contains(&value) {
        return Ok((config.clone(), false));
    }
    list.push(value);
    Ok((from_value(key, doc)?, true))
}

/// Removes a value from a list-valued key. Returns the new
/// configuration and whether the value was present.
pub fn remove_from_list(
    config: &Config,
    key: &str,
    value: Value,
) -> Result<(Config, bool), ConfigError> {
    let mut doc = to_value(config)?;
    let list = list_at(&mut doc, key)?;
    let before = list.len();
    list.retain(|item| item != &value);
    if list.len() == before {
        return Ok((config.clone(), false));
    }
    Ok((from_value(key, doc)?, true))
}
