//src/catalog.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

// Bundled catalog documents, compiled into the binary. User customs
// live in the configuration and are merged on top by the callers.
const BUNDLED_EXERCISES: &str = include_str!("../data/exercises.json");
const BUNDLED_ROUTINES: &str = include_str!("../data/routines.json");

/// How an exercise count is measured.
///
/// The wire names match the stored documents ("each side", not
/// "each_side"), so definitions written by older versions keep parsing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum Unit {
    #[default]
    #[serde(rename = "reps")]
    Reps,
    #[serde(rename = "seconds")]
    Seconds,
    #[serde(rename = "each side")]
    EachSide,
    #[serde(rename = "each direction")]
    EachDirection,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Reps => write!(f, "reps"),
            Unit::Seconds => write!(f, "seconds"),
            Unit::EachSide => write!(f, "each side"),
            Unit::EachDirection => write!(f, "each direction"),
        }
    }
}

impl Unit {
    pub fn all() -> Vec<Unit> {
        Unit::iter().collect()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Unit::Reps => "Reps",
            Unit::Seconds => "Seconds",
            Unit::EachSide => "Each side",
            Unit::EachDirection => "Each direction",
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Unit::Reps => "Count repetitions (e.g., 10 pushups)",
            Unit::Seconds => "Timed hold (e.g., 30 second plank)",
            Unit::EachSide => "Per-side count (e.g., 10 each side)",
            Unit::EachDirection => "Per-direction count (e.g., 10 each direction)",
        }
    }

    /// Lenient parse for values read back from the store.
    pub fn from_db(value: &str) -> Self {
        match value {
            "seconds" => Unit::Seconds,
            "each side" => Unit::EachSide,
            "each direction" => Unit::EachDirection,
            _ => Unit::Reps,
        }
    }

    /// Render a count with its unit, omitting the implied "reps".
    pub fn display_count(self, count: u32) -> String {
        match self {
            Unit::Reps => count.to_string(),
            other => format!("{count} {other}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Gentle,
    #[default]
    Moderate,
    Intense,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Gentle => write!(f, "gentle"),
            Intensity::Moderate => write!(f, "moderate"),
            Intensity::Intense => write!(f, "intense"),
        }
    }
}

impl Intensity {
    pub fn all() -> Vec<Intensity> {
        Intensity::iter().collect()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Intensity::Gentle => "Gentle",
            Intensity::Moderate => "Moderate",
            Intensity::Intense => "Intense",
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Intensity::Gentle => "Easy, can do anytime",
            Intensity::Moderate => "Real work, sustainable",
            Intensity::Intense => "Heart rate up, sweat likely",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "gentle" => Intensity::Gentle,
            "intense" => Intensity::Intense,
            _ => Intensity::Moderate,
        }
    }
}

/// The user's standing preference; `Mixed` accepts every intensity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum IntensityPreference {
    Gentle,
    Moderate,
    Intense,
    #[default]
    Mixed,
}

impl IntensityPreference {
    pub fn all() -> Vec<IntensityPreference> {
        IntensityPreference::iter().collect()
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntensityPreference::Gentle => "Gentle",
            IntensityPreference::Moderate => "Moderate",
            IntensityPreference::Intense => "Intense",
            IntensityPreference::Mixed => "Mixed",
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            IntensityPreference::Gentle => "Morning park vibes, easy movement",
            IntensityPreference::Moderate => "Real work, but sustainable",
            IntensityPreference::Intense => "Heart rate up, sweat expected",
            IntensityPreference::Mixed => "Vary based on time available",
        }
    }

    pub fn accepts(self, intensity: Intensity) -> bool {
        match self {
            IntensityPreference::Mixed => true,
            IntensityPreference::Gentle => intensity == Intensity::Gentle,
            IntensityPreference::Moderate => intensity == Intensity::Moderate,
            IntensityPreference::Intense => intensity == Intensity::Intense,
        }
    }
}

impl fmt::Display for IntensityPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntensityPreference::Gentle => write!(f, "gentle"),
            IntensityPreference::Moderate => write!(f, "moderate"),
            IntensityPreference::Intense => write!(f, "intense"),
            IntensityPreference::Mixed => write!(f, "mixed"),
        }
    }
}

fn default_category() -> String {
    "general".to_string()
}

fn is_false(value: &bool) -> bool {
    !value
}

/// A loggable exercise template. Immutable once a completion has been
/// recorded from it; the catalog is bundled definitions plus customs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseDef {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom: bool,
}

impl ExerciseDef {
    /// Short display line, e.g. "10 pushups" or "30 seconds plank".
    pub fn display_line(&self) -> String {
        match self.unit {
            Unit::Reps => format!("{} {}", self.count, self.name),
            unit => format!("{} {} {}", self.count, unit, self.name),
        }
    }
}

/// An exercise reference embedded in a routine (name + count override).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoutineExercise {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub unit: Unit,
}

fn default_routine_type() -> String {
    "custom".to_string()
}

fn default_duration() -> u32 {
    15
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoutineDef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_routine_type")]
    pub kind: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<RoutineExercise>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom: bool,
}

/// An id/name/description record (routine types, equipment types).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IdRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeeklyPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Weekday name (lowercase) to focus-category list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Deserialize, Debug, Default)]
struct ExercisesDoc {
    #[serde(default)]
    exercises: Vec<ExerciseDef>,
}

/// The bundled routines document: sample routines plus the id records
/// the configuration screens enumerate.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RoutinesData {
    #[serde(default)]
    pub routine_types: Vec<IdRecord>,
    #[serde(default)]
    pub equipment_types: Vec<IdRecord>,
    #[serde(default)]
    pub weekly_patterns: Vec<WeeklyPattern>,
    #[serde(default)]
    pub sample_routines: Vec<RoutineDef>,
}

/// Bundled exercise definitions. A parse failure of the compiled-in
/// document degrades to an empty list rather than failing the process.
pub fn bundled_exercises() -> Vec<ExerciseDef> {
    match serde_json::from_str::<ExercisesDoc>(BUNDLED_EXERCISES) {
        Ok(doc) => doc.exercises,
        Err(e) => {
            tracing::warn!("bundled exercise catalog failed to parse: {e}");
            Vec::new()
        }
    }
}

pub fn routines_data() -> RoutinesData {
    match serde_json::from_str::<RoutinesData>(BUNDLED_ROUTINES) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("bundled routine catalog failed to parse: {e}");
            RoutinesData::default()
        }
    }
}
