//! Record Tree Model
//!
//! In-memory representation of the records extracted from a sheet: the
//! nested workout tree (workout -> section -> superset -> exercise -> set)
//! and the flat exercise-library row. Built once per run by the extractor,
//! read-only afterwards.

use super::grid::Cell;

/// Execution style of a workout section. Decides which set fields apply.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionFormat {
    Regular,
    Interval,
    Emom,
    Amrap,
    Timed,
    ForTime,
    /// Anything else found in the sheet; compiles to an empty set field map.
    Other(String),
}

impl SectionFormat {
    /// Parses a sheet label, case-insensitively, spaces collapsing to `_`.
    pub fn parse(label: &str) -> Self {
        let normalized = label
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join("_");

        match normalized.as_str() {
            "regular" => Self::Regular,
            "interval" => Self::Interval,
            "emom" => Self::Emom,
            "amrap" => Self::Amrap,
            "timed" => Self::Timed,
            "for_time" => Self::ForTime,
            _ => Self::Other(normalized),
        }
    }

    /// Label published to the remote schema. The EMOM rewrite happens at
    /// compile time, not here.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Regular => "regular",
            Self::Interval => "interval",
            Self::Emom => "emom",
            Self::Amrap => "amrap",
            Self::Timed => "timed",
            Self::ForTime => "for_time",
            Self::Other(s) => s,
        }
    }
}

/// One training set. Which fields reach the payload is decided by the
/// ancestor section's format, so all three are captured raw.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub reps: Cell,
    pub rest: Cell,
    pub duration: Cell,
}

/// One exercise inside a superset.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub name: String,
    pub note: String,
    pub tempo: String,
    pub each_side: bool,
    pub num_sets: usize,
    pub sets: Vec<TrainingSet>,
}

/// A group of exercises performed back-to-back.
#[derive(Debug, Clone)]
pub struct Superset {
    pub num_exercises: usize,
    pub exercises: Vec<Exercise>,
}

/// One section of a workout.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub format: SectionFormat,
    /// Free-text section type; snake_cased at compile time.
    pub kind: String,
    pub note: String,
    pub duration: String,
    pub num_supersets: usize,
    pub supersets: Vec<Superset>,
    /// AMRAP window in minutes; the compiler defaults it when absent.
    pub amrap_minutes: Option<f64>,
    /// Round count for timed sections; the compiler defaults it when absent.
    pub timed_rounds: Option<i64>,
}

/// A complete workout tree.
#[derive(Debug, Clone)]
pub struct Workout {
    pub status: i64,
    pub title: String,
    pub description: String,
    pub num_sections: usize,
    pub sections: Vec<Section>,
}

impl Workout {
    /// Whether this workout passes the given status gate.
    pub fn is_ready(&self, ready_status: i64) -> bool {
        self.status == ready_status
    }
}

/// One raw tag column capture: the header text and the cell under it.
#[derive(Debug, Clone)]
pub struct TagFlag {
    pub column: String,
    pub value: Cell,
}

/// One exercise-library row, extracted in flat library mode.
#[derive(Debug, Clone)]
pub struct ExerciseRow {
    pub name: String,
    pub status: i64,
    pub category: String,
    pub modality: String,
    /// Positional muscle group labels; blanks preserved so the first
    /// non-empty entry can be marked primary.
    pub muscle_groups: Vec<String>,
    pub movement_patterns: Vec<String>,
    /// Comma-separated tracking field labels as typed in the sheet.
    pub tracking_fields: String,
    pub instructions: String,
    pub video_link: String,
    /// Tag flag columns in header order, from the first tag column onward.
    pub tag_flags: Vec<TagFlag>,
}
