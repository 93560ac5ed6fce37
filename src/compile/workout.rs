//! Workout Payload Compilation
//!
//! Projects an extracted workout tree into the request shape of the remote
//! workout-create call. Exercise names are resolved through an injected
//! lookup (remote catalog + detail fetch in production, an in-memory map in
//! tests); a lookup miss leaves an empty id and never aborts siblings.
//!
//! Set fields follow the ancestor section's format. EMOM sections publish
//! format "interval" with fixed 60-second work windows and zero rest; the
//! extracted model keeps the original format.

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::sheet::grid::Cell;
use crate::sheet::model::{Exercise, Section, SectionFormat, TrainingSet, Workout};

/// Fixed per-set work window published for EMOM sections, in seconds.
const EMOM_SET_DURATION: &str = "60";

/// Fixed per-set rest published for EMOM sections, in seconds.
const EMOM_SET_REST: &str = "0";

/// AMRAP window applied when the sheet does not carry one, in minutes.
const DEFAULT_AMRAP_MINUTES: f64 = 30.0;

/// Round count applied to timed sections when the sheet does not carry one.
const DEFAULT_TIMED_ROUNDS: i64 = 1;

/// A single tracked value on a training set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetValue {
    pub value: Value,
}

impl SetValue {
    fn from_cell(cell: &Cell) -> Self {
        let value = match cell {
            Cell::Empty => Value::String(String::new()),
            Cell::Text(s) => Value::String(s.trim().to_string()),
            Cell::Number(n) => {
                if n.fract() == 0.0 {
                    Value::from(*n as i64)
                } else {
                    Value::from(*n)
                }
            }
            Cell::Bool(b) => Value::from(*b),
        };
        Self { value }
    }

    fn fixed(text: &str) -> Self {
        Self {
            value: Value::String(text.to_string()),
        }
    }
}

/// One training set on the payload. Which fields are present depends on the
/// section format; unknown formats publish an empty map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingSetPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<SetValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<SetValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<SetValue>,
}

/// One exercise entry inside a superset group.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseEntry {
    pub alternatives: Vec<Value>,
    pub each_side: bool,
    pub exercise: String,
    /// Full detail record of the resolved exercise; null when unresolved.
    pub exercise_instance: Option<Value>,
    pub note: String,
    pub tempo: String,
    pub training_sets: Vec<TrainingSetPayload>,
}

/// One superset group; the remote schema nests grouped exercises under a
/// key also named "supersets".
#[derive(Debug, Clone, Serialize)]
pub struct SupersetEntry {
    pub supersets: Vec<ExerciseEntry>,
}

/// One workout section on the payload.
#[derive(Debug, Clone, Serialize)]
pub struct SectionPayload {
    pub attachments: Vec<Value>,
    pub exercises: Vec<SupersetEntry>,
    pub format: String,
    pub note: String,
    /// Empty string except for AMRAP sections, which carry seconds.
    pub time: Value,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,
}

/// Workout create request body.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPayload {
    pub author: String,
    pub conversion_id: Value,
    pub title: String,
    pub description: String,
    pub timezone: String,
    pub is_generated_by_ai: bool,
    pub sections: Vec<SectionPayload>,
    pub share: u8,
    pub tags: Vec<String>,
}

/// Snake_cases a free-text section type: "Warm Up" -> "warm_up".
fn snake_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn minutes_to_seconds(minutes: f64) -> i64 {
    (minutes * 60.0) as i64
}

fn compile_set(set: &TrainingSet, format: &SectionFormat) -> TrainingSetPayload {
    match format {
        SectionFormat::Regular => TrainingSetPayload {
            reps: Some(SetValue::from_cell(&set.reps)),
            rest: Some(SetValue::from_cell(&set.rest)),
            ..Default::default()
        },
        SectionFormat::Interval => TrainingSetPayload {
            duration: Some(SetValue::from_cell(&set.duration)),
            rest: Some(SetValue::from_cell(&set.rest)),
            ..Default::default()
        },
        SectionFormat::Emom => TrainingSetPayload {
            reps: Some(SetValue::from_cell(&set.reps)),
            duration: Some(SetValue::fixed(EMOM_SET_DURATION)),
            rest: Some(SetValue::fixed(EMOM_SET_REST)),
        },
        // amrap / timed / for_time / anything else: no per-set fields
        _ => TrainingSetPayload::default(),
    }
}

fn compile_exercise_entry<F>(
    exercise: &Exercise,
    format: &SectionFormat,
    lookup: &mut F,
) -> ExerciseEntry
where
    F: FnMut(&str) -> (String, Option<Value>),
{
    let (exercise_id, exercise_instance) = lookup(&exercise.name);
    if exercise_id.is_empty() {
        warn!(
            "Exercise '{}' not found in the remote library; sending an empty id",
            exercise.name
        );
    }

    ExerciseEntry {
        alternatives: Vec::new(),
        each_side: exercise.each_side,
        exercise: exercise_id,
        exercise_instance,
        note: exercise.note.clone(),
        tempo: exercise.tempo.clone(),
        training_sets: exercise
            .sets
            .iter()
            .map(|set| compile_set(set, format))
            .collect(),
    }
}

fn compile_section<F>(section: &Section, lookup: &mut F) -> SectionPayload
where
    F: FnMut(&str) -> (String, Option<Value>),
{
    let format_label = match section.format {
        // EMOM publishes as interval; the model keeps the real format
        SectionFormat::Emom => "interval".to_string(),
        ref format => format.as_str().to_string(),
    };

    let time = match section.format {
        SectionFormat::Amrap => Value::from(minutes_to_seconds(
            section.amrap_minutes.unwrap_or(DEFAULT_AMRAP_MINUTES),
        )),
        _ => Value::String(String::new()),
    };

    let round = match section.format {
        SectionFormat::Timed => Some(section.timed_rounds.unwrap_or(DEFAULT_TIMED_ROUNDS)),
        _ => None,
    };

    let mut exercises = Vec::with_capacity(section.supersets.len());
    for superset in &section.supersets {
        let mut entries = Vec::with_capacity(superset.exercises.len());
        for exercise in &superset.exercises {
            entries.push(compile_exercise_entry(exercise, &section.format, lookup));
        }
        exercises.push(SupersetEntry { supersets: entries });
    }

    SectionPayload {
        attachments: Vec::new(),
        exercises,
        format: format_label,
        note: section.note.clone(),
        time,
        title: section.name.clone(),
        kind: snake_case(&section.kind),
        round,
    }
}

/// Compiles a workout tree into its create request payload.
///
/// `lookup` maps an exercise name to its resolved id and embedded detail
/// record; it returns an empty id on a miss.
pub fn compile_workout<F>(workout: &Workout, config: &AppConfig, lookup: &mut F) -> WorkoutPayload
where
    F: FnMut(&str) -> (String, Option<Value>),
{
    let mut sections = Vec::with_capacity(workout.sections.len());
    for section in &workout.sections {
        sections.push(compile_section(section, lookup));
    }

    WorkoutPayload {
        author: config.author_id.clone(),
        conversion_id: Value::Null,
        title: workout.title.clone(),
        description: workout.description.clone(),
        timezone: config.timezone.clone(),
        is_generated_by_ai: false,
        sections,
        share: 0,
        tags: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::model::Superset;
    use serde_json::json;

    fn set(reps: f64, rest: f64, duration: f64) -> TrainingSet {
        TrainingSet {
            reps: Cell::Number(reps),
            rest: Cell::Number(rest),
            duration: Cell::Number(duration),
        }
    }

    fn one_exercise_workout(format: SectionFormat) -> Workout {
        Workout {
            status: 1,
            title: "Day 1".to_string(),
            description: "Push focus".to_string(),
            num_sections: 1,
            sections: vec![Section {
                name: "Main".to_string(),
                format,
                kind: "Strength Work".to_string(),
                note: "note".to_string(),
                duration: String::new(),
                num_supersets: 1,
                supersets: vec![Superset {
                    num_exercises: 1,
                    exercises: vec![Exercise {
                        name: "Push Up".to_string(),
                        note: "slow".to_string(),
                        tempo: "31X1".to_string(),
                        each_side: false,
                        num_sets: 2,
                        sets: vec![set(8.0, 60.0, 30.0), set(10.0, 90.0, 45.0)],
                    }],
                }],
                amrap_minutes: None,
                timed_rounds: None,
            }],
        }
    }

    fn lookup_hit(name: &str) -> (String, Option<Value>) {
        (
            "ex-1".to_string(),
            Some(json!({ "title": name, "_id": "ex-1" })),
        )
    }

    #[test]
    fn test_regular_sets_take_reps_and_rest_verbatim() {
        let workout = one_exercise_workout(SectionFormat::Regular);
        let config = AppConfig::default();
        let payload = compile_workout(&workout, &config, &mut lookup_hit);

        let sets = &payload.sections[0].exercises[0].supersets[0].training_sets;
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].reps.as_ref().unwrap().value, json!(8));
        assert_eq!(sets[0].rest.as_ref().unwrap().value, json!(60));
        assert!(sets[0].duration.is_none());
        assert_eq!(sets[1].reps.as_ref().unwrap().value, json!(10));
    }

    #[test]
    fn test_interval_sets_take_duration_and_rest() {
        let workout = one_exercise_workout(SectionFormat::Interval);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);

        let sets = &payload.sections[0].exercises[0].supersets[0].training_sets;
        assert_eq!(sets[0].duration.as_ref().unwrap().value, json!(30));
        assert_eq!(sets[0].rest.as_ref().unwrap().value, json!(60));
        assert!(sets[0].reps.is_none());
    }

    #[test]
    fn test_emom_rewrites_format_and_fixes_set_fields() {
        let workout = one_exercise_workout(SectionFormat::Emom);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);

        let section = &payload.sections[0];
        assert_eq!(section.format, "interval");

        for compiled in &section.exercises[0].supersets[0].training_sets {
            assert_eq!(compiled.duration.as_ref().unwrap().value, json!("60"));
            assert_eq!(compiled.rest.as_ref().unwrap().value, json!("0"));
        }
        // Reps still come from the sheet
        let sets = &section.exercises[0].supersets[0].training_sets;
        assert_eq!(sets[0].reps.as_ref().unwrap().value, json!(8));
    }

    #[test]
    fn test_unrecognized_format_yields_empty_set_fields() {
        let workout = one_exercise_workout(SectionFormat::Other("ladder".to_string()));
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);

        let sets = &payload.sections[0].exercises[0].supersets[0].training_sets;
        assert!(sets[0].reps.is_none());
        assert!(sets[0].rest.is_none());
        assert!(sets[0].duration.is_none());
        assert_eq!(payload.sections[0].format, "ladder");
    }

    #[test]
    fn test_amrap_section_carries_time_in_seconds() {
        let mut workout = one_exercise_workout(SectionFormat::Amrap);
        workout.sections[0].amrap_minutes = Some(12.0);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].time, json!(720));

        // Default window when the sheet carries none
        let workout = one_exercise_workout(SectionFormat::Amrap);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].time, json!(1800));
    }

    #[test]
    fn test_timed_section_carries_round() {
        let mut workout = one_exercise_workout(SectionFormat::Timed);
        workout.sections[0].timed_rounds = Some(4);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].round, Some(4));

        let workout = one_exercise_workout(SectionFormat::Timed);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].round, Some(1));

        // Non-timed sections omit the key
        let workout = one_exercise_workout(SectionFormat::Regular);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].round, None);
        assert_eq!(payload.sections[0].time, json!(""));
    }

    #[test]
    fn test_section_type_snake_cased() {
        let workout = one_exercise_workout(SectionFormat::Regular);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);
        assert_eq!(payload.sections[0].kind, "strength_work");
        assert_eq!(snake_case("Cool Down"), "cool_down");
        assert_eq!(snake_case("AMRAP"), "amrap");
    }

    #[test]
    fn test_lookup_miss_leaves_empty_id_and_null_instance() {
        let workout = one_exercise_workout(SectionFormat::Regular);
        let mut lookup = |_: &str| (String::new(), None);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup);

        let entry = &payload.sections[0].exercises[0].supersets[0];
        assert!(entry.exercise.is_empty());
        assert!(entry.exercise_instance.is_none());
    }

    #[test]
    fn test_resolved_exercise_embeds_detail() {
        let workout = one_exercise_workout(SectionFormat::Regular);
        let payload = compile_workout(&workout, &AppConfig::default(), &mut lookup_hit);

        let entry = &payload.sections[0].exercises[0].supersets[0];
        assert_eq!(entry.exercise, "ex-1");
        assert_eq!(entry.exercise_instance.as_ref().unwrap()["_id"], "ex-1");
    }

    #[test]
    fn test_workout_envelope_constants() {
        let mut config = AppConfig::default();
        config.author_id = "coach-1".to_string();
        config.timezone = "Europe/Madrid".to_string();

        let workout = one_exercise_workout(SectionFormat::Regular);
        let payload = compile_workout(&workout, &config, &mut lookup_hit);

        assert_eq!(payload.author, "coach-1");
        assert_eq!(payload.timezone, "Europe/Madrid");
        assert_eq!(payload.conversion_id, Value::Null);
        assert!(!payload.is_generated_by_ai);
        assert_eq!(payload.share, 0);
        assert!(payload.tags.is_empty());
        assert_eq!(payload.title, "Day 1");
    }

    #[test]
    fn test_set_value_from_cell_keeps_text_and_numbers() {
        assert_eq!(
            SetValue::from_cell(&Cell::Text("8-10".to_string())).value,
            json!("8-10")
        );
        assert_eq!(SetValue::from_cell(&Cell::Number(12.0)).value, json!(12));
        assert_eq!(SetValue::from_cell(&Cell::Empty).value, json!(""));
    }
}
