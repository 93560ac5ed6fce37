//! Exercise-Library Payload Compilation
//!
//! Projects one extracted library row into the request shape the remote
//! service expects for exercise create/update calls. Collaborators are
//! passed in explicitly: the operator config for author identity, the tag
//! reconciler plus a create function for tag resolution.

use log::debug;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::Result;
use crate::sheet::model::ExerciseRow;

use super::tags::{requested_tags, TagReconciler};
use super::vocabulary;

/// One muscle group assignment on the payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MuscleGroupEntry {
    pub is_primary: bool,
    pub muscle_group: String,
}

/// One movement pattern assignment on the payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovementPatternEntry {
    pub is_primary: bool,
    pub movement_pattern: String,
}

/// Exercise create/update request body.
#[derive(Debug, Clone, Serialize)]
pub struct ExercisePayload {
    pub author: String,
    pub author_name: String,
    pub title: String,
    pub instructions: Vec<String>,
    pub fields: Vec<String>,
    pub link: String,
    pub modality: String,
    pub preview_300: String,
    pub share: u8,
    pub picture: Vec<String>,
    pub thumbnail_url: String,
    pub video: String,
    #[serde(rename = "videoLink")]
    pub video_link: String,
    pub category_type: String,
    pub category_type_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub movement_patterns: Vec<MovementPatternEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub muscle_groups: Vec<MuscleGroupEntry>,
    pub tags: Vec<String>,
}

/// Resolves positional labels into (is_primary, id) pairs: blanks skipped,
/// ids deduplicated in first-seen order, the first non-empty entry primary.
fn resolve_positional<F>(labels: &[String], resolve: F) -> Result<Vec<(bool, String)>>
where
    F: Fn(&str) -> Result<&'static str>,
{
    let mut entries: Vec<(bool, String)> = Vec::new();
    for label in labels {
        if label.trim().is_empty() {
            continue;
        }
        let id = resolve(label)?;
        if entries.iter().any(|(_, seen)| seen == id) {
            continue;
        }
        entries.push((entries.is_empty(), id.to_string()));
    }
    Ok(entries)
}

/// Compiles one library row into its request payload.
///
/// Category is lenient (unknown labels fall back to strength, the label is
/// preserved for display); modality is optional with the configured default;
/// muscle groups and movement patterns are strict; tracking fields are
/// strict at the resolver but dropped per item here, with the mandatory
/// trailing Rest field always appended.
pub fn compile_exercise<F>(
    row: &ExerciseRow,
    config: &AppConfig,
    reconciler: &mut TagReconciler,
    create_tag: F,
) -> Result<ExercisePayload>
where
    F: FnMut(&str) -> Result<String>,
{
    // Category: lenient, label preserved for display
    let category_label = if row.category.trim().is_empty() {
        "strength".to_string()
    } else {
        row.category.trim().to_string()
    };
    let category_type = vocabulary::resolve_category(&category_label).to_string();

    // Modality: optional with a non-empty default
    let modality = if row.modality.trim().is_empty() {
        config.default_modality.clone()
    } else {
        vocabulary::resolve_modality(&row.modality)?.to_string()
    };

    let movement_patterns =
        resolve_positional(&row.movement_patterns, vocabulary::resolve_movement_pattern)?
            .into_iter()
            .map(|(is_primary, movement_pattern)| MovementPatternEntry {
                is_primary,
                movement_pattern,
            })
            .collect();

    let muscle_groups = resolve_positional(&row.muscle_groups, vocabulary::resolve_muscle_group)?
        .into_iter()
        .map(|(is_primary, muscle_group)| MuscleGroupEntry {
            is_primary,
            muscle_group,
        })
        .collect();

    // Tracking fields: strict resolver, recovered per item
    let mut fields = Vec::new();
    for label in row.tracking_fields.split(',') {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        match vocabulary::resolve_tracking_field(label) {
            Ok(id) => fields.push(id.to_string()),
            Err(err) => debug!("Dropping tracking field for '{}': {}", row.name, err),
        }
    }
    fields.push(vocabulary::REST_FIELD_ID.to_string());

    let instructions: Vec<String> = if row.instructions.trim().is_empty() {
        Vec::new()
    } else {
        row.instructions.split('\n').map(str::to_string).collect()
    };

    let names = requested_tags(&row.tag_flags);
    let tags = reconciler.resolve_or_create(&names, create_tag)?;

    Ok(ExercisePayload {
        author: config.author_id.clone(),
        author_name: config.author_name.clone(),
        title: row.name.clone(),
        instructions,
        fields,
        link: String::new(),
        modality,
        preview_300: String::new(),
        share: 0,
        picture: Vec::new(),
        thumbnail_url: String::new(),
        video: String::new(),
        video_link: row.video_link.clone(),
        category_type,
        category_type_name: category_label,
        movement_patterns,
        muscle_groups,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sheet::grid::Cell;
    use crate::sheet::model::TagFlag;

    fn base_row() -> ExerciseRow {
        ExerciseRow {
            name: "Ring Dip".to_string(),
            status: 1,
            category: "Bodyweight".to_string(),
            modality: "Strength".to_string(),
            muscle_groups: vec!["Chest".to_string(), String::new(), String::new()],
            movement_patterns: vec![
                "Upperbody Vertical Push".to_string(),
                String::new(),
                String::new(),
            ],
            tracking_fields: "Reps, Weight".to_string(),
            instructions: "Lower slowly\nPress out".to_string(),
            video_link: "https://example.com/dip".to_string(),
            tag_flags: Vec::new(),
        }
    }

    fn compile(row: &ExerciseRow) -> Result<ExercisePayload> {
        let config = AppConfig::default();
        let mut reconciler = TagReconciler::new(vec![]);
        compile_exercise(row, &config, &mut reconciler, |name| {
            Ok(format!("tag-{}", name.to_lowercase()))
        })
    }

    #[test]
    fn test_tracking_fields_always_end_with_rest() {
        let payload = compile(&base_row()).unwrap();
        assert_eq!(payload.fields.last().unwrap(), vocabulary::REST_FIELD_ID);
        // Reps, Weight, Rest
        assert_eq!(payload.fields.len(), 3);
    }

    #[test]
    fn test_zero_tracking_fields_still_get_rest() {
        let mut row = base_row();
        row.tracking_fields = String::new();
        let payload = compile(&row).unwrap();
        assert_eq!(payload.fields, vec![vocabulary::REST_FIELD_ID.to_string()]);
    }

    #[test]
    fn test_unresolvable_tracking_field_dropped_silently() {
        let mut row = base_row();
        row.tracking_fields = "Reps, Vibes, Weight".to_string();
        let payload = compile(&row).unwrap();
        // Vibes dropped; Reps, Weight, Rest remain
        assert_eq!(payload.fields.len(), 3);
    }

    #[test]
    fn test_missing_category_defaults_to_strength() {
        let mut row = base_row();
        row.category = String::new();
        let payload = compile(&row).unwrap();
        assert_eq!(payload.category_type, vocabulary::STRENGTH_CATEGORY_ID);
        assert_eq!(payload.category_type_name, "strength");
    }

    #[test]
    fn test_unknown_category_is_lenient_but_label_preserved() {
        let mut row = base_row();
        row.category = "Plyometric Chaos".to_string();
        let payload = compile(&row).unwrap();
        assert_eq!(payload.category_type, vocabulary::STRENGTH_CATEGORY_ID);
        assert_eq!(payload.category_type_name, "Plyometric Chaos");
    }

    #[test]
    fn test_missing_modality_keeps_default() {
        let mut row = base_row();
        row.modality = String::new();
        let payload = compile(&row).unwrap();
        assert_eq!(payload.modality, AppConfig::default().default_modality);
    }

    #[test]
    fn test_unknown_modality_is_vocabulary_error() {
        let mut row = base_row();
        row.modality = "telekinesis".to_string();
        let result = compile(&row);
        assert!(matches!(result, Err(Error::Vocabulary { .. })));
    }

    #[test]
    fn test_first_non_empty_muscle_group_is_primary() {
        let mut row = base_row();
        row.muscle_groups = vec![
            String::new(),
            "Chest".to_string(),
            "Triceps".to_string(),
        ];
        let payload = compile(&row).unwrap();
        assert_eq!(payload.muscle_groups.len(), 2);
        assert!(payload.muscle_groups[0].is_primary);
        assert!(!payload.muscle_groups[1].is_primary);
    }

    #[test]
    fn test_muscle_groups_dedup_by_resolved_id() {
        let mut row = base_row();
        // Same group under different spellings resolves to one id
        row.muscle_groups = vec![
            "Hip & Groin".to_string(),
            "hip&groin".to_string(),
            "Chest".to_string(),
        ];
        let payload = compile(&row).unwrap();
        assert_eq!(payload.muscle_groups.len(), 2);
    }

    #[test]
    fn test_unknown_muscle_group_fails_record() {
        let mut row = base_row();
        row.muscle_groups = vec!["eyebrows".to_string()];
        assert!(matches!(compile(&row), Err(Error::Vocabulary { .. })));
    }

    #[test]
    fn test_instructions_split_on_newline() {
        let payload = compile(&base_row()).unwrap();
        assert_eq!(payload.instructions, vec!["Lower slowly", "Press out"]);
    }

    #[test]
    fn test_blank_instructions_yield_empty_list() {
        let mut row = base_row();
        row.instructions = String::new();
        let payload = compile(&row).unwrap();
        assert!(payload.instructions.is_empty());
    }

    #[test]
    fn test_tags_flow_through_reconciler() {
        let mut row = base_row();
        row.tag_flags = vec![
            TagFlag {
                column: "Basic".to_string(),
                value: Cell::Number(1.0),
            },
            TagFlag {
                column: "SKILL NAME 1".to_string(),
                value: Cell::Text("Ring Support".to_string()),
            },
        ];
        let payload = compile(&row).unwrap();
        assert_eq!(payload.tags, vec!["tag-basic", "tag-ring support"]);
    }

    #[test]
    fn test_constant_fields_and_identity() {
        let mut config = AppConfig::default();
        config.author_id = "coach-1".to_string();
        config.author_name = "Jane Coach".to_string();

        let row = base_row();
        let mut reconciler = TagReconciler::new(vec![]);
        let payload =
            compile_exercise(&row, &config, &mut reconciler, |_| Ok("x".to_string())).unwrap();

        assert_eq!(payload.author, "coach-1");
        assert_eq!(payload.author_name, "Jane Coach");
        assert_eq!(payload.title, "Ring Dip");
        assert_eq!(payload.share, 0);
        assert!(payload.link.is_empty());
        assert_eq!(payload.video_link, "https://example.com/dip");
    }

    #[test]
    fn test_payload_serialization_shape() {
        let payload = compile(&base_row()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["videoLink"], "https://example.com/dip");
        assert!(json["movement_patterns"][0]["is_primary"].as_bool().unwrap());
        assert_eq!(
            json["fields"].as_array().unwrap().last().unwrap(),
            vocabulary::REST_FIELD_ID
        );

        // Empty positional lists are omitted entirely
        let mut row = base_row();
        row.muscle_groups = vec![String::new(); 3];
        row.movement_patterns = vec![String::new(); 3];
        let payload = compile(&row).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("muscle_groups").is_none());
        assert!(json.get("movement_patterns").is_none());
    }
}
