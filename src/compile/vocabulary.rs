//! Controlled Vocabularies
//!
//! Closed label-to-identifier tables for the classification fields the
//! remote platform understands. Identifiers are platform-assigned and
//! opaque; they are never generated locally.
//!
//! Lookup normalizes the label (lowercase, all whitespace removed) so
//! "Distance (Long)" and "distance(long)" resolve identically. Category
//! lookup is lenient and falls back to the strength category; every other
//! field is strict and fails with a [`Error::Vocabulary`] naming the value.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// Identifier of the "strength" category, the fallback for unknown labels.
pub const STRENGTH_CATEGORY_ID: &str = "5cd912c319ae01d22ea76012";

/// Identifier of the mandatory trailing "Rest" tracking field.
pub const REST_FIELD_ID: &str = "5cd912bb19ae01d22ea76011";

/// Display label / identifier pairs. Display labels double as the reverse
/// lookup output for the export path.
const CATEGORIES: &[(&str, &str)] = &[
    ("Strength", "5cd912c319ae01d22ea76012"),
    ("Bodyweight", "5cd912c319ae01d22ea76013"),
    ("Timed", "5cd912c319ae01d22ea76016"),
    ("Distance (long)", "5cd912c319ae01d22ea76014"),
    ("Distance (short)", "5cd912c319ae01d22ea76015"),
];

const MODALITIES: &[(&str, &str)] = &[
    ("Activation", "66013e83b117d35345209aff"),
    ("Agility", "66013e83b117d35345209b02"),
    ("Cardio", "66013e83b117d35345209afe"),
    ("Conditioning", "66013e83b117d35345209b00"),
    ("Mobility", "66013e83b117d35345209b01"),
    ("Myofascial Release", "66013e83b117d35345209b05"),
    ("Power", "66013e83b117d35345209b03"),
    ("Strength", "66013e83b117d35345209b04"),
];

const MOVEMENT_PATTERNS: &[(&str, &str)] = &[
    ("Carry/Gait", "66013f2fb117d35345209b0f"),
    ("Core Bracing", "66013f2fb117d35345209b09"),
    ("Core Flexion / Extension", "66013f2fb117d35345209b08"),
    ("Core Rotation", "66013f2fb117d35345209b0d"),
    ("Locomotion", "66013f2fb117d35345209b0a"),
    ("Lowerbody Hinge", "66013f2fb117d35345209b11"),
    ("Lowerbody Push", "66013f2fb117d35345209b0b"),
    ("Upperbody Horizontal Pull", "66013f2fb117d35345209b10"),
    ("Upperbody Horizontal Push", "66013f2fb117d35345209b0e"),
    ("Upperbody Vertical Pull", "66013f2fb117d35345209b0c"),
    ("Upperbody Vertical Push", "66013f2fb117d35345209b12"),
];

const MUSCLE_GROUPS: &[(&str, &str)] = &[
    ("Biceps", "66013f86b117d35345209b13"),
    ("Chest", "66013f86b117d35345209b16"),
    ("Core", "662b72683492f38039adf12e"),
    ("Forearms", "66013f86b117d35345209b19"),
    ("Full Body", "6606b1fdc2e0a672bf06273a"),
    ("Glutes", "66013f86b117d35345209b17"),
    ("Hamstrings", "66013f86b117d35345209b1a"),
    ("Hip & Groin", "66013f86b117d35345209b1d"),
    ("Lower Back", "662b72683492f38039adf12f"),
    ("Lower Body", "6606b228c2e0a672bf06273c"),
    ("Lower Leg", "66013f86b117d35345209b15"),
    ("Mid Back", "66013f86b117d35345209b1b"),
    ("Quads", "66013f86b117d35345209b1c"),
    ("Shoulders", "66013f86b117d35345209b18"),
    ("Triceps", "66013f86b117d35345209b1f"),
    ("Upper Back & Neck", "66013f86b117d35345209b1e"),
    ("Upper Body", "6606b219c2e0a672bf06273b"),
];

const TRACKING_FIELDS: &[(&str, &str)] = &[
    ("Time", "5cd912bb19ae01d22ea76006"),
    ("Speed", "5cd912bb19ae01d22ea76007"),
    ("Cadence", "5cd912bb19ae01d22ea76008"),
    ("Distance (long)", "5cd912bb19ae01d22ea76009"),
    ("Distance (short)", "5cd912bb19ae01d22ea7600a"),
    ("Reps", "5cd912bb19ae01d22ea7600b"),
    ("%1RM", "5cd912bb19ae01d22ea7600c"),
    ("Weight", "5cd912bb19ae01d22ea7600d"),
    ("RPE", "5cd912bb19ae01d22ea7600e"),
    ("RIR", "62e74fe228375a001b9c9ab3"),
    ("Heart Rate", "5cd912bb19ae01d22ea7600f"),
    ("%HR", "62e74fe228375a001b9c9ab4"),
    ("Calories", "5cd912bb19ae01d22ea76010"),
    ("Watts", "60a3a8dc5055501fba769b2f"),
    ("RPM", "60a3a9115055501fba76a7ae"),
    ("Round", "60decc9a46b851e3698d840f"),
];

/// Collapses a label to its lookup key: lowercase, no whitespace.
fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn build_index(table: &'static [(&'static str, &'static str)]) -> HashMap<String, &'static str> {
    table
        .iter()
        .map(|(label, id)| (normalize(label), *id))
        .collect()
}

static CATEGORY_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| build_index(CATEGORIES));
static MODALITY_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| build_index(MODALITIES));
static MOVEMENT_INDEX: Lazy<HashMap<String, &'static str>> =
    Lazy::new(|| build_index(MOVEMENT_PATTERNS));
static MUSCLE_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| build_index(MUSCLE_GROUPS));
static TRACKING_INDEX: Lazy<HashMap<String, &'static str>> =
    Lazy::new(|| build_index(TRACKING_FIELDS));

fn strict_lookup(
    index: &HashMap<String, &'static str>,
    field: &'static str,
    label: &str,
) -> Result<&'static str> {
    index
        .get(normalize(label).as_str())
        .copied()
        .ok_or_else(|| Error::Vocabulary {
            field,
            value: label.trim().to_string(),
        })
}

/// Resolves a category label. Unknown labels fall back to strength; every
/// exercise must carry a category, so this lookup never fails.
pub fn resolve_category(label: &str) -> &'static str {
    CATEGORY_INDEX
        .get(normalize(label).as_str())
        .copied()
        .unwrap_or(STRENGTH_CATEGORY_ID)
}

/// Resolves a modality label. Strict.
pub fn resolve_modality(label: &str) -> Result<&'static str> {
    strict_lookup(&MODALITY_INDEX, "Modality", label)
}

/// Resolves a movement pattern label. Strict.
pub fn resolve_movement_pattern(label: &str) -> Result<&'static str> {
    strict_lookup(&MOVEMENT_INDEX, "Movement pattern", label)
}

/// Resolves a muscle group label. Strict.
pub fn resolve_muscle_group(label: &str) -> Result<&'static str> {
    strict_lookup(&MUSCLE_INDEX, "Muscle group", label)
}

/// Resolves a tracking field label. Strict; callers building payloads
/// catch and drop per item.
pub fn resolve_tracking_field(label: &str) -> Result<&'static str> {
    strict_lookup(&TRACKING_INDEX, "Tracking field", label)
}

/// Reverse lookup for the export path: tracking field id to display label.
pub fn tracking_field_label(id: &str) -> Option<&'static str> {
    TRACKING_FIELDS
        .iter()
        .find(|(_, field_id)| *field_id == id)
        .map(|(label, _)| *label)
}
