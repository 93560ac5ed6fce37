//! Record Extraction
//!
//! Locates record blocks in a grid by their anchor labels and rebuilds the
//! nested workout hierarchy from flat positional offsets.
//!
//! Each record class has a marker label living in a named column. Anchors
//! are collected top-to-bottom into one FIFO queue per class, then consumed
//! by a recursive descent driven by the count fields: a workout declares how
//! many sections it owns, each section how many supersets, and so on down to
//! sets. Queues are passed by mutable reference and drained exactly once;
//! running a queue dry before a declared count is satisfied is fatal for the
//! file.

use std::collections::VecDeque;

use log::{debug, info};

use crate::error::{Error, Result};

use super::grid::{Cell, Grid};
use super::model::{
    Exercise, ExerciseRow, Section, SectionFormat, Superset, TagFlag, TrainingSet, Workout,
};

/// Named column / marker label pairs for the workout hierarchy.
const WORKOUT_COLUMN: &str = "Workouts";
const WORKOUT_MARKER: &str = "Status";
const SECTION_COLUMN: &str = "Sections";
const SECTION_MARKER: &str = "Section name";
const SUPERSET_COLUMN: &str = "Supersets";
const SUPERSET_MARKER: &str = "Superset num exercises";
const EXERCISE_COLUMN: &str = "Exercises";
const EXERCISE_MARKER: &str = "Exercise name";
const SET_COLUMN: &str = "Sets";
/// Matched as a case-insensitive substring; set blocks label their marker
/// cell "Set reps", "Set reps (left/right)", and similar variants.
const SET_MARKER: &str = "set reps";

/// Anchor row in library mode lives in the first column.
const LIBRARY_ANCHOR: &str = "EXERCISE NAME";
const LIBRARY_STATUS_COLUMN: &str = "VIDEO STATUS";
/// First tag flag column; everything from here to the last header is a tag.
const FIRST_TAG_COLUMN: &str = "Basic";

/// Grid position of a marker hit.
type Anchor = (usize, usize);

/// One FIFO queue per anchor class, drained left to right during descent.
struct AnchorQueues {
    workouts: VecDeque<Anchor>,
    sections: VecDeque<Anchor>,
    supersets: VecDeque<Anchor>,
    exercises: VecDeque<Anchor>,
    sets: VecDeque<Anchor>,
}

impl AnchorQueues {
    fn scan(grid: &Grid) -> Result<Self> {
        let queues = Self {
            workouts: scan_anchors(grid, WORKOUT_COLUMN, WORKOUT_MARKER, false)?,
            sections: scan_anchors(grid, SECTION_COLUMN, SECTION_MARKER, false)?,
            supersets: scan_anchors(grid, SUPERSET_COLUMN, SUPERSET_MARKER, false)?,
            exercises: scan_anchors(grid, EXERCISE_COLUMN, EXERCISE_MARKER, false)?,
            sets: scan_anchors(grid, SET_COLUMN, SET_MARKER, true)?,
        };

        info!(
            "Anchors found: {} workouts, {} sections, {} supersets, {} exercises, {} sets",
            queues.workouts.len(),
            queues.sections.len(),
            queues.supersets.len(),
            queues.exercises.len(),
            queues.sets.len()
        );

        Ok(queues)
    }
}

/// Collects every row where the named column carries the marker, in row
/// order. `substring` switches from exact match to case-insensitive
/// containment.
fn scan_anchors(
    grid: &Grid,
    column_header: &str,
    marker: &str,
    substring: bool,
) -> Result<VecDeque<Anchor>> {
    let col = grid.column(column_header).ok_or_else(|| {
        Error::Structure(format!(
            "column '{}' not found in the sheet header",
            column_header
        ))
    })?;

    let mut anchors = VecDeque::new();
    for row in 0..grid.num_rows() {
        let text = grid.cell(row, col).to_text();
        let hit = if substring {
            text.to_lowercase().contains(marker)
        } else {
            text == marker
        };
        if hit {
            anchors.push_back((row, col));
        }
    }

    Ok(anchors)
}

/// Pops the next anchor for a child class, or fails the file when the
/// declared counts have outrun the available blocks.
fn pop_anchor(
    queue: &mut VecDeque<Anchor>,
    class: &str,
    parent: &str,
) -> Result<Anchor> {
    queue.pop_front().ok_or_else(|| {
        Error::Structure(format!(
            "ran out of {} blocks while building '{}'",
            class, parent
        ))
    })
}

/// Reads a count field, failing the file when it is missing or fractional.
fn read_count(cell: &Cell, what: &str, parent: &str) -> Result<usize> {
    cell.as_count().ok_or_else(|| {
        Error::Structure(format!(
            "{} for '{}' is missing or not a whole number",
            what, parent
        ))
    })
}

/// Extracts every workout tree from the grid, in sheet order.
///
/// Workouts that fail the status gate are still extracted in full so their
/// children are consumed from the queues; filtering happens downstream.
pub fn extract_workouts(grid: &Grid) -> Result<Vec<Workout>> {
    let mut queues = AnchorQueues::scan(grid)?;

    let mut workouts = Vec::new();
    while let Some(anchor) = queues.workouts.pop_front() {
        let workout = build_workout(grid, anchor, &mut queues)?;
        debug!(
            "Extracted workout '{}' ({} sections)",
            workout.title, workout.num_sections
        );
        workouts.push(workout);
    }

    info!("Extracted {} workouts", workouts.len());
    Ok(workouts)
}

fn build_workout(grid: &Grid, (row, col): Anchor, queues: &mut AnchorQueues) -> Result<Workout> {
    // Fields sit one row below the anchor, from the anchor column rightward.
    let status = grid.cell(row + 1, col).as_int().unwrap_or(0);
    let title = grid.cell(row + 1, col + 1).to_text();
    let description = grid.cell(row + 1, col + 2).to_text();
    let num_sections = read_count(grid.cell(row + 1, col + 3), "section count", &title)?;

    let mut sections = Vec::with_capacity(num_sections);
    for _ in 0..num_sections {
        let anchor = pop_anchor(&mut queues.sections, "section", &title)?;
        sections.push(build_section(grid, anchor, queues)?);
    }

    Ok(Workout {
        status,
        title,
        description,
        num_sections,
        sections,
    })
}

fn build_section(grid: &Grid, (row, col): Anchor, queues: &mut AnchorQueues) -> Result<Section> {
    let name = grid.cell(row + 1, col).to_text();
    let format = SectionFormat::parse(&grid.cell(row + 1, col + 1).to_text());
    let kind = grid.cell(row + 1, col + 2).to_text();
    let note = grid.cell(row + 1, col + 3).to_text();
    let duration = grid.cell(row + 1, col + 4).to_text();
    let num_supersets = read_count(grid.cell(row + 1, col + 5), "superset count", &name)?;

    let mut supersets = Vec::with_capacity(num_supersets);
    for _ in 0..num_supersets {
        let anchor = pop_anchor(&mut queues.supersets, "superset", &name)?;
        supersets.push(build_superset(grid, anchor, queues, &name)?);
    }

    Ok(Section {
        name,
        format,
        kind,
        note,
        duration,
        num_supersets,
        supersets,
        amrap_minutes: None,
        timed_rounds: None,
    })
}

fn build_superset(
    grid: &Grid,
    (row, col): Anchor,
    queues: &mut AnchorQueues,
    section_name: &str,
) -> Result<Superset> {
    let num_exercises = read_count(grid.cell(row + 1, col), "exercise count", section_name)?;

    let mut exercises = Vec::with_capacity(num_exercises);
    for _ in 0..num_exercises {
        let anchor = pop_anchor(&mut queues.exercises, "exercise", section_name)?;
        exercises.push(build_exercise(grid, anchor, queues)?);
    }

    Ok(Superset {
        num_exercises,
        exercises,
    })
}

fn build_exercise(grid: &Grid, (row, col): Anchor, queues: &mut AnchorQueues) -> Result<Exercise> {
    let name = grid.cell(row + 1, col).to_text();
    let note = grid.cell(row + 1, col + 1).to_text();
    let tempo = grid.cell(row + 1, col + 2).to_text();
    let each_side = grid.cell(row + 1, col + 3).as_int() == Some(1);
    let num_sets = read_count(grid.cell(row + 1, col + 4), "set count", &name)?;

    let mut sets = Vec::with_capacity(num_sets);
    for _ in 0..num_sets {
        let (set_row, set_col) = pop_anchor(&mut queues.sets, "training set", &name)?;
        sets.push(TrainingSet {
            reps: grid.cell(set_row + 1, set_col).clone(),
            rest: grid.cell(set_row + 1, set_col + 1).clone(),
            duration: grid.cell(set_row + 1, set_col + 2).clone(),
        });
    }

    Ok(Exercise {
        name,
        note,
        tempo,
        each_side,
        num_sets,
        sets,
    })
}

/// Extracts exercise-library rows in flat library mode.
///
/// Scans forward from the in-sheet `EXERCISE NAME` anchor row until the
/// first row with a missing name; rows whose status column does not equal
/// `ready_status` are skipped without terminating the scan.
pub fn extract_exercise_rows(grid: &Grid, ready_status: i64) -> Result<Vec<ExerciseRow>> {
    let anchor_row = (0..grid.num_rows())
        .find(|&row| grid.cell(row, 0).to_text() == LIBRARY_ANCHOR)
        .ok_or_else(|| {
            Error::Structure(format!(
                "'{}' anchor not found in the first column",
                LIBRARY_ANCHOR
            ))
        })?;

    let status_col = grid.column(LIBRARY_STATUS_COLUMN).ok_or_else(|| {
        Error::Structure(format!(
            "column '{}' not found in the sheet header",
            LIBRARY_STATUS_COLUMN
        ))
    })?;

    let tag_start = grid.column(FIRST_TAG_COLUMN);
    if tag_start.is_none() {
        debug!("No '{}' column; rows will carry no tag flags", FIRST_TAG_COLUMN);
    }

    let mut rows = Vec::new();
    for row in (anchor_row + 1)..grid.num_rows() {
        if grid.cell(row, 0).is_missing() {
            break;
        }

        let status = grid.cell(row, status_col).as_int().unwrap_or(0);
        if status != ready_status {
            debug!(
                "Skipping row {} (status {} != {})",
                row, status, ready_status
            );
            continue;
        }

        rows.push(build_exercise_row(grid, row, status, tag_start));
    }

    info!("Extracted {} library rows ready for sync", rows.len());
    Ok(rows)
}

/// Reads a named column on a row, empty when the column is absent.
fn column_text(grid: &Grid, row: usize, header: &str) -> String {
    grid.column(header)
        .map(|col| grid.cell(row, col).to_text())
        .unwrap_or_default()
}

fn build_exercise_row(
    grid: &Grid,
    row: usize,
    status: i64,
    tag_start: Option<usize>,
) -> ExerciseRow {
    let tag_flags = match tag_start {
        Some(start) => (start..grid.headers().len())
            .map(|col| TagFlag {
                column: grid.headers()[col].clone(),
                value: grid.cell(row, col).clone(),
            })
            .collect(),
        None => Vec::new(),
    };

    ExerciseRow {
        name: grid.cell(row, 0).to_text(),
        status,
        category: column_text(grid, row, "Category"),
        modality: column_text(grid, row, "Modality"),
        muscle_groups: vec![
            column_text(grid, row, "Muscle group"),
            column_text(grid, row, "Muscle group 2"),
            column_text(grid, row, "Muscle group 3"),
        ],
        movement_patterns: vec![
            column_text(grid, row, "Movement pattern 1"),
            column_text(grid, row, "Movement pattern 2"),
            column_text(grid, row, "Movement pattern 3"),
        ],
        tracking_fields: column_text(grid, row, "Tracking fields"),
        instructions: column_text(grid, row, "Instructions"),
        video_link: column_text(grid, row, "Video link"),
        tag_flags,
    }
}
