//! Sheet Reading Module
//!
//! Everything between a workbook on disk and the in-memory record tree.
//!
//! # Structure
//!
//! - [`grid`]: typed cell access over a worksheet, header-indexed
//! - [`model`]: the extracted record types (workout tree, library rows)
//! - [`extractor`]: anchor scanning and recursive-descent tree building

pub mod extractor;
pub mod grid;
pub mod model;

pub use extractor::{extract_exercise_rows, extract_workouts};
pub use grid::{Cell, Grid};
pub use model::{ExerciseRow, SectionFormat, Workout};
