//! Payload Compilation Module
//!
//! Turns extracted records into the request payloads the remote service
//! expects.
//!
//! # Structure
//!
//! - [`vocabulary`]: closed label-to-identifier tables and lookup policy
//! - [`tags`]: requested-tag derivation and catalog reconciliation
//! - [`exercise`]: exercise-library payload compiler
//! - [`workout`]: workout-tree payload compiler

pub mod exercise;
pub mod tags;
pub mod vocabulary;
pub mod workout;

pub use exercise::{compile_exercise, ExercisePayload};
pub use tags::{requested_tags, TagReconciler};
pub use workout::{compile_workout, WorkoutPayload};
