//! Sheetlift - Spreadsheet-to-Coaching-Platform Sync Engine
//!
//! Extracts nested fitness-program records (workouts, sections, supersets,
//! exercises, sets) and flat exercise-library rows from loosely structured
//! spreadsheets, compiles them into the request payloads a remote coaching
//! service expects, and drives the create-or-update sync one record at a
//! time.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`sheet`]: grid access, the record model, and anchor-based extraction
//! - [`compile`]: vocabulary resolution, tag reconciliation, and payload
//!   compilation
//! - [`remote`]: the blocking client for the coaching service
//! - [`sync`]: batch orchestration, reporting, and the library export
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetlift::{AppConfig, ApiClient, Grid, SyncEngine, SyncMode};
//! use sheetlift::sheet::extract_exercise_rows;
//!
//! fn main() -> sheetlift::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let grid = Grid::load(Path::new("ExerciseData.xlsx"))?;
//!     let rows = extract_exercise_rows(&grid, config.ready_status)?;
//!
//!     let mut client = ApiClient::new(&config.base_url)?;
//!     client.login("coach@example.com", "secret")?;
//!
//!     let engine = SyncEngine::new(&client, &config);
//!     let report = engine.sync_exercises(&rows, SyncMode::Add);
//!     print!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod remote;
pub mod sheet;
pub mod sync;

// Re-export commonly used types
pub use compile::{compile_exercise, compile_workout, TagReconciler};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use remote::ApiClient;
pub use sheet::{extract_exercise_rows, extract_workouts, Cell, Grid};
pub use sync::{SyncEngine, SyncMode, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Sheetlift";
