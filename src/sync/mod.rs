//! Sync Module
//!
//! Batch-level orchestration over the remote boundary.
//!
//! # Structure
//!
//! - [`engine`]: per-record create-vs-update driver, continue-on-error
//! - [`report`]: outcome collection and the end-of-run summary
//! - [`export`]: remote library to spreadsheet template writer

pub mod engine;
pub mod export;
pub mod report;

pub use engine::{SyncEngine, SyncMode};
pub use export::export_library;
pub use report::{Outcome, SyncReport};
