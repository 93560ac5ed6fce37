//! Batch Sync Orchestration
//!
//! Drives the create-vs-update decision per record and keeps the batch
//! moving: every per-record failure is caught, logged, and recorded, never
//! re-raised. Only login and extraction failures (handled upstream) abort
//! a run.

use log::{error, info, warn};
use serde_json::Value;

use crate::compile::exercise::compile_exercise;
use crate::compile::tags::TagReconciler;
use crate::compile::workout::compile_workout;
use crate::config::AppConfig;
use crate::error::Result;
use crate::remote::client::ApiClient;
use crate::remote::types::ExerciseSummary;
use crate::sheet::model::{ExerciseRow, Workout};

use super::report::{Outcome, SyncReport};

/// Whether missing records are created or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Create records not present remotely; update the ones that are.
    Add,
    /// Update existing records only; a lookup miss is a reported skip.
    Update,
}

/// Case-insensitive exact title match over a fetched catalog. First match
/// wins.
fn find_by_title<'a>(
    catalog: &'a [ExerciseSummary],
    name: &str,
) -> Option<&'a ExerciseSummary> {
    let needle = name.trim().to_lowercase();
    catalog
        .iter()
        .find(|entry| entry.title.trim().to_lowercase() == needle)
}

/// Batch orchestrator over a logged-in client.
pub struct SyncEngine<'a> {
    client: &'a ApiClient,
    config: &'a AppConfig,
}

impl<'a> SyncEngine<'a> {
    pub fn new(client: &'a ApiClient, config: &'a AppConfig) -> Self {
        Self { client, config }
    }

    /// Syncs extracted library rows.
    ///
    /// The tag catalog is fetched once and reused for the whole run. In add
    /// mode the exercise catalog is also fetched once; in update mode it is
    /// refetched per candidate.
    pub fn sync_exercises(&self, rows: &[ExerciseRow], mode: SyncMode) -> SyncReport {
        let tag_catalog = match self.client.fetch_tag_catalog() {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("Could not fetch the tag catalog: {}; continuing with an empty one", err);
                Vec::new()
            }
        };
        let mut reconciler = TagReconciler::new(tag_catalog);

        let shared_catalog = match mode {
            SyncMode::Add => match self.client.fetch_exercise_catalog() {
                Ok(catalog) => Some(catalog),
                Err(err) => {
                    warn!(
                        "Could not fetch the exercise catalog: {}; treating every record as new",
                        err
                    );
                    Some(Vec::new())
                }
            },
            SyncMode::Update => None,
        };

        let mut report = SyncReport::new();
        for row in rows {
            match self.sync_one_exercise(row, mode, &mut reconciler, shared_catalog.as_deref()) {
                Ok((outcome, detail)) => {
                    info!("Exercise '{}' {:?}", row.name, outcome);
                    report.record(&row.name, outcome, detail);
                }
                Err(err) => {
                    error!("Exercise '{}' failed: {}", row.name, err);
                    report.record(&row.name, Outcome::Failed, err.to_string());
                }
            }
        }

        report
    }

    fn sync_one_exercise(
        &self,
        row: &ExerciseRow,
        mode: SyncMode,
        reconciler: &mut TagReconciler,
        shared_catalog: Option<&[ExerciseSummary]>,
    ) -> Result<(Outcome, String)> {
        let payload = compile_exercise(row, self.config, reconciler, |name| {
            self.client.create_tag(name)
        })?;

        let refetched;
        let catalog: &[ExerciseSummary] = match shared_catalog {
            Some(catalog) => catalog,
            None => {
                refetched = self.client.fetch_exercise_catalog()?;
                &refetched
            }
        };

        match find_by_title(catalog, &row.name) {
            Some(existing) => {
                self.client.update_exercise(&existing.id, &payload)?;
                Ok((Outcome::Updated, String::new()))
            }
            None => match mode {
                SyncMode::Add => {
                    self.client.create_exercise(&payload)?;
                    Ok((Outcome::Created, String::new()))
                }
                SyncMode::Update => Ok((
                    Outcome::Skipped,
                    "not found in the remote library; add it before updating".to_string(),
                )),
            },
        }
    }

    /// Syncs extracted workout trees. Only workouts passing the ready gate
    /// are compiled and uploaded; the rest are reported as skipped.
    pub fn sync_workouts(&self, workouts: &[Workout]) -> SyncReport {
        let catalog = match self.client.fetch_exercise_catalog() {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(
                    "Could not fetch the exercise catalog: {}; exercise lookups will all miss",
                    err
                );
                Vec::new()
            }
        };

        let mut report = SyncReport::new();
        for workout in workouts {
            if !workout.is_ready(self.config.ready_status) {
                info!(
                    "Skipping workout '{}' (status {} != {})",
                    workout.title, workout.status, self.config.ready_status
                );
                report.record(
                    &workout.title,
                    Outcome::Skipped,
                    format!("status {}", workout.status),
                );
                continue;
            }

            info!("Compiling workout '{}'", workout.title);
            let mut lookup = |name: &str| -> (String, Option<Value>) {
                match find_by_title(&catalog, name) {
                    Some(summary) => {
                        let detail = match self.client.fetch_exercise_detail(&summary.id) {
                            Ok(detail) => Some(detail),
                            Err(err) => {
                                warn!("Could not fetch detail for '{}': {}", name, err);
                                None
                            }
                        };
                        (summary.id.clone(), detail)
                    }
                    None => (String::new(), None),
                }
            };
            let payload = compile_workout(workout, self.config, &mut lookup);

            match self.client.create_workout(&payload) {
                Ok(_) => {
                    info!("Workout '{}' created", workout.title);
                    report.record(&workout.title, Outcome::Created, "");
                }
                Err(err) => {
                    error!("Workout '{}' failed: {}", workout.title, err);
                    report.record(&workout.title, Outcome::Failed, err.to_string());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, title: &str) -> ExerciseSummary {
        ExerciseSummary {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_find_by_title_is_case_insensitive() {
        let catalog = vec![summary("e1", "Push Up"), summary("e2", "Ring Dip")];

        assert_eq!(find_by_title(&catalog, "push up").unwrap().id, "e1");
        assert_eq!(find_by_title(&catalog, "  RING DIP  ").unwrap().id, "e2");
        assert!(find_by_title(&catalog, "Back Lever").is_none());
    }

    #[test]
    fn test_find_by_title_first_match_wins() {
        let catalog = vec![summary("e1", "Push Up"), summary("e2", "push up")];
        assert_eq!(find_by_title(&catalog, "Push Up").unwrap().id, "e1");
    }
}
