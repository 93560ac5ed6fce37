//! Sync Reporting
//!
//! Collects one outcome per processed record and renders the end-of-run
//! summary. Failures are recorded, never re-raised.

use colored::Colorize;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
    Failed,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    fn colored_label(self) -> String {
        match self {
            Self::Created => self.label().green().to_string(),
            Self::Updated => self.label().blue().to_string(),
            Self::Skipped => self.label().yellow().to_string(),
            Self::Failed => self.label().red().to_string(),
        }
    }
}

/// One record's result.
#[derive(Debug, Clone)]
pub struct RecordResult {
    pub name: String,
    pub outcome: Outcome,
    pub detail: String,
}

/// Accumulated results for a run.
#[derive(Debug, Default)]
pub struct SyncReport {
    results: Vec<RecordResult>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one outcome.
    pub fn record(&mut self, name: &str, outcome: Outcome, detail: impl Into<String>) {
        self.results.push(RecordResult {
            name: name.to_string(),
            outcome,
            detail: detail.into(),
        });
    }

    /// All recorded results, in processing order.
    pub fn results(&self) -> &[RecordResult] {
        &self.results
    }

    /// Number of records with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// True when any record failed.
    pub fn has_failures(&self) -> bool {
        self.count(Outcome::Failed) > 0
    }

    /// Renders the human-readable run summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\nSync summary: {} created, {} updated, {} skipped, {} failed\n",
            self.count(Outcome::Created),
            self.count(Outcome::Updated),
            self.count(Outcome::Skipped),
            self.count(Outcome::Failed),
        ));

        for result in &self.results {
            out.push_str(&format!(
                "  [{}] {}",
                result.outcome.colored_label(),
                result.name
            ));
            if !result.detail.is_empty() {
                out.push_str(&format!(" - {}", result.detail));
            }
            out.push('\n');
        }

        out
    }
}
