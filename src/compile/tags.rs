//! Tag Reconciliation
//!
//! Turns the raw tag flag columns of a library row into an ordered list of
//! requested tag names, then resolves those names against the remote tag
//! catalog, creating missing tags on the fly.
//!
//! The catalog is fetched once per run. Created ids are remembered for the
//! rest of the run, so a given name is created at most once; nothing is
//! cached across runs. Two operators running concurrently can still create
//! duplicate tags with the same name (known gap, single-operator tool).

use std::collections::HashMap;

use log::debug;

use crate::error::Result;
use crate::remote::types::TagEntry;
use crate::sheet::model::TagFlag;

/// Free-text tag columns whose cell value, not the column name, becomes the
/// requested tag.
pub const VALUE_TAG_COLUMNS: &[&str] = &[
    "SKILL NAME 1",
    "SKILL NAME 2",
    "SKILL NAME 3",
    "EQUIPMENT 1",
    "EQUIPMENT 2",
    "EQUIPMENT 3",
    "EQUIPMENT 4",
];

/// Converts the raw flag captures into the ordered requested tag names.
///
/// Flag columns contribute their own column name when truthy; the free-text
/// skill/equipment columns contribute their cell value when non-empty.
pub fn requested_tags(flags: &[TagFlag]) -> Vec<String> {
    let mut names = Vec::new();
    for flag in flags {
        if !flag.value.is_truthy() {
            continue;
        }
        if VALUE_TAG_COLUMNS.contains(&flag.column.as_str()) {
            names.push(flag.value.to_text());
        } else {
            names.push(flag.column.clone());
        }
    }
    names
}

/// Name-to-id reconciler over the remote tag catalog.
pub struct TagReconciler {
    /// Keyed by lowercased name so "Core" and "core" collapse to one tag.
    mappings: HashMap<String, String>,
}

impl TagReconciler {
    /// Builds the reconciler from a fetched catalog.
    pub fn new(catalog: Vec<TagEntry>) -> Self {
        let mappings = catalog
            .into_iter()
            .map(|tag| (tag.name.trim().to_lowercase(), tag.id))
            .collect();
        Self { mappings }
    }

    /// Number of known tag names.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// True when no tags are known yet.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Resolves requested names to ids, in first-occurrence order with
    /// duplicates and empties dropped. Missing names are created through
    /// `create` and remembered for the rest of the run.
    pub fn resolve_or_create<F>(&mut self, requested: &[String], mut create: F) -> Result<Vec<String>>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let mut ids = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for name in requested {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let key = name.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key.clone());

            let id = match self.mappings.get(&key) {
                Some(id) => id.clone(),
                None => {
                    debug!("Tag '{}' not in catalog, creating", name);
                    let id = create(name)?;
                    self.mappings.insert(key, id.clone());
                    id
                }
            };
            ids.push(id);
        }

        Ok(ids)
    }
}
