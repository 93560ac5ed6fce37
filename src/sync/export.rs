//! Library Export
//!
//! Projects the remote exercise library back into a spreadsheet template:
//! one row per exercise under the template's in-sheet anchor row, scalar
//! columns matched by header text, tag columns written as 0/1 sentinels
//! with the free-text skill/equipment columns left blank.

use std::path::Path;

use log::{info, warn};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use crate::compile::tags::VALUE_TAG_COLUMNS;
use crate::compile::vocabulary;
use crate::error::{Error, Result};
use crate::remote::client::ApiClient;
use crate::sheet::grid::{Cell, Grid};

/// Status written into exported rows: present remotely, not flagged for a
/// sync run.
const EXPORTED_STATUS: f64 = 2.0;

/// Anchor label marking where data rows start in the template.
const ANCHOR: &str = "EXERCISE NAME";

/// Tag columns start one past this header.
const LAST_SCALAR_COLUMN: &str = "Video link";

/// One projected template row.
#[derive(Debug, Clone)]
pub struct ExportRow {
    /// Header-keyed scalar values.
    pub values: Vec<(String, Cell)>,
    /// Names of the tags carried by the record.
    pub tags: Vec<String>,
}

impl ExportRow {
    fn value_for(&self, header: &str) -> Option<&Cell> {
        let needle = header.trim().to_lowercase();
        self.values
            .iter()
            .find(|(key, _)| key.trim().to_lowercase() == needle)
            .map(|(_, cell)| cell)
    }

    fn has_tag(&self, header: &str) -> bool {
        let needle = header.trim().to_lowercase();
        self.tags
            .iter()
            .any(|tag| tag.trim().to_lowercase() == needle)
    }
}

fn nested_title(detail: &Value, list: &str, index: usize, inner: &str) -> String {
    detail[list][index][inner]["title"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

fn text_cell(s: impl Into<String>) -> Cell {
    Cell::Text(s.into())
}

/// Projects one fetched detail record into a template row.
pub fn project_detail(detail: &Value) -> ExportRow {
    let instructions: Vec<&str> = detail["instructions"]
        .as_array()
        .map(|lines| lines.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    // Tracking ids back to display labels, without the trailing Rest field
    let field_ids: Vec<&str> = detail["fields"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let shown_ids = match field_ids.split_last() {
        Some((last, rest)) if *last == vocabulary::REST_FIELD_ID => rest,
        _ => &field_ids[..],
    };
    let tracking = shown_ids
        .iter()
        .map(|id| vocabulary::tracking_field_label(id).unwrap_or("Unknown"))
        .collect::<Vec<_>>()
        .join(", ");

    let values = vec![
        (ANCHOR.to_string(), text_cell(detail["title"].as_str().unwrap_or(""))),
        ("VIDEO STATUS".to_string(), Cell::Number(EXPORTED_STATUS)),
        (
            "Description".to_string(),
            Cell::Number(if instructions.is_empty() { 0.0 } else { 1.0 }),
        ),
        (
            "Modality".to_string(),
            text_cell(detail["modality"]["title"].as_str().unwrap_or("")),
        ),
        ("Muscle group".to_string(), text_cell(nested_title(detail, "muscle_groups", 0, "muscle_group"))),
        ("Muscle group 2".to_string(), text_cell(nested_title(detail, "muscle_groups", 1, "muscle_group"))),
        ("Muscle group 3".to_string(), text_cell(nested_title(detail, "muscle_groups", 2, "muscle_group"))),
        ("Movement pattern 1".to_string(), text_cell(nested_title(detail, "movement_patterns", 0, "movement_pattern"))),
        ("Movement pattern 2".to_string(), text_cell(nested_title(detail, "movement_patterns", 1, "movement_pattern"))),
        ("Movement pattern 3".to_string(), text_cell(nested_title(detail, "movement_patterns", 2, "movement_pattern"))),
        (
            "Category".to_string(),
            text_cell(detail["category_type_name"].as_str().unwrap_or("")),
        ),
        ("Tracking fields".to_string(), text_cell(tracking)),
        ("Instructions".to_string(), text_cell(instructions.join("\n"))),
        (
            LAST_SCALAR_COLUMN.to_string(),
            text_cell(detail["videoLink"].as_str().unwrap_or("")),
        ),
    ];

    let tags = detail["tags"]
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    ExportRow { values, tags }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        Cell::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Writes projected rows into a copy of the template.
///
/// The output workbook carries the template's header row and everything up
/// to and including the anchor row, then one row per record.
pub fn write_export(template: &Grid, rows: &[ExportRow], output: &Path) -> Result<()> {
    let anchor_row = (0..template.num_rows())
        .find(|&row| template.cell(row, 0).to_text() == ANCHOR)
        .ok_or_else(|| {
            Error::Structure(format!("'{}' anchor not found in the template", ANCHOR))
        })?;

    let width = template.headers().len();
    let tag_start = template
        .column(LAST_SCALAR_COLUMN)
        .map(|col| col + 1)
        .unwrap_or(width);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in template.headers().iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }

    // Template rows above and including the anchor are carried over
    for row in 0..=anchor_row {
        for col in 0..width {
            write_cell(sheet, (row + 1) as u32, col as u16, template.cell(row, col))?;
        }
    }

    for (index, record) in rows.iter().enumerate() {
        let out_row = (anchor_row + 2 + index) as u32;
        for (col, header) in template.headers().iter().enumerate() {
            if col >= tag_start {
                // Free-text skill/equipment columns stay blank
                if VALUE_TAG_COLUMNS.contains(&header.as_str()) {
                    continue;
                }
                let sentinel = if record.has_tag(header) { 1.0 } else { 0.0 };
                sheet.write_number(out_row, col as u16, sentinel)?;
            } else if let Some(cell) = record.value_for(header) {
                write_cell(sheet, out_row, col as u16, cell)?;
            }
        }
    }

    workbook.save(output)?;
    info!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}

/// Fetches the full library and writes it into the template.
///
/// Detail fetches run one at a time; a failed fetch skips that record and
/// the export carries on.
pub fn export_library(client: &ApiClient, template: &Grid, output: &Path) -> Result<()> {
    let catalog = client.fetch_exercise_catalog()?;
    let total = catalog.len();

    let mut rows = Vec::new();
    for (index, summary) in catalog.iter().enumerate() {
        match client.fetch_exercise_detail(&summary.id) {
            Ok(detail) => {
                info!("Fetched '{}' ({}/{})", summary.title, index + 1, total);
                rows.push(project_detail(&detail));
            }
            Err(err) => warn!("Skipping '{}': {}", summary.title, err),
        }
    }

    write_export(template, &rows, output)
}
