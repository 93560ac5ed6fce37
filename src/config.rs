//! Operator Configuration
//!
//! Loads `sheetlift.toml` from an explicit `--config` path or the current
//! directory, falling back to compiled defaults. The file carries the
//! operator's identity constants and run sentinels; credentials are never
//! stored here (they come from flags, environment, or prompts).
//!
//! # Example file
//!
//! ```toml
//! author_id = "666c67f6c98eb80026f047c9"
//! author_name = "Jane Coach"
//! timezone = "America/Los_Angeles"
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api-prod3.everfit.io";

/// Platform identifier of the default modality, kept on exercise payloads
/// when the sheet leaves the modality column blank.
const DEFAULT_MODALITY_ID: &str = "66013e83b117d35345209b07";

/// Default timezone stamped onto workout payloads.
const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Status sentinel marking a record as ready to add.
const DEFAULT_READY_STATUS: i64 = 1;

/// Status sentinel marking a record as ready to update.
const DEFAULT_UPDATE_STATUS: i64 = 3;

/// Config file looked up in the working directory when no path is given.
const CONFIG_FILE: &str = "sheetlift.toml";

/// Operator configuration for a sync run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the remote coaching service.
    pub base_url: String,

    /// Platform identifier of the authoring coach.
    pub author_id: String,

    /// Display name of the authoring coach.
    pub author_name: String,

    /// Timezone stamped onto workout payloads.
    pub timezone: String,

    /// Modality identifier used when a record specifies none.
    pub default_modality: String,

    /// Status value gating records into add runs.
    pub ready_status: i64,

    /// Status value gating records into update runs.
    pub update_status: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            author_id: String::new(),
            author_name: String::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_modality: DEFAULT_MODALITY_ID.to_string(),
            ready_status: DEFAULT_READY_STATUS,
            update_status: DEFAULT_UPDATE_STATUS,
        }
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist and parse; otherwise `sheetlift.toml` in
    /// the working directory is used when present, and compiled defaults
    /// apply when it is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if Path::new(CONFIG_FILE).exists() {
            return Self::from_file(CONFIG_FILE);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parses a TOML config file.
    fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read '{}': {}", path, e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse '{}': {}", path, e)))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}
