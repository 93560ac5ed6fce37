//! Error Types
//!
//! Crate-wide error taxonomy. The abort-vs-continue policy lives at the
//! call sites: authentication and sheet-structure failures abort a run,
//! everything else is caught per record by the sync engine.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes surfaced by sheetlift.
#[derive(Error, Debug)]
pub enum Error {
    /// Login failed, or the login response carried no token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Anchor or count bookkeeping broke while extracting records.
    #[error("Sheet structure error: {0}")]
    Structure(String),

    /// A controlled-vocabulary label could not be resolved.
    #[error("{field} '{value}' not recognized")]
    Vocabulary {
        /// Which vocabulary rejected the label (e.g. "Modality").
        field: &'static str,
        /// The offending label as it appeared in the sheet.
        value: String,
    },

    /// The remote service answered outside the 2xx class.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure: timeout, connection, or body decoding.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The input workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// The export workbook could not be written.
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_error_message_names_field_and_value() {
        let err = Error::Vocabulary {
            field: "Modality",
            value: "telekinesis".to_string(),
        };
        assert_eq!(err.to_string(), "Modality 'telekinesis' not recognized");
    }

    #[test]
    fn test_structure_error_message() {
        let err = Error::Structure("ran out of section blocks".to_string());
        assert!(err.to_string().contains("ran out of section blocks"));
    }

    #[test]
    fn test_api_error_carries_status() {
        let err = Error::Api {
            status: 422,
            body: "bad payload".to_string(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("bad payload"));
    }
}
