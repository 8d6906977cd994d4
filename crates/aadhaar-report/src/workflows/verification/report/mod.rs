mod builder;
mod export;
mod table;
pub mod views;

pub use builder::ReportBuilder;
pub use views::{BatchEntry, BatchReport, Report, ReportKind, SingleReport};

use super::package::ExportFormat;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Report {
    /// Pretty-printed JSON with stable snake_case field names.
    pub fn to_json(&self) -> Result<String, ExportError> {
        export::to_json(self)
    }

    /// Flat table: one row per field for a single report, one row per file for a batch.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        export::to_csv(self)
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
        }
    }
}
