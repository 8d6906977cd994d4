use super::report::{ExportError, Report, ReportKind};
use crate::config::ExportConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(self) -> mime::Mime {
        match self {
            Self::Json => mime::APPLICATION_JSON,
            Self::Csv => mime::TEXT_CSV,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format '{0}', expected json or csv")]
pub struct FormatParseError(pub String);

impl FromStr for ExportFormat {
    type Err = FormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(FormatParseError(value.to_string())),
        }
    }
}

/// What the presentation layer needs to trigger a file save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub full_filename: String,
    pub mime_type: String,
    pub encoded_payload: String,
}

impl DownloadDescriptor {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded_payload)
    }
}

pub struct ReportPackager;

impl ReportPackager {
    pub fn package(stem: &str, text: &str, format: ExportFormat) -> DownloadDescriptor {
        DownloadDescriptor {
            full_filename: format!("{stem}.{}", format.extension()),
            mime_type: format.mime_type().to_string(),
            encoded_payload: STANDARD.encode(text.as_bytes()),
        }
    }

    /// Serializes `report` and packages it under the configured prefix for its kind.
    pub fn export(
        report: &Report,
        format: ExportFormat,
        config: &ExportConfig,
    ) -> Result<DownloadDescriptor, ExportError> {
        let prefix = match report.kind() {
            ReportKind::Single => &config.single_prefix,
            ReportKind::Batch => &config.batch_prefix,
        };
        let stem = report_file_stem(prefix, report.generated_at());
        let text = report.render(format)?;
        Ok(Self::package(&stem, &text, format))
    }
}

/// `<prefix>_<ISO timestamp>` with `:` and `.` replaced by `-`.
pub fn report_file_stem(prefix: &str, generated_at: DateTime<Utc>) -> String {
    let timestamp = generated_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}_{timestamp}")
}
