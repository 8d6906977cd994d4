//! Reads the envelopes produced by the upstream verification service.

mod normalizer;
mod parser;

use crate::workflows::verification::domain::{ExtractionResult, ShapeError};
use crate::workflows::verification::report::{Report, ReportBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Whether the upstream call verified one card or a batch archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    Single,
    Batch,
}

impl VerificationMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VerificationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "batch" => Ok(Self::Batch),
            other => Err(format!("unknown verification mode '{other}', expected single or batch")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read upstream payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("upstream payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Typed results for one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationPayload {
    Single(ExtractionResult),
    Batch(Vec<ExtractionResult>),
}

impl VerificationPayload {
    pub fn mode(&self) -> VerificationMode {
        match self {
            Self::Single(_) => VerificationMode::Single,
            Self::Batch(_) => VerificationMode::Batch,
        }
    }

    pub fn results(&self) -> &[ExtractionResult] {
        match self {
            Self::Single(result) => std::slice::from_ref(result),
            Self::Batch(results) => results,
        }
    }

    pub fn build_report(&self, builder: &ReportBuilder) -> Result<Report, ShapeError> {
        match self {
            Self::Single(result) => builder.single(result),
            Self::Batch(results) => Ok(builder.batch(results)),
        }
    }
}

pub struct UpstreamImporter;

impl UpstreamImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        mode: VerificationMode,
    ) -> Result<VerificationPayload, IntakeError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, mode)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        mode: VerificationMode,
    ) -> Result<VerificationPayload, IntakeError> {
        let payload: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_value(&payload, mode)?)
    }

    pub fn from_value(
        payload: &Value,
        mode: VerificationMode,
    ) -> Result<VerificationPayload, ShapeError> {
        let mut results = parser::parse_results(payload, mode)?;

        match mode {
            VerificationMode::Batch => Ok(VerificationPayload::Batch(results)),
            VerificationMode::Single => results
                .pop()
                .map(VerificationPayload::Single)
                .ok_or(ShapeError::MissingResult),
        }
    }
}
