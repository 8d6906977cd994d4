use super::super::batch::BatchSummary;
use super::super::domain::{Assessment, ExtractedFields};
use super::super::risk::RiskBreakdown;
use super::super::validation::FieldValidations;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Single,
    Batch,
}

impl ReportKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Batch => "batch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleReport {
    pub generated_at: DateTime<Utc>,
    pub filename: String,
    pub overall_assessment: Assessment,
    pub fraud_score: f64,
    pub is_aadhaar_card: bool,
    pub confidence_score: Option<f64>,
    pub extracted_data: ExtractedFields,
    pub indicators: Vec<String>,
    pub validation_results: FieldValidations,
    pub risk_breakdown: RiskBreakdown,
}

/// One file of a batch, shaped like a single report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub filename: Option<String>,
    pub is_aadhaar_card: bool,
    pub error_type: Option<String>,
    pub overall_assessment: Assessment,
    pub fraud_score: f64,
    pub confidence_score: Option<f64>,
    pub extracted_data: ExtractedFields,
    pub indicators: Vec<String>,
    pub validation_results: FieldValidations,
    /// Absent for files that were not recognized as a card.
    pub risk_breakdown: Option<RiskBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub total_files: usize,
    pub summary: BatchSummary,
    pub detailed_results: Vec<BatchEntry>,
}

/// Exportable unit, tagged by `verification_type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verification_type", rename_all = "snake_case")]
pub enum Report {
    Single(SingleReport),
    Batch(BatchReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Single(_) => ReportKind::Single,
            Self::Batch(_) => ReportKind::Batch,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        match self {
            Self::Single(report) => report.generated_at,
            Self::Batch(report) => report.generated_at,
        }
    }
}
