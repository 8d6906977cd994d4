use super::super::batch::BatchAggregator;
use super::super::domain::{ExtractionResult, ShapeError};
use super::super::risk::RiskScorer;
use super::super::validation::FieldValidations;
use super::views::{BatchEntry, BatchReport, Report, SingleReport};
use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

const DEFAULT_SINGLE_FILENAME: &str = "single_verification";

/// Assembles reports stamped with one generation time. The DOB range check
/// uses the calendar year of that time.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    generated_at: DateTime<Utc>,
    scorer: RiskScorer,
}

impl ReportBuilder {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            scorer: RiskScorer::new(generated_at.year()),
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn single(&self, result: &ExtractionResult) -> Result<Report, ShapeError> {
        if !result.is_card() {
            return Err(ShapeError::NotACard {
                filename: display_filename(result).to_string(),
            });
        }

        let report = SingleReport {
            generated_at: self.generated_at,
            filename: display_filename(result).to_string(),
            overall_assessment: result.assessment,
            fraud_score: result.fraud_score,
            is_aadhaar_card: true,
            confidence_score: result.confidence_score,
            extracted_data: result.extracted.clone(),
            indicators: result.indicators.clone(),
            validation_results: FieldValidations::of(&result.extracted),
            risk_breakdown: self.scorer.score(result),
        };

        debug!(filename = %report.filename, "single report built");
        Ok(Report::Single(report))
    }

    /// Never fails: an empty batch yields zero counts and an `UNKNOWN` batch risk.
    pub fn batch(&self, results: &[ExtractionResult]) -> Report {
        let summary = BatchAggregator::summarize(results);
        let detailed_results = results.iter().map(|result| self.entry(result)).collect();

        debug!(total_files = results.len(), "batch report built");
        Report::Batch(BatchReport {
            generated_at: self.generated_at,
            total_files: results.len(),
            summary,
            detailed_results,
        })
    }

    fn entry(&self, result: &ExtractionResult) -> BatchEntry {
        let risk_breakdown = result.is_card().then(|| self.scorer.score(result));

        BatchEntry {
            filename: result.filename.clone(),
            is_aadhaar_card: result.is_card(),
            error_type: result.error_type().map(str::to_string),
            overall_assessment: result.assessment,
            fraud_score: result.fraud_score,
            confidence_score: result.confidence_score,
            extracted_data: result.extracted.clone(),
            indicators: result.indicators.clone(),
            validation_results: FieldValidations::of(&result.extracted),
            risk_breakdown,
        }
    }
}

fn display_filename(result: &ExtractionResult) -> &str {
    result
        .filename
        .as_deref()
        .unwrap_or(DEFAULT_SINGLE_FILENAME)
}
