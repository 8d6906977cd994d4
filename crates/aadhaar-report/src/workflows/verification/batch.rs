use super::domain::{Assessment, ErrorKind, ExtractionResult};
use serde::Serialize;
use tracing::debug;

/// Mutually exclusive partition of a batch. First matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    NonAadhaar,
    Error,
    Valid,
}

impl Bucket {
    pub fn of(result: &ExtractionResult) -> Self {
        match result.error_kind {
            ErrorKind::NotAadhaar => Self::NonAadhaar,
            ErrorKind::Other => Self::Error,
            ErrorKind::None => Self::Valid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    #[serde(rename = "LOW")]
    pub low: usize,
    #[serde(rename = "MODERATE")]
    pub moderate: usize,
    #[serde(rename = "HIGH")]
    pub high: usize,
}

impl RiskDistribution {
    fn record(&mut self, assessment: Assessment) {
        match assessment {
            Assessment::Low => self.low += 1,
            Assessment::Moderate => self.moderate += 1,
            Assessment::High => self.high += 1,
            Assessment::Unknown => {}
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_processed: usize,
    pub valid_count: usize,
    pub non_aadhaar_count: usize,
    pub error_count: usize,
    pub risk_distribution: RiskDistribution,
    pub overall_batch_risk: Assessment,
    pub success_rate_pct: f64,
}

impl BatchSummary {
    /// Sum of the partition buckets; always equals `total_processed`.
    pub fn bucket_total(&self) -> usize {
        self.valid_count + self.non_aadhaar_count + self.error_count
    }
}

pub struct BatchAggregator;

impl BatchAggregator {
    pub fn summarize(results: &[ExtractionResult]) -> BatchSummary {
        let mut valid_count = 0;
        let mut non_aadhaar_count = 0;
        let mut error_count = 0;
        let mut risk_distribution = RiskDistribution::default();
        let mut severity_total: u32 = 0;

        for result in results {
            match Bucket::of(result) {
                Bucket::NonAadhaar => non_aadhaar_count += 1,
                Bucket::Error => error_count += 1,
                Bucket::Valid => {
                    valid_count += 1;
                    risk_distribution.record(result.assessment);
                    severity_total += result.assessment.severity();
                }
            }
        }

        let total_processed = results.len();
        let overall_batch_risk = overall_batch_risk(severity_total, total_processed);
        let success_rate_pct = if total_processed > 0 {
            valid_count as f64 / total_processed as f64 * 100.0
        } else {
            0.0
        };

        debug!(
            total_processed,
            valid_count,
            non_aadhaar_count,
            error_count,
            overall = overall_batch_risk.label(),
            "batch summarized"
        );

        BatchSummary {
            total_processed,
            valid_count,
            non_aadhaar_count,
            error_count,
            risk_distribution,
            overall_batch_risk,
            success_rate_pct,
        }
    }
}

/// Averages over every result, not only valid ones.
fn overall_batch_risk(severity_total: u32, total_processed: usize) -> Assessment {
    if total_processed == 0 {
        return Assessment::Unknown;
    }

    let average = f64::from(severity_total) / total_processed as f64;
    if average >= 2.5 {
        Assessment::High
    } else if average >= 1.5 {
        Assessment::Moderate
    } else {
        Assessment::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(assessment: Assessment, error: Option<&str>) -> ExtractionResult {
        let mut result = ExtractionResult::new(assessment);
        result.error_kind = ErrorKind::classify(error);
        result.error_code = error.map(str::to_string);
        result
    }

    #[test]
    fn empty_batch_is_unknown() {
        let summary = BatchAggregator::summarize(&[]);
        assert_eq!(summary.total_processed, 0);
        assert_eq!(summary.valid_count, 0);
        assert_eq!(summary.non_aadhaar_count, 0);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.risk_distribution, RiskDistribution::default());
        assert_eq!(summary.overall_batch_risk, Assessment::Unknown);
        assert_eq!(summary.success_rate_pct, 0.0);
    }

    #[test]
    fn averages_severity_over_batch() {
        let results = [
            result(Assessment::Low, None),
            result(Assessment::High, None),
            result(Assessment::High, None),
        ];
        let summary = BatchAggregator::summarize(&results);
        assert_eq!(summary.overall_batch_risk, Assessment::Moderate);
        assert_eq!(summary.risk_distribution.high, 2);
        assert_eq!(summary.risk_distribution.low, 1);
    }

    #[test]
    fn partitions_not_aadhaar_and_errors() {
        let results = [
            result(Assessment::Unknown, Some("NOT_AADHAAR")),
            result(Assessment::Unknown, Some("TOO_LARGE")),
            result(Assessment::Low, None),
        ];
        let summary = BatchAggregator::summarize(&results);
        assert_eq!(summary.non_aadhaar_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.valid_count, 1);
        assert_eq!(summary.bucket_total(), summary.total_processed);
    }

    #[test]
    fn unknown_assessments_count_as_valid_but_not_distributed() {
        let results = [
            result(Assessment::Unknown, None),
            result(Assessment::Moderate, None),
        ];
        let summary = BatchAggregator::summarize(&results);
        assert_eq!(summary.valid_count, 2);
        assert_eq!(summary.risk_distribution.total(), 1);
        assert_eq!(summary.overall_batch_risk, Assessment::Low);
    }

    #[test]
    fn error_bucket_assessments_do_not_score() {
        let results = [
            result(Assessment::High, Some("TIMEOUT")),
            result(Assessment::High, None),
        ];
        let summary = BatchAggregator::summarize(&results);
        assert_eq!(summary.risk_distribution.high, 1);
        assert_eq!(summary.overall_batch_risk, Assessment::Moderate);
        assert_eq!(summary.success_rate_pct, 50.0);
    }

    #[test]
    fn buckets_always_sum_to_total() {
        let codes = [None, Some("NOT_AADHAAR"), Some("ERROR"), Some(""), Some("x")];
        let assessments = [
            Assessment::Low,
            Assessment::Moderate,
            Assessment::High,
            Assessment::Unknown,
        ];
        let mut results = Vec::new();
        for (index, code) in codes.iter().cycle().take(23).enumerate() {
            results.push(result(assessments[index % assessments.len()], *code));
            let summary = BatchAggregator::summarize(&results);
            assert_eq!(summary.bucket_total(), summary.total_processed);
            assert_eq!(summary.total_processed, results.len());
        }
    }
}
