use super::domain::{Assessment, ExtractedFields, ExtractionResult, RiskLevel};
use super::validation::strip_whitespace;
use serde::Serialize;

const EARLIEST_BIRTH_YEAR: i32 = 1900;
const ID_NUMBER_LENGTH: usize = 12;
const FACE_DETECTED_MARKER: &str = "Face detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyFlag {
    DobOutOfRange,
    IdLengthInvalid,
}

impl ConsistencyFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DobOutOfRange => "DOB_OUT_OF_RANGE",
            Self::IdLengthInvalid => "ID_LENGTH_INVALID",
        }
    }
}

/// Drill-down risk categories for one result. `overall_risk` is the upstream label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBreakdown {
    pub text_extraction_risk: RiskLevel,
    pub data_consistency_risk: RiskLevel,
    pub image_quality_risk: RiskLevel,
    pub overall_risk: Assessment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inconsistencies: Vec<ConsistencyFlag>,
    pub fields_extracted: usize,
    pub face_detected: bool,
}

/// Sub-risk heuristics. The reference year bounds plausible birth years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskScorer {
    current_year: i32,
}

impl RiskScorer {
    pub const fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Callers must not pass `NOT_AADHAAR` results; their fields carry no meaning.
    pub fn score(&self, result: &ExtractionResult) -> RiskBreakdown {
        let inconsistencies = self.consistency_flags(&result.extracted);
        let face_detected = has_face_marker(&result.indicators);

        RiskBreakdown {
            text_extraction_risk: text_extraction_risk(&result.extracted),
            data_consistency_risk: consistency_risk(&inconsistencies),
            image_quality_risk: image_quality_risk(result.confidence_score, face_detected),
            overall_risk: result.assessment,
            inconsistencies,
            fields_extracted: result.extracted.present_count(),
            face_detected,
        }
    }

    pub fn consistency_flags(&self, fields: &ExtractedFields) -> Vec<ConsistencyFlag> {
        let mut flags = Vec::new();

        if let Some(year) = fields.dob.as_deref().and_then(first_four_digit_run) {
            if year < EARLIEST_BIRTH_YEAR || year > self.current_year {
                flags.push(ConsistencyFlag::DobOutOfRange);
            }
        }

        if let Some(id_number) = fields.id_number.as_deref().filter(|id| !id.is_empty()) {
            // Unicode scalar values, so one emoji counts once.
            if strip_whitespace(id_number).chars().count() != ID_NUMBER_LENGTH {
                flags.push(ConsistencyFlag::IdLengthInvalid);
            }
        }

        flags
    }
}

pub fn text_extraction_risk(fields: &ExtractedFields) -> RiskLevel {
    let completeness = fields.present_count() as f32 / ExtractedFields::EXPECTED as f32;
    if completeness >= 0.75 {
        RiskLevel::Low
    } else if completeness >= 0.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn consistency_risk(flags: &[ConsistencyFlag]) -> RiskLevel {
    match flags.len() {
        0 => RiskLevel::Low,
        1 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Proxy only: upstream confidence plus face presence stand in for image metrics.
pub fn image_quality_risk(confidence: Option<f64>, face_detected: bool) -> RiskLevel {
    let confidence = confidence.unwrap_or(0.0);
    if confidence >= 80.0 && face_detected {
        RiskLevel::Low
    } else if confidence >= 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn has_face_marker(indicators: &[String]) -> bool {
    indicators
        .iter()
        .any(|indicator| indicator.contains(FACE_DETECTED_MARKER))
}

fn first_four_digit_run(value: &str) -> Option<i32> {
    value
        .as_bytes()
        .windows(4)
        .find(|window| window.iter().all(u8::is_ascii_digit))
        .map(|window| {
            window
                .iter()
                .fold(0, |year, digit| year * 10 + i32::from(digit - b'0'))
        })
}
