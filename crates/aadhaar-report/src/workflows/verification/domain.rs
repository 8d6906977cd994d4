use serde::{Deserialize, Serialize};

/// Upstream error code separating "not a card" from every other failure.
pub const NOT_AADHAAR_CODE: &str = "NOT_AADHAAR";

/// Classification of the upstream error field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    None,
    NotAadhaar,
    Other,
}

impl ErrorKind {
    /// Blank codes mean no error; any code besides `NOT_AADHAAR` is a processing error.
    pub fn classify(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            None | Some("") => Self::None,
            Some(NOT_AADHAAR_CODE) => Self::NotAadhaar,
            Some(_) => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::NotAadhaar => NOT_AADHAAR_CODE,
            Self::Other => "OTHER",
        }
    }
}

/// Coarse risk label assigned upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assessment {
    Low,
    Moderate,
    High,
    #[serde(other)]
    Unknown,
}

impl Assessment {
    /// Labels the core does not know (`INVALID_INPUT`, `SKIPPED`, ...) collapse to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MODERATE" => Self::Moderate,
            "HIGH" => Self::High,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub const fn severity(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
            Self::Unknown => 0,
        }
    }
}

/// Sub-risk category used for report drill-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Fields pulled off the card by OCR. Absent and blank values are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

impl ExtractedFields {
    pub const EXPECTED: usize = 4;

    pub fn present_count(&self) -> usize {
        [&self.name, &self.dob, &self.gender, &self.id_number]
            .into_iter()
            .filter(|value| value.as_deref().is_some_and(|text| !text.is_empty()))
            .count()
    }
}

/// One upstream verification result. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub error_kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub assessment: Assessment,
    #[serde(default)]
    pub fraud_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub extracted: ExtractedFields,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_image: Option<String>,
}

impl ExtractionResult {
    /// Error-free result with nothing extracted yet.
    pub fn new(assessment: Assessment) -> Self {
        Self {
            filename: None,
            error_kind: ErrorKind::None,
            error_code: None,
            assessment,
            fraud_score: 0.0,
            confidence_score: None,
            extracted: ExtractedFields::default(),
            indicators: Vec::new(),
            annotated_image: None,
        }
    }

    pub fn is_card(&self) -> bool {
        self.error_kind != ErrorKind::NotAadhaar
    }

    /// Text for the `ErrorType` column: the raw upstream code when one was sent.
    pub fn error_type(&self) -> Option<&str> {
        match self.error_kind {
            ErrorKind::None => None,
            ErrorKind::NotAadhaar => Some(NOT_AADHAAR_CODE),
            ErrorKind::Other => Some(
                self.error_code
                    .as_deref()
                    .unwrap_or_else(|| ErrorKind::Other.label()),
            ),
        }
    }
}

/// Outcome category of a single field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Missing,
    InvalidFormat,
    TooShort,
    Invalid,
}

impl ValidationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Missing => "MISSING",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::TooShort => "TOO_SHORT",
            Self::Invalid => "INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub status: ValidationStatus,
    pub valid: bool,
}

impl From<ValidationStatus> for ValidationOutcome {
    fn from(status: ValidationStatus) -> Self {
        Self {
            status,
            valid: status == ValidationStatus::Valid,
        }
    }
}

/// The only failures surfaced by the core: input that lacks the shape a report needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected a sequence of verification results")]
    ExpectedSequence,
    #[error("verification result is missing")]
    MissingResult,
    #[error("{filename} is not an Aadhaar card; no risk breakdown can be built")]
    NotACard { filename: String },
}
