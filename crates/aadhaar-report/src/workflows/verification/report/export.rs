use super::super::domain::{ExtractedFields, RiskLevel, ValidationOutcome, ValidationStatus};
use super::super::risk::RiskBreakdown;
use super::table::{Cell, CsvTable, MISSING_TEXT};
use super::views::{BatchEntry, BatchReport, Report, SingleReport};
use super::ExportError;

const SINGLE_HEADER: &[&str] = &["Field", "Value", "Status", "RiskLevel", "Details"];

const BATCH_HEADER: &[&str] = &[
    "Filename",
    "IsCard",
    "ErrorType",
    "Assessment",
    "FraudScore",
    "Confidence",
    "IdNumber",
    "Name",
    "Dob",
    "Gender",
    "IdValidation",
    "NameValidation",
    "DobValidation",
    "GenderValidation",
    "RiskLevel",
];

pub(crate) fn to_json(report: &Report) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub(crate) fn to_csv(report: &Report) -> Result<String, ExportError> {
    match report {
        Report::Single(single) => single_table(single).render(),
        Report::Batch(batch) => batch_table(batch).render(),
    }
}

fn single_table(report: &SingleReport) -> CsvTable {
    let mut table = CsvTable::new(SINGLE_HEADER);
    let fields = &report.extracted_data;
    let validations = &report.validation_results;

    table.push(field_row(
        "Aadhaar Number",
        fields.id_number.as_deref(),
        validations.id_number,
        RiskLevel::High,
        "expected 12 digits",
    ));
    table.push(field_row(
        "Name",
        fields.name.as_deref(),
        validations.name,
        RiskLevel::Medium,
        "expected at least 2 characters",
    ));
    table.push(field_row(
        "Date of Birth",
        fields.dob.as_deref(),
        validations.dob,
        RiskLevel::Medium,
        "expected DD/MM/YYYY or YYYY",
    ));
    table.push(field_row(
        "Gender",
        fields.gender.as_deref(),
        validations.gender,
        RiskLevel::Medium,
        "expected male, female, m or f",
    ));

    let risk = &report.risk_breakdown;
    table.push(risk_row(
        "Text Extraction Risk",
        risk.text_extraction_risk,
        format!(
            "{}/{} fields extracted",
            risk.fields_extracted,
            ExtractedFields::EXPECTED
        ),
    ));
    table.push(risk_row(
        "Data Consistency Risk",
        risk.data_consistency_risk,
        consistency_detail(risk),
    ));
    table.push(risk_row(
        "Image Quality Risk",
        risk.image_quality_risk,
        image_detail(report.confidence_score, risk.face_detected),
    ));

    for (index, indicator) in report.indicators.iter().enumerate() {
        table.push(vec![
            Cell::text(format!("Indicator {}", index + 1)),
            Cell::text(indicator.as_str()),
            Cell::Missing,
            indicator_severity(indicator).map_or(Cell::Missing, |level| Cell::text(level.label())),
            Cell::text(""),
        ]);
    }

    table
}

fn batch_table(report: &BatchReport) -> CsvTable {
    let mut table = CsvTable::new(BATCH_HEADER);
    for entry in &report.detailed_results {
        table.push(batch_row(entry));
    }
    table
}

fn batch_row(entry: &BatchEntry) -> Vec<Cell> {
    let fields = &entry.extracted_data;
    let validations = &entry.validation_results;

    vec![
        Cell::optional(entry.filename.as_deref()),
        Cell::Flag(entry.is_aadhaar_card),
        Cell::optional(entry.error_type.as_deref()),
        Cell::text(entry.overall_assessment.label()),
        Cell::Number(entry.fraud_score),
        entry.confidence_score.map_or(Cell::Missing, Cell::Number),
        Cell::optional(fields.id_number.as_deref()),
        Cell::optional(fields.name.as_deref()),
        Cell::optional(fields.dob.as_deref()),
        Cell::optional(fields.gender.as_deref()),
        Cell::text(validations.id_number.status.label()),
        Cell::text(validations.name.status.label()),
        Cell::text(validations.dob.status.label()),
        Cell::text(validations.gender.status.label()),
        Cell::text(entry.overall_assessment.label()),
    ]
}

fn field_row(
    label: &str,
    value: Option<&str>,
    outcome: ValidationOutcome,
    failure_risk: RiskLevel,
    format_hint: &str,
) -> Vec<Cell> {
    let risk = if outcome.valid {
        RiskLevel::Low
    } else {
        failure_risk
    };
    let details = match outcome.status {
        ValidationStatus::Valid => "",
        ValidationStatus::Missing => "not extracted",
        ValidationStatus::InvalidFormat | ValidationStatus::TooShort | ValidationStatus::Invalid => {
            format_hint
        }
    };

    vec![
        Cell::text(label),
        Cell::optional(value),
        Cell::text(outcome.status.label()),
        Cell::text(risk.label()),
        Cell::text(details),
    ]
}

fn risk_row(label: &str, level: RiskLevel, details: String) -> Vec<Cell> {
    vec![
        Cell::text(label),
        Cell::text(level.label()),
        Cell::Missing,
        Cell::text(level.label()),
        Cell::Text(details),
    ]
}

fn consistency_detail(risk: &RiskBreakdown) -> String {
    if risk.inconsistencies.is_empty() {
        return "no inconsistencies".to_string();
    }
    risk.inconsistencies
        .iter()
        .map(|flag| flag.label())
        .collect::<Vec<_>>()
        .join("; ")
}

fn image_detail(confidence: Option<f64>, face_detected: bool) -> String {
    let confidence = confidence.map_or_else(|| MISSING_TEXT.to_string(), |value| value.to_string());
    let face = if face_detected {
        "face detected"
    } else {
        "no face marker"
    };
    format!("confidence {confidence}, {face}")
}

/// Reads the severity word upstream puts before the first colon (`"🔴 HIGH: ..."`).
pub(crate) fn indicator_severity(indicator: &str) -> Option<RiskLevel> {
    let (head, _) = indicator.split_once(':')?;
    let word = head.split_whitespace().last()?;
    match word {
        "HIGH" => Some(RiskLevel::High),
        "MEDIUM" => Some(RiskLevel::Medium),
        "LOW" => Some(RiskLevel::Low),
        _ => None,
    }
}
