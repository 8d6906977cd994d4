use crate::workflows::verification::domain::{
    Assessment, ErrorKind, ExtractedFields, ExtractionResult,
};
use serde_json::{Map, Value};

pub(crate) const MALFORMED_RECORD_CODE: &str = "MALFORMED_RECORD";
const ID_NUMBER_KEYS: [&str; 3] = ["aadhaar", "id_number", "idNumber"];

/// Maps one loosely typed upstream record onto `ExtractionResult`. Wrongly
/// typed values fall back to their defaults instead of failing.
pub(crate) fn normalize_record(record: &Map<String, Value>) -> ExtractionResult {
    let error_code = record.get("error").and_then(error_text);
    let error_kind = ErrorKind::classify(error_code.as_deref());

    ExtractionResult {
        filename: record.get("filename").and_then(scalar_text),
        error_kind,
        error_code,
        assessment: record
            .get("assessment")
            .and_then(Value::as_str)
            .map_or(Assessment::Unknown, Assessment::from_label),
        fraud_score: record.get("fraud_score").and_then(number).unwrap_or(0.0),
        confidence_score: confidence(record),
        extracted: record
            .get("extracted")
            .and_then(Value::as_object)
            .map(extracted_fields)
            .unwrap_or_default(),
        indicators: record
            .get("indicators")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(scalar_text).collect())
            .unwrap_or_default(),
        annotated_image: record.get("annotated_image").and_then(scalar_text),
    }
}

/// Stand-in for a batch entry that was not an object at all.
pub(crate) fn malformed_record() -> ExtractionResult {
    let mut result = ExtractionResult::new(Assessment::Unknown);
    result.error_kind = ErrorKind::Other;
    result.error_code = Some(MALFORMED_RECORD_CODE.to_string());
    result
}

/// Blank or invisible-only text is absent; anything else passes through as sent.
pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let blank = value
        .chars()
        .all(|c| c.is_whitespace() || matches!(c, '\u{feff}' | '\u{200b}'));
    (!blank).then(|| value.to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => normalize_text(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `false` is how upstream spells "no error".
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(false) => None,
        other => scalar_text(other),
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

fn confidence(record: &Map<String, Value>) -> Option<f64> {
    record
        .get("aadhaar_verification")
        .and_then(|verification| verification.get("confidence_score"))
        .and_then(number)
        .or_else(|| record.get("confidence_score").and_then(number))
}

fn extracted_fields(extracted: &Map<String, Value>) -> ExtractedFields {
    let text = |key: &str| extracted.get(key).and_then(scalar_text);

    ExtractedFields {
        name: text("name"),
        dob: text("dob"),
        gender: text("gender"),
        id_number: ID_NUMBER_KEYS.into_iter().find_map(text),
    }
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &Value) -> Option<ExtractionResult> {
    value.as_object().map(normalize_record)
}
