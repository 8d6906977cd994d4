use super::normalizer::{malformed_record, normalize_record};
use super::VerificationMode;
use crate::workflows::verification::domain::{ErrorKind, ExtractionResult, ShapeError};
use serde_json::{Map, Value};
use tracing::warn;

const UNSPECIFIED_ERROR_CODE: &str = "UNSPECIFIED_ERROR";

/// Unwraps the upstream success/failure envelope for the requested mode.
/// Bare records and bare arrays are accepted without an envelope.
pub(crate) fn parse_results(
    payload: &Value,
    mode: VerificationMode,
) -> Result<Vec<ExtractionResult>, ShapeError> {
    let envelope = payload.as_object().filter(|object| object.contains_key("success"));

    match (envelope, mode) {
        (Some(envelope), _) if !is_success(envelope) => Ok(vec![failure_record(envelope)]),
        (Some(envelope), VerificationMode::Single) => envelope
            .get("result")
            .map(single_record)
            .unwrap_or(Err(ShapeError::MissingResult)),
        (Some(envelope), VerificationMode::Batch) => envelope
            .get("results")
            .ok_or(ShapeError::ExpectedSequence)
            .and_then(batch_records),
        (None, VerificationMode::Single) => single_record(payload),
        (None, VerificationMode::Batch) => match payload {
            Value::Object(object) => match object.get("results") {
                Some(results) => batch_records(results),
                None => bare_error_record(object),
            },
            other => batch_records(other),
        },
    }
}

fn is_success(envelope: &Map<String, Value>) -> bool {
    envelope.get("success").and_then(Value::as_bool) == Some(true)
}

fn single_record(value: &Value) -> Result<Vec<ExtractionResult>, ShapeError> {
    value
        .as_object()
        .map(|record| vec![normalize_record(record)])
        .ok_or(ShapeError::MissingResult)
}

fn batch_records(value: &Value) -> Result<Vec<ExtractionResult>, ShapeError> {
    let items = value.as_array().ok_or(ShapeError::ExpectedSequence)?;

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.as_object() {
            Some(record) => normalize_record(record),
            None => {
                warn!(index, "batch entry is not an object; routing to error bucket");
                malformed_record()
            }
        })
        .collect())
}

/// Error responses such as `{"error": "ZIP file is required"}` carry no
/// `results`; they still count as one error-bucket member.
fn bare_error_record(object: &Map<String, Value>) -> Result<Vec<ExtractionResult>, ShapeError> {
    let record = normalize_record(object);
    if record.error_code.is_some() {
        Ok(vec![record])
    } else {
        Err(ShapeError::ExpectedSequence)
    }
}

/// A failed call still yields one result so it lands in a bucket.
fn failure_record(envelope: &Map<String, Value>) -> ExtractionResult {
    let mut result = normalize_record(envelope);
    if result.error_code.is_none() {
        warn!("failure envelope carried no error code");
        result.error_kind = ErrorKind::Other;
        result.error_code = Some(UNSPECIFIED_ERROR_CODE.to_string());
    }
    result
}
