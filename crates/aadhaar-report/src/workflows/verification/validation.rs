use super::domain::{ExtractedFields, ValidationOutcome, ValidationStatus};
use serde::Serialize;

const ID_NUMBER_DIGITS: usize = 12;
const MIN_NAME_CHARS: usize = 2;
const GENDERS: [&str; 4] = ["male", "female", "m", "f"];

/// Outcomes for the four card fields, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldValidations {
    pub id_number: ValidationOutcome,
    pub name: ValidationOutcome,
    pub dob: ValidationOutcome,
    pub gender: ValidationOutcome,
}

impl FieldValidations {
    pub fn of(fields: &ExtractedFields) -> Self {
        Self {
            id_number: validate_id_number(fields.id_number.as_deref()),
            name: validate_name(fields.name.as_deref()),
            dob: validate_dob(fields.dob.as_deref()),
            gender: validate_gender(fields.gender.as_deref()),
        }
    }
}

pub fn validate_id_number(value: Option<&str>) -> ValidationOutcome {
    let Some(value) = present(value) else {
        return ValidationStatus::Missing.into();
    };

    let digits = strip_whitespace(value);
    if digits.len() == ID_NUMBER_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) {
        ValidationStatus::Valid.into()
    } else {
        ValidationStatus::InvalidFormat.into()
    }
}

pub fn validate_name(value: Option<&str>) -> ValidationOutcome {
    match present(value) {
        None => ValidationStatus::Missing.into(),
        Some(name) if name.chars().count() < MIN_NAME_CHARS => ValidationStatus::TooShort.into(),
        Some(_) => ValidationStatus::Valid.into(),
    }
}

/// Accepts a `D/M/YYYY` date anywhere in the text, or a bare four-digit year.
pub fn validate_dob(value: Option<&str>) -> ValidationOutcome {
    let Some(dob) = present(value) else {
        return ValidationStatus::Missing.into();
    };

    if contains_slash_date(dob) || is_bare_year(dob) {
        ValidationStatus::Valid.into()
    } else {
        ValidationStatus::InvalidFormat.into()
    }
}

pub fn validate_gender(value: Option<&str>) -> ValidationOutcome {
    let Some(gender) = present(value) else {
        return ValidationStatus::Missing.into();
    };

    let normalized = gender.to_lowercase();
    if GENDERS.contains(&normalized.as_str()) {
        ValidationStatus::Valid.into()
    } else {
        ValidationStatus::Invalid.into()
    }
}

pub(crate) fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn is_bare_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

fn contains_slash_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    (0..bytes.len()).any(|start| slash_date_at(bytes, start))
}

fn slash_date_at(bytes: &[u8], start: usize) -> bool {
    digit_group_ends(bytes, start, 1, 2).into_iter().any(|day_end| {
        bytes.get(day_end) == Some(&b'/')
            && digit_group_ends(bytes, day_end + 1, 1, 2)
                .into_iter()
                .any(|month_end| {
                    bytes.get(month_end) == Some(&b'/')
                        && !digit_group_ends(bytes, month_end + 1, 4, 4).is_empty()
                })
    })
}

/// End offsets of every run of `min..=max` ASCII digits starting at `start`.
fn digit_group_ends(bytes: &[u8], start: usize, min: usize, max: usize) -> Vec<usize> {
    (min..=max)
        .filter(|len| {
            bytes
                .get(start..start + len)
                .is_some_and(|run| run.iter().all(u8::is_ascii_digit))
        })
        .map(|len| start + len)
        .collect()
}
