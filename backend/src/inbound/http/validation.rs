//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` [`Error`] whose details name the
//! offending field and a stable code, for example
//! `{"field": "tags", "code": "invalid_id", "index": 1, "value": "x"}`.

use serde_json::json;

use crate::domain::{AttributeId, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidFlag,
    InvalidId,
    InvalidPrice,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidFlag => "invalid_flag",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidPrice => "invalid_price",
        }
    }
}

/// Request field name, kept distinct from arbitrary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "value": value,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "index": index,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_price_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(field, "price must be a decimal number")
        .with_value(ErrorCode::InvalidPrice, value)
}

/// Interpret a boolean switch, accepting `1|0|true|false|yes|no`.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse an optional boolean query parameter; absent or blank means `false`.
pub(crate) fn parse_bool_flag(value: Option<&str>, field: FieldName) -> Result<bool, Error> {
    match value {
        None => Ok(false),
        Some(raw) if raw.trim().is_empty() => Ok(false),
        Some(raw) => parse_flag(raw).ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(field, format!("{name} must be one of 1, 0, true, false, yes, no"))
                .with_value(ErrorCode::InvalidFlag, raw)
        }),
    }
}

/// Parse a comma-separated list of positive integer ids.
///
/// Absent or blank input is an empty list. Blank entries between commas are
/// skipped but still count towards the reported error `index`.
pub(crate) fn parse_id_list(value: Option<&str>, field: FieldName) -> Result<Vec<AttributeId>, Error> {
    let Some(raw) = value else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(index, part)| {
            part.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(AttributeId::new)
                .ok_or_else(|| {
                    let name = field.as_str();
                    ValidationError::new(field, format!("{name} must be a comma-separated list of ids"))
                        .with_index(ErrorCode::InvalidId, index, part)
                })
        })
        .collect()
}
