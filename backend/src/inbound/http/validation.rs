//! Request validation helpers shared by the HTTP handlers.
//!
//! Every failure is a `400` whose details name the offending field and a
//! stable code, e.g. `{ "field": "chatId", "code": "invalid_uuid" }`.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{AuthValidationError, Error, OAuthProvider, SectionName};

/// Validation error codes for malformed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    UnknownSection,
    UnsupportedProvider,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownSection => "unknown_section",
            Self::UnsupportedProvider => "unsupported_provider",
        }
    }
}

/// Name of a request field as the client spells it.
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

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a UUID-backed identifier.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
{
    value.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

/// Parse an optional identifier, treating blank input as absent.
pub(crate) fn parse_optional_id<T>(value: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: FromStr,
{
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_id(raw, field))
        .transpose()
}

/// Parse a note section path segment.
pub(crate) fn parse_section(value: &str) -> Result<SectionName, Error> {
    value.parse().map_err(|_| {
        field_error(
            FieldName::new("section"),
            ErrorCode::UnknownSection,
            format!("unknown note section: {value}"),
            value,
        )
    })
}

/// Parse an OAuth provider path segment.
pub(crate) fn parse_provider(value: &str) -> Result<OAuthProvider, Error> {
    value.parse().map_err(|message: String| {
        field_error(
            FieldName::new("provider"),
            ErrorCode::UnsupportedProvider,
            message,
            value,
        )
    })
}

/// Map an auth input failure onto its field.
pub(crate) fn auth_validation_error(error: AuthValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}
