//! Structured field errors shared by request validation and the account
//! validators.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDetail {
    pub code: String,
    pub message: String,
}

impl FieldErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Field name (camelCase, as on the wire) to its first failure.
pub type FieldErrors = BTreeMap<String, FieldErrorDetail>;

pub fn validation_exception(errors: FieldErrors) -> AppError {
    AppError::Validation(errors)
}

pub fn single_field_error(field: &str, code: &str, message: &str) -> AppError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), FieldErrorDetail::new(code, message));
    AppError::Validation(errors)
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let err = errs.first()?;
                let field = to_camel_case(&field);
                let code = format!("{}_{}", field.to_uppercase(), err.code.to_uppercase());
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                Some((field, FieldErrorDetail::new(code, message)))
            })
            .collect();
        AppError::Validation(fields)
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn validate_email(email: Option<&str>) -> Option<FieldErrorDetail> {
    let trimmed = email.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Some(FieldErrorDetail::new("EMAIL_REQUIRED", "Email is required"));
    }
    if !trimmed.validate_email() {
        return Some(FieldErrorDetail::new("EMAIL_INVALID", "Email is invalid"));
    }
    None
}

pub fn validate_password(password: Option<&str>) -> Option<FieldErrorDetail> {
    let password = password.unwrap_or_default();
    if password.trim().is_empty() {
        return Some(FieldErrorDetail::new(
            "PASSWORD_REQUIRED",
            "Password is required",
        ));
    }
    if password.chars().count() < 6 {
        return Some(FieldErrorDetail::new(
            "PASSWORD_MIN",
            "Password must be at least 6 characters",
        ));
    }
    None
}

pub fn validate_required_string(
    value: Option<&str>,
    field: &str,
    min_length: usize,
) -> Option<FieldErrorDetail> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() || trimmed.chars().count() < min_length {
        return Some(FieldErrorDetail::new(
            format!("{}_MIN", field.to_uppercase()),
            format!("{field} is required (min {min_length} characters)"),
        ));
    }
    None
}

/// Absent or blank values pass; present values must reach `min_length`.
pub fn validate_optional_string(
    value: Option<&str>,
    field: &str,
    min_length: usize,
) -> Option<FieldErrorDetail> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if !trimmed.is_empty() && trimmed.chars().count() < min_length {
        return Some(FieldErrorDetail::new(
            format!("{}_MIN", field.to_uppercase()),
            format!("{field} must be at least {min_length} characters"),
        ));
    }
    None
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn validate_date(value: Option<&str>, field: &str) -> Option<FieldErrorDetail> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(raw) if parse_date(raw).is_some() => None,
        Some(_) => Some(FieldErrorDetail::new(
            format!("{}_INVALID", field.to_uppercase()),
            format!("{field} must be a valid date"),
        )),
    }
}

pub fn validate_url(value: Option<&str>, field: &str) -> Option<FieldErrorDetail> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(raw) if raw.validate_url() => None,
        Some(_) => Some(FieldErrorDetail::new(
            format!("{}_INVALID", field.to_uppercase()),
            format!("{field} must be a valid URL"),
        )),
    }
}

/// `validator` hook for text that must contain more than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message("Value must not be blank".into()))
    } else {
        Ok(())
    }
}

/// `validator` hook for id lists that must not repeat.
pub fn unique_ids(ids: &Vec<i64>) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err(ValidationError::new("not_unique").with_message("Values must be unique".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
        display_name: String,
        #[validate(custom(function = "not_blank"))]
        code: String,
        #[validate(custom(function = "unique_ids"))]
        role_ids: Vec<i64>,
    }

    #[test]
    fn validator_errors_become_camel_case_field_errors() {
        let sample = Sample {
            display_name: "x".into(),
            code: "   ".into(),
            role_ids: vec![1, 1],
        };
        let err = AppError::from(sample.validate().unwrap_err());
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields["displayName"].message,
            "Name must be at least 2 characters"
        );
        assert_eq!(fields["displayName"].code, "DISPLAYNAME_LENGTH");
        assert_eq!(fields["roleIds"].code, "ROLEIDS_NOT_UNIQUE");
        assert_eq!(fields["code"].code, "CODE_REQUIRED");
    }

    #[test]
    fn string_rules_trim_before_measuring() {
        assert!(validate_required_string(Some("  a "), "firstName", 2).is_some());
        assert!(validate_required_string(Some(" ab "), "firstName", 2).is_none());
        assert!(validate_optional_string(None, "lastName", 2).is_none());
        assert_eq!(
            validate_optional_string(Some("b"), "lastName", 2).map(|e| e.code),
            Some("LASTNAME_MIN".to_string())
        );
    }

    #[test]
    fn email_password_date_and_url_rules() {
        assert_eq!(validate_email(Some(" ")).map(|e| e.code), Some("EMAIL_REQUIRED".into()));
        assert_eq!(validate_email(Some("nope")).map(|e| e.code), Some("EMAIL_INVALID".into()));
        assert!(validate_email(Some("a@b.co")).is_none());
        assert!(validate_password(Some("12345")).is_some());
        assert!(validate_password(Some("123456")).is_none());
        assert!(validate_date(Some("1990-02-31"), "dateOfBirth").is_some());
        assert!(validate_date(Some("1990-02-28"), "dateOfBirth").is_none());
        assert!(validate_url(Some("not a url"), "pictureUrl").is_some());
        assert!(validate_url(Some(""), "pictureUrl").is_none());
        assert!(validate_url(Some("https://cdn.example.com/a.png"), "pictureUrl").is_none());
    }
}
