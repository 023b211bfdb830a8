use crate::utils::error::{BookingError, Result, ValidationErrors};

pub const PHONE_MIN_LEN: usize = 11;
pub const PHONE_MAX_LEN: usize = 12;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// Form field checks. These collect into `ValidationErrors` instead of returning
// early so a form can be re-rendered with every message at once.

/// Returns the field value when present, recording an error otherwise.
pub fn require_field<'a>(
    errors: &mut ValidationErrors,
    field_name: &str,
    value: Option<&'a str>,
    message: &str,
) -> Option<&'a str> {
    if value.is_none() {
        errors.push(field_name, message);
    }
    value
}

pub fn check_non_empty(errors: &mut ValidationErrors, field_name: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field_name, message);
    }
}

/// Length check in characters. Any characters are accepted; there is no
/// digit-format rule for phone numbers.
pub fn check_length(
    errors: &mut ValidationErrors,
    field_name: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(
            field_name,
            format!("Field must be between {} and {} characters long.", min, max),
        );
    }
}

pub fn check_phone(errors: &mut ValidationErrors, field_name: &str, value: Option<&str>) {
    match value {
        Some(phone) if !phone.is_empty() => {
            check_length(errors, field_name, phone, PHONE_MIN_LEN, PHONE_MAX_LEN)
        }
        _ => errors.push(field_name, "Введите номер телефона"),
    }
}
