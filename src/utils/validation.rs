use crate::utils::error::{Result, ServiceError};

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::bad_request(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ServiceError::bad_request(field_name, "field is required"))
}

pub fn validate_min_len<T>(field_name: &str, values: &[T], min: usize) -> Result<()> {
    if values.len() < min {
        return Err(ServiceError::bad_request(
            field_name,
            format!("at least {} entries required, got {}", min, values.len()),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ServiceError::bad_request(
            field_name,
            format!("value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(ServiceError::bad_request(
            field_name,
            format!("'{}' is not a valid email address", value),
        ));
    }
    Ok(())
}
