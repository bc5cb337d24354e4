use super::ApiError;
use crate::domain::ShowId;

pub fn validate_show_id(id: i32) -> Result<ShowId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid show ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(ShowId::new(id))
}

/// Compares the supplied `x-api-key` value with the configured secret.
pub fn validate_api_key(supplied: Option<&str>, expected: &str) -> Result<(), ApiError> {
    match supplied {
        Some(key) if !expected.is_empty() && key == expected => Ok(()),
        Some(_) => Err(ApiError::unauthorized("Invalid API key")),
        None => Err(ApiError::unauthorized("Missing x-api-key header")),
    }
}
