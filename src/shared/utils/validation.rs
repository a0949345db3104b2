use crate::shared::errors::AppError;

pub const MAX_TERM_LENGTH: usize = 100;
pub const MAX_DEFINITION_LENGTH: usize = 5000;
pub const MAX_REFERENCE_LENGTH: usize = 255;
pub const MAX_URL_LENGTH: usize = 255;
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct Validator;

impl Validator {
    /// Required text: not blank and at most `max` characters (not bytes)
    pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Self::validate_max_length(field, value, max)
    }

    pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.chars().count() > max {
            return Err(AppError::ValidationError(format!(
                "{} too long (max {} characters)",
                field, max
            )));
        }
        Ok(())
    }

    pub fn validate_term_text(term: &str) -> Result<(), AppError> {
        Self::validate_required_text("Term", term, MAX_TERM_LENGTH)
    }

    pub fn validate_definition(definition: &str) -> Result<(), AppError> {
        Self::validate_required_text("Definition", definition, MAX_DEFINITION_LENGTH)
    }

    pub fn validate_reference_source(source: &str) -> Result<(), AppError> {
        Self::validate_required_text("Reference", source, MAX_REFERENCE_LENGTH)
    }

    pub fn validate_url(url: &str) -> Result<(), AppError> {
        Self::validate_max_length("Reference URL", url, MAX_URL_LENGTH)
    }

    pub fn validate_term_id(id: i64) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::ValidationError(
                "Term ID must be positive".to_string(),
            ));
        }
        if id > i32::MAX as i64 {
            return Err(AppError::ValidationError(
                "Term ID out of range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_pagination(page: u32, page_size: u32) -> Result<(), AppError> {
        if page == 0 {
            return Err(AppError::ValidationError(
                "Page must start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(AppError::ValidationError(
                "Page size must be positive".to_string(),
            ));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(AppError::ValidationError(format!(
                "Page size cannot exceed {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}
