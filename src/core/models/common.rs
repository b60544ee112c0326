use crate::error::Error;

/// Upper bound, in characters, of question and choice texts.
pub const MAX_TEXT_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }
}

pub fn validate_text(field: &str, text: &str) -> Result<(), Error> {
    if text.trim().is_empty() {
        return Err(Error::BusinessError(format!("{} must not be empty", field)));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(Error::BusinessError(format!("{} must be at most {} characters", field, MAX_TEXT_LENGTH)));
    }
    Ok(())
}
