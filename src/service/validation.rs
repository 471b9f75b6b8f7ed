//! Request validation for new riddles.

use crate::error::AppError;
use crate::model::NewRiddle;

pub struct RequestValidator;

impl RequestValidator {
    /// Decode a create body. Riddle and solution must both be non-empty.
    pub fn new_riddle(bytes: &[u8]) -> Result<NewRiddle, AppError> {
        let body: NewRiddle = serde_json::from_slice(bytes)
            .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?;
        Self::validate(&body)?;
        Ok(body)
    }

    pub fn validate(body: &NewRiddle) -> Result<(), AppError> {
        if body.riddle.is_empty() || body.solution.is_empty() {
            tracing::warn!("missing required fields in create request");
            return Err(AppError::BadRequest(
                "missing required fields: riddle or solution".into(),
            ));
        }
        Ok(())
    }
}
