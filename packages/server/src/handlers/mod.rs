pub mod caption;
pub mod lookup;
pub mod map;

use uuid::Uuid;

use crate::error::AppError;

/// Parse a path identifier, rejecting malformed values as validation errors.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {kind} id: {raw}")))
}
