mod health;
mod response;

pub use health::HealthResponse;
pub use response::{ErrorResponse, INTERNAL_ERROR, INVALID_ID, NOT_FOUND, UNEXPECTED_ERROR};
