use serde::Serialize;

pub const NOT_FOUND: &str = "No encontrado";
pub const INVALID_ID: &str = "Id inválido";
pub const INTERNAL_ERROR: &str = "Error interno";
pub const UNEXPECTED_ERROR: &str = "Error inesperado";

/// Body of every error response: `{ "error": ... }`.
///
/// `T` is a message string, or the list of field issues for a rejected body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse<T> {
    pub error: T,
}

impl<T> ErrorResponse<T> {
    pub fn new(error: T) -> Self {
        Self { error }
    }
}
