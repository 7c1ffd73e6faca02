use crate::validation::FieldIssue;
use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures of the storage backend.
///
/// A missing row is never reported through this type; repositories signal it
/// with `Ok(None)` or `Ok(false)` instead.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// A request body that does not satisfy the product schema.
///
/// Carries one [`FieldIssue`] per offending field and is never empty.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid product payload: {} issue(s)", .0.len())]
pub struct ValidationError(pub Vec<FieldIssue>);

impl ValidationError {
    pub fn single(issue: FieldIssue) -> Self {
        Self(vec![issue])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.0
    }
}

/// Errors raised while parsing a product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product id: '{0}'")]
pub struct InvalidProductId(pub String);
