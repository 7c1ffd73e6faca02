//! Extractors that reject with [`AppError`] instead of axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use inventory_core::{InvalidProductId, ProductId};
use serde_json::Value;

use crate::error::AppError;

/// The `{id}` path segment, parsed as a [`ProductId`].
///
/// Anything that is not a well-formed integer is rejected with 400 rather
/// than being looked up.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| InvalidProductId(rejection.body_text()))?;

        Ok(Self(raw.parse()?))
    }
}

/// A JSON request body kept untyped so the validators can report every
/// offending field at once.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;

        Ok(Self(value))
    }
}
