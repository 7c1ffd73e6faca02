use crate::error::{AppError, Result};
use crate::extract::{JsonBody, ProductIdPath};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inventory_core::{validate_create, validate_patch, Product};
use tracing::{debug, info};

pub async fn list_products_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.repository().list().await?;
    Ok(Json(products))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> Result<Json<Product>> {
    match state.repository().get(id).await? {
        Some(product) => Ok(Json(product)),
        None => {
            debug!(product_id = %id, "product not found");
            Err(AppError::NotFound)
        }
    }
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Product>)> {
    let product = validate_create(&body).inspect_err(|err| {
        debug!(issues = err.issues().len(), "rejected create payload");
    })?;

    let created = state.repository().insert(product).await?;
    info!(product_id = %created.id, "product created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
    JsonBody(body): JsonBody,
) -> Result<Json<Product>> {
    let patch = validate_patch(&body).inspect_err(|err| {
        debug!(product_id = %id, issues = err.issues().len(), "rejected update payload");
    })?;

    match state.repository().update(id, patch).await? {
        Some(product) => {
            info!(product_id = %id, "product updated");
            Ok(Json(product))
        }
        None => {
            debug!(product_id = %id, "product not found");
            Err(AppError::NotFound)
        }
    }
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> Result<StatusCode> {
    if state.repository().delete(id).await? {
        info!(product_id = %id, "product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        debug!(product_id = %id, "product not found");
        Err(AppError::NotFound)
    }
}

/// Fallback for unknown routes, so that clients get a JSON body there too.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
