use std::any::Any;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::handlers::{
    create_product_handler, delete_product_handler, get_product_handler, health_handler,
    list_products_handler, not_found_handler, update_product_handler,
};
use crate::model::{ErrorResponse, UNEXPECTED_ERROR};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Routes only, without middleware.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/productos",
                get(list_products_handler).post(create_product_handler),
            )
            .route(
                "/productos/{id}",
                get(get_product_handler)
                    .put(update_product_handler)
                    .delete(delete_product_handler),
            )
            .fallback(not_found_handler)
            .with_state(state)
    }

    /// The full service: routes plus tracing, CORS for `allowed_origin`, and
    /// an outermost guard that turns panics into a 500 response.
    pub fn service(state: AppState, allowed_origin: HeaderValue) -> Router {
        Self::router(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(allowed_origin))
            .layer(CatchPanicLayer::custom(panic_response))
    }
}

fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = message, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(UNEXPECTED_ERROR)),
    )
        .into_response()
}
