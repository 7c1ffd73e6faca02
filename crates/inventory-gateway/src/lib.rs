//! HTTP gateway exposing the product catalog as a JSON REST resource.
//!
//! Requests are validated here before reaching a [`ProductRepository`], and
//! every outcome is translated into a status code with a JSON body.
//!
//! [`ProductRepository`]: inventory_core::ProductRepository

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
