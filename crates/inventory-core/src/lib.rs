//! Core types and traits for the inventory service.
//!
//! This crate provides the product model, request validation and the
//! repository contract shared by the storage backends and the HTTP gateway.

pub mod error;
pub mod product;
pub mod repository;
pub mod validation;

pub use error::{InvalidProductId, StorageError, ValidationError};
pub use product::{NewProduct, Product, ProductId, ProductPatch};
pub use repository::ProductRepository;
pub use validation::{validate_create, validate_patch, FieldIssue, IssueCode};
