//! Storage backends for the inventory service.
//!
//! Both backends implement [`ProductRepository`]: [`InMemoryRepository`] for
//! tests and local runs, [`MySqlRepository`] for durable storage.

pub mod memory;
pub mod mysql;

pub use inventory_core::{ProductRepository, StorageError};
pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, PoolSettings};
