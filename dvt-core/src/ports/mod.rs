// dvt-core/src/ports/mod.rs

pub mod client;
pub mod connection_store;
pub mod engine;

pub use client::{CatalogClient, ClientFactory, ColumnSchema};
pub use connection_store::ConnectionStore;
pub use engine::{AggregateQuery, ValidationEngine, ValidationOutcome};
