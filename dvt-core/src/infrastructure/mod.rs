// dvt-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod result_handler;

pub use adapters::{DefaultClientFactory, QueryPlanEngine};
pub use config::{FileConnectionStore, ValidationDocument, load_document, save_document};
pub use result_handler::TextResultHandler;
