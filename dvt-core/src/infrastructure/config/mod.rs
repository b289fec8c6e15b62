// dvt-core/src/infrastructure/config/mod.rs

pub mod connection;
pub mod document;

pub use connection::{FileConnectionStore, default_home};
pub use document::{ValidationDocument, load_document, save_document};
