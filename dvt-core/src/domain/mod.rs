// dvt-core/src/domain/mod.rs

pub mod aggregate;
pub mod catalog;
pub mod connection;
pub mod error;
pub mod matching;
pub mod table;
pub mod validation;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use aggregate::{AggregateKind, AggregateSpec, ColumnSelector};
pub use catalog::TableCatalog;
pub use connection::{ConnectionDescriptor, ConnectionRef, ResolvedConnection};
pub use error::DomainError;
pub use matching::{MatchReport, match_tables};
pub use table::{TableDescriptor, TableIdentity, TableMatch};
pub use validation::{
    GroupSpec, GroupedColumn, OutputFormat, ResultHandlerConfig, ValidationBlock,
    ValidationConfig, ValidationType,
};
