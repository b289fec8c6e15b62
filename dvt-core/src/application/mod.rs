// dvt-core/src/application/mod.rs

pub mod assembler;
pub mod builder;
pub mod catalog;
pub mod connections;
pub mod find_tables;
pub mod resolver;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use dvt_core::application::{build_configs_from_request, run_validations, ...};`
// sans connaître la structure interne des fichiers.

pub use assembler::{AggregateRequest, assemble_aggregates};
pub use builder::{RunRequest, build_configs_from_document, build_configs_from_request};
pub use catalog::enumerate_tables;
pub use connections::{add_connection, list_connections};
pub use find_tables::find_tables;
pub use resolver::{ClientCache, ConnectionResolver, RunContext};
pub use runner::{RunReport, run_validations};
