// dvt-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod factory;
pub mod postgres;
pub mod query_plan;

pub use factory::DefaultClientFactory;
pub use query_plan::QueryPlanEngine;
