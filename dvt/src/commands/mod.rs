// dvt/src/commands/mod.rs

pub mod connections;
pub mod find_tables;
pub mod run;
pub mod run_config;

use serde::de::DeserializeOwned;

use dvt_core::DvtError;
use dvt_core::infrastructure::error::InfrastructureError;

/// Decodes a JSON-shaped CLI argument; `flag` names it in the error.
pub(crate) fn parse_json_arg<T: DeserializeOwned>(flag: &str, raw: &str) -> Result<T, DvtError> {
    serde_json::from_str(raw).map_err(|e| InfrastructureError::json(flag, e).into())
}
