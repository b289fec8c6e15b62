// dvt-core/src/infrastructure/config/document.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::connection::ConnectionRef;
use crate::domain::validation::{ResultHandlerConfig, ValidationBlock, ValidationConfig};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::write_yaml;

const REQUIRED_KEYS: [&str; 3] = ["source", "target", "validations"];

/// The persisted form of a set of validations.
///
/// ```yaml
/// source: my_source
/// target: my_target
/// result_handler: null
/// validations:
///   - type: Column
///     schema_name: sales
///     table_name: orders
///     aggregates:
///       - type: count
///         field_alias: count
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDocument {
    pub source: ConnectionRef,
    pub target: ConnectionRef,
    #[serde(default)]
    pub result_handler: Option<ResultHandlerConfig>,
    pub validations: Vec<ValidationBlock>,
}

/// Same document with blocks left undecoded, so a bad block can be located.
#[derive(Deserialize)]
struct RawDocument {
    source: ConnectionRef,
    target: ConnectionRef,
    #[serde(default)]
    result_handler: Option<ResultHandlerConfig>,
    validations: Vec<serde_yaml::Value>,
}

impl ValidationDocument {
    /// Document-level fields come from the first config; every other config
    /// must agree with them or the document would not reload the same way.
    pub fn from_configs(configs: &[ValidationConfig]) -> Result<Self, InfrastructureError> {
        let first = configs.first().ok_or_else(|| {
            InfrastructureError::ConfigError("there are no validations to persist".into())
        })?;

        for (index, config) in configs.iter().enumerate().skip(1) {
            let mismatch = if config.source().reference != first.source().reference {
                Some("source connection")
            } else if config.target().reference != first.target().reference {
                Some("target connection")
            } else if config.result_handler() != first.result_handler() {
                Some("result handler")
            } else {
                None
            };
            if let Some(field) = mismatch {
                return Err(InfrastructureError::InvalidBlock {
                    index,
                    reason: format!("{} differs from the first validation", field),
                });
            }
        }

        Ok(Self {
            source: first.source().reference.clone(),
            target: first.target().reference.clone(),
            result_handler: first.result_handler().cloned(),
            validations: configs.iter().map(ValidationConfig::to_block).collect(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, InfrastructureError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, InfrastructureError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mapping = value.as_mapping().ok_or_else(|| {
            InfrastructureError::ConfigError("a validation document must be a YAML mapping".into())
        })?;
        for key in REQUIRED_KEYS {
            if !mapping.contains_key(key) {
                return Err(InfrastructureError::MissingKey(key));
            }
        }

        let raw: RawDocument = serde_yaml::from_value(value)?;
        let validations = raw
            .validations
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                serde_yaml::from_value::<ValidationBlock>(block).map_err(|e| {
                    InfrastructureError::InvalidBlock {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: raw.source,
            target: raw.target,
            result_handler: raw.result_handler,
            validations,
        })
    }
}

#[instrument]
pub fn load_document(path: &Path) -> Result<ValidationDocument, InfrastructureError> {
    let content = fs::read_to_string(path).map_err(|e| {
        InfrastructureError::ConfigError(format!("cannot read config file {:?}: {}", path, e))
    })?;
    let document = ValidationDocument::from_yaml(&content)?;
    info!(validations = document.validations.len(), "validation document loaded");
    Ok(document)
}

#[instrument(skip(document), fields(validations = document.validations.len()))]
pub fn save_document(path: &Path, document: &ValidationDocument) -> Result<(), InfrastructureError> {
    write_yaml(path, document)?;
    info!("validation document written");
    Ok(())
}
