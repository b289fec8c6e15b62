// dvt-core/src/domain/validation.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::aggregate::AggregateSpec;
use crate::domain::connection::ResolvedConnection;
use crate::domain::error::DomainError;
use crate::domain::table::TableIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationType {
    Column,
    GroupedColumn,
}

impl FromStr for ValidationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Column" => Ok(ValidationType::Column),
            "GroupedColumn" => Ok(ValidationType::GroupedColumn),
            other => Err(DomainError::UnsupportedValidationType(other.to_string())),
        }
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationType::Column => f.write_str("Column"),
            ValidationType::GroupedColumn => f.write_str("GroupedColumn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedColumn {
    pub source_column: String,
    pub target_column: String,
    pub field_alias: String,
}

impl GroupedColumn {
    pub fn new(column: &str) -> Self {
        Self {
            source_column: column.to_string(),
            target_column: column.to_string(),
            field_alias: column.to_string(),
        }
    }
}

/// Ordered grouping columns of a grouped validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSpec(pub Vec<GroupedColumn>);

impl GroupSpec {
    pub fn from_columns(columns: &[String]) -> Self {
        GroupSpec(columns.iter().map(|c| GroupedColumn::new(c)).collect())
    }

    pub fn columns(&self) -> &[GroupedColumn] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
    #[default]
    Table,
}

/// Where validation outcomes go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResultHandlerConfig {
    Text {
        #[serde(default)]
        format: OutputFormat,
    },
}

impl Default for ResultHandlerConfig {
    fn default() -> Self {
        ResultHandlerConfig::Text {
            format: OutputFormat::default(),
        }
    }
}

/// One fully resolved table-pair validation.
///
/// Only constructible through [`ValidationConfig::new`], which enforces the
/// shape rules; fields are read-only afterwards.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    validation_type: ValidationType,
    source: Arc<ResolvedConnection>,
    target: Arc<ResolvedConnection>,
    table: TableIdentity,
    aggregates: Vec<AggregateSpec>,
    group: Option<GroupSpec>,
    result_handler: Option<ResultHandlerConfig>,
}

impl ValidationConfig {
    pub fn new(
        validation_type: ValidationType,
        source: Arc<ResolvedConnection>,
        target: Arc<ResolvedConnection>,
        table: TableIdentity,
        aggregates: Vec<AggregateSpec>,
        group: Option<GroupSpec>,
        result_handler: Option<ResultHandlerConfig>,
    ) -> Result<Self, DomainError> {
        if aggregates.is_empty() {
            return Err(DomainError::InvalidConfig(format!(
                "validation of '{}' has no aggregates",
                table
            )));
        }

        let group = match validation_type {
            ValidationType::GroupedColumn => match group {
                Some(g) if !g.is_empty() => Some(g),
                _ => return Err(DomainError::MissingGroupColumns(table.to_string())),
            },
            ValidationType::Column => {
                if group.as_ref().is_some_and(|g| !g.is_empty()) {
                    return Err(DomainError::InvalidConfig(format!(
                        "'Column' validation of '{}' cannot carry grouping columns",
                        table
                    )));
                }
                None
            }
        };

        Ok(Self {
            validation_type,
            source,
            target,
            table,
            aggregates,
            group,
            result_handler,
        })
    }

    pub fn validation_type(&self) -> ValidationType {
        self.validation_type
    }

    pub fn source(&self) -> &Arc<ResolvedConnection> {
        &self.source
    }

    pub fn target(&self) -> &Arc<ResolvedConnection> {
        &self.target
    }

    pub fn table(&self) -> &TableIdentity {
        &self.table
    }

    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.aggregates
    }

    pub fn group(&self) -> Option<&GroupSpec> {
        self.group.as_ref()
    }

    pub fn result_handler(&self) -> Option<&ResultHandlerConfig> {
        self.result_handler.as_ref()
    }

    /// The persisted form, minus the document-level connection and handler fields.
    pub fn to_block(&self) -> ValidationBlock {
        ValidationBlock {
            validation_type: self.validation_type,
            table: self.table.clone(),
            aggregates: self.aggregates.clone(),
            grouped_columns: self.group.clone(),
        }
    }
}

/// A validation as it appears under `validations:` in a YAML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationBlock {
    #[serde(rename = "type")]
    pub validation_type: ValidationType,
    #[serde(flatten)]
    pub table: TableIdentity,
    pub aggregates: Vec<AggregateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped_columns: Option<GroupSpec>,
}
