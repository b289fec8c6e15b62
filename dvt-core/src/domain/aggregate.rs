// dvt-core/src/domain/aggregate.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

pub const INT64: &str = "int64";
pub const FLOAT64: &str = "float64";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
pub const DATE: &str = "date";
pub const TIMESTAMP: &str = "timestamp";
pub const UNKNOWN: &str = "unknown";

const NUMERIC_TYPES: &[&str] = &[INT64, FLOAT64];
const ORDERED_TYPES: &[&str] = &[INT64, FLOAT64, DATE, TIMESTAMP];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Sum => "sum",
            AggregateKind::Avg => "avg",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }

    /// Logical column types this aggregate accepts. `None` accepts everything.
    pub fn type_filter(&self) -> Option<&'static [&'static str]> {
        match self {
            AggregateKind::Count => None,
            AggregateKind::Sum | AggregateKind::Avg => Some(NUMERIC_TYPES),
            AggregateKind::Min | AggregateKind::Max => Some(ORDERED_TYPES),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which columns a requested metric applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    All,
    Columns(Vec<String>),
}

impl ColumnSelector {
    /// `"*"` or a JSON list of column names.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed == "*" {
            return Ok(ColumnSelector::All);
        }
        let columns: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
            DomainError::InvalidConfig(format!(
                "column selector must be '*' or a JSON list of names ({})",
                e
            ))
        })?;
        Ok(ColumnSelector::Columns(columns))
    }
}

/// One aggregate computed on both sides of a validation.
///
/// A whole-table aggregate has no columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    #[serde(rename = "type")]
    pub kind: AggregateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    pub field_alias: String,
}

impl AggregateSpec {
    pub fn table_count() -> Self {
        Self {
            kind: AggregateKind::Count,
            source_column: None,
            target_column: None,
            field_alias: AggregateKind::Count.as_str().to_string(),
        }
    }

    pub fn column(kind: AggregateKind, column: &str) -> Self {
        Self {
            kind,
            source_column: Some(column.to_string()),
            target_column: Some(column.to_string()),
            field_alias: format!("{}__{}", kind, column),
        }
    }

    pub fn is_table_level(&self) -> bool {
        self.source_column.is_none()
    }
}

/// Maps a raw database type (`BIGINT`, `numeric(10,2)`, `character varying`)
/// to the logical name type filters are written against.
pub fn logical_type(raw: &str) -> &'static str {
    let upper = raw.trim().to_uppercase();
    let base = upper.split('(').next().unwrap_or_default().trim();

    if base.starts_with("TIMESTAMP") || base == "DATETIME" {
        return TIMESTAMP;
    }

    match base {
        "TINYINT" | "SMALLINT" | "INTEGER" | "INT" | "INT2" | "INT4" | "INT8" | "BIGINT"
        | "HUGEINT" | "UTINYINT" | "USMALLINT" | "UINTEGER" | "UBIGINT" | "SERIAL"
        | "BIGSERIAL" | "INT64" => INT64,
        "FLOAT" | "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "DECIMAL"
        | "NUMERIC" | "FLOAT64" => FLOAT64,
        "VARCHAR" | "TEXT" | "CHAR" | "BPCHAR" | "CHARACTER" | "CHARACTER VARYING" | "STRING"
        | "UUID" => STRING,
        "BOOLEAN" | "BOOL" => BOOLEAN,
        "DATE" => DATE,
        _ => UNKNOWN,
    }
}
