// dvt-core/src/domain/table.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One table inside a connection's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub schema_name: String,
    pub table_name: String,
}

impl TableDescriptor {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
        }
    }

    /// Composite catalog key, `"{schema}__{table}"`.
    pub fn key(&self) -> String {
        format!("{}__{}", self.schema_name, self.table_name)
    }
}

/// The pair of tables a validation compares.
///
/// Target fields fall back to the source ones, so `{"schema_name": "s",
/// "table_name": "t"}` validates `s.t` against `s.t`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdentity {
    pub schema_name: String,
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_table_name: Option<String>,
}

impl TableIdentity {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            target_schema_name: None,
            target_table_name: None,
        }
    }

    pub fn source(&self) -> TableDescriptor {
        TableDescriptor::new(&self.schema_name, &self.table_name)
    }

    pub fn target(&self) -> TableDescriptor {
        TableDescriptor::new(
            self.target_schema_name.as_deref().unwrap_or(&self.schema_name),
            self.target_table_name.as_deref().unwrap_or(&self.table_name),
        )
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        if target == self.source() {
            write!(f, "{}.{}", self.schema_name, self.table_name)
        } else {
            write!(
                f,
                "{}.{} -> {}.{}",
                self.schema_name, self.table_name, target.schema_name, target.table_name
            )
        }
    }
}

/// A source table paired with its closest target table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMatch {
    pub source_schema: String,
    pub source_table: String,
    pub target_schema: String,
    pub target_table: String,
    pub score: f64,
}

impl TableMatch {
    pub fn to_identity(&self) -> TableIdentity {
        TableIdentity {
            schema_name: self.source_schema.clone(),
            table_name: self.source_table.clone(),
            target_schema_name: Some(self.target_schema.clone()),
            target_table_name: Some(self.target_table.clone()),
        }
    }
}
