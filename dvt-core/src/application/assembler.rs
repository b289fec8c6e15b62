// dvt-core/src/application/assembler.rs

use std::collections::HashSet;
use tracing::debug;

use crate::domain::aggregate::{AggregateKind, AggregateSpec, ColumnSelector, logical_type};
use crate::ports::client::ColumnSchema;

/// Requested metrics, in the order they were asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateRequest {
    pub metrics: Vec<(AggregateKind, ColumnSelector)>,
}

impl AggregateRequest {
    pub fn with(mut self, kind: AggregateKind, selector: ColumnSelector) -> Self {
        self.metrics.push((kind, selector));
        self
    }

    /// Whether column types must be described before assembling.
    pub fn needs_schema(&self) -> bool {
        self.metrics.iter().any(|(kind, selector)| match selector {
            ColumnSelector::All => *kind != AggregateKind::Count,
            ColumnSelector::Columns(_) => kind.type_filter().is_some(),
        })
    }
}

/// Builds the aggregate list of one table.
///
/// The whole-table count always comes first. `count` over `"*"` is that same
/// count; other kinds over `"*"` expand to every described column their type
/// filter accepts. Listed columns whose declared type falls outside the
/// filter are dropped silently. Aliases are unique, first one wins.
pub fn assemble_aggregates(
    request: &AggregateRequest,
    columns: &[ColumnSchema],
) -> Vec<AggregateSpec> {
    let mut specs = vec![AggregateSpec::table_count()];
    let mut aliases: HashSet<String> = specs.iter().map(|s| s.field_alias.clone()).collect();

    for (kind, selector) in &request.metrics {
        let candidates: Vec<&str> = match selector {
            ColumnSelector::All if *kind == AggregateKind::Count => continue,
            ColumnSelector::All => columns.iter().map(|c| c.name.as_str()).collect(),
            ColumnSelector::Columns(names) => names.iter().map(String::as_str).collect(),
        };

        for name in candidates {
            if !accepts(*kind, name, columns) {
                debug!(aggregate = %kind, column = name, "column excluded by type filter");
                continue;
            }
            let spec = AggregateSpec::column(*kind, name);
            if aliases.insert(spec.field_alias.clone()) {
                specs.push(spec);
            }
        }
    }

    specs
}

fn accepts(kind: AggregateKind, name: &str, columns: &[ColumnSchema]) -> bool {
    let Some(allowed) = kind.type_filter() else {
        return true;
    };
    columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .is_some_and(|c| allowed.contains(&logical_type(&c.data_type)))
}
