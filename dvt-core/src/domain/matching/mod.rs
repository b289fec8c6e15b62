// dvt-core/src/domain/matching/mod.rs

pub mod similarity;

use serde::Serialize;
use tracing::debug;

use crate::domain::catalog::TableCatalog;
use crate::domain::error::DomainError;
use crate::domain::table::{TableDescriptor, TableIdentity, TableMatch};

pub use similarity::jaro_winkler;

pub const DEFAULT_SCORE_CUTOFF: f64 = 0.8;

/// Outcome of pairing a source catalog with a target catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub matches: Vec<TableMatch>,
    /// Source keys for which no target key reached the cutoff.
    pub unmatched: Vec<String>,
    #[serde(skip)]
    pub cutoff: f64,
}

impl MatchReport {
    pub fn identities(&self) -> Vec<TableIdentity> {
        self.matches.iter().map(TableMatch::to_identity).collect()
    }

    /// Fails on the first unmatched source table.
    pub fn into_strict(self) -> Result<Vec<TableMatch>, DomainError> {
        match self.unmatched.into_iter().next() {
            Some(source_key) => Err(DomainError::Unmatched {
                source_key,
                cutoff: self.cutoff,
            }),
            None => Ok(self.matches),
        }
    }
}

/// Pairs every source key with its most similar target key.
///
/// A pairing is emitted only when the best score is `>= cutoff`. Ties go to
/// the target enumerated first.
pub fn match_tables(
    source: &TableCatalog,
    target: &TableCatalog,
    cutoff: f64,
) -> Result<MatchReport, DomainError> {
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(DomainError::InvalidCutoff(cutoff));
    }

    let mut report = MatchReport {
        cutoff,
        ..Default::default()
    };

    for (source_key, source_table) in source.iter() {
        let mut best: Option<(f64, &TableDescriptor)> = None;
        for (target_key, target_table) in target.iter() {
            let score = jaro_winkler(source_key, target_key);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, target_table));
            }
        }

        match best {
            Some((score, target_table)) if score >= cutoff => {
                debug!(source = source_key, matched = %target_table.key(), score, "table matched");
                report.matches.push(TableMatch {
                    source_schema: source_table.schema_name.clone(),
                    source_table: source_table.table_name.clone(),
                    target_schema: target_table.schema_name.clone(),
                    target_table: target_table.table_name.clone(),
                    score,
                });
            }
            _ => {
                debug!(source = source_key, "no target table reached the cutoff");
                report.unmatched.push(source_key.to_string());
            }
        }
    }

    Ok(report)
}
