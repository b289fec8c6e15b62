// dvt-core/src/application/find_tables.rs

use tracing::{info, instrument, warn};

use crate::application::catalog::enumerate_tables;
use crate::application::resolver::RunContext;
use crate::domain::connection::ConnectionRef;
use crate::domain::matching::{MatchReport, match_tables};
use crate::error::DvtError;

/// Enumerates both catalogs and pairs source tables with target tables.
#[instrument(skip_all, fields(source = %source, target = %target, cutoff = cutoff))]
pub async fn find_tables(
    ctx: &mut RunContext<'_>,
    source: &ConnectionRef,
    target: &ConnectionRef,
    cutoff: f64,
) -> Result<MatchReport, DvtError> {
    let (_, source_client) = ctx.connect(source).await?;
    let (_, target_client) = ctx.connect(target).await?;

    let source_tables = enumerate_tables(source_client.as_ref()).await?;
    let target_tables = enumerate_tables(target_client.as_ref()).await?;

    let report = match_tables(&source_tables, &target_tables, cutoff)?;
    for key in &report.unmatched {
        warn!(source_table = %key, cutoff, "no target table matched");
    }
    info!(
        matched = report.matches.len(),
        unmatched = report.unmatched.len(),
        "table matching finished"
    );
    Ok(report)
}
