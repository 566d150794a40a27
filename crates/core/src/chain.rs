//! Composition of resolved download sources into a single fetcher.

use crate::source::resolve_sources;
use migfetch_api::*;
use std::sync::Arc;

/// Build one fetcher from an ordered list of resolved download sources.
///
/// A single source yields its fetcher directly, without a chain around
/// it. Several sources yield a fallback chain that tries them in the given
/// order. Nothing is connected here; fetchers do their network work on
/// first use.
pub fn build_fetcher(
    builder: Arc<Builder>,
    descriptors: &[SourceDescriptor],
    hints: &IpfsHints,
) -> MfResult<DynFetcher> {
    let mut members = descriptors
        .iter()
        .map(|d| builder.fetcher.create(builder.clone(), d, hints))
        .collect::<MfResult<Vec<_>>>()?;

    match members.len() {
        0 => Err(MfError::NoSources),
        1 => Ok(members.remove(0)),
        count => {
            tracing::debug!(count, "building fallback chain");
            builder.fetcher.create_fallback(builder.clone(), members)
        }
    }
}

/// Build the fetcher for a migration from its configured download sources.
///
/// Source tokens are resolved before any fetcher is built, so a bad token
/// fails here and never after a fetch has started.
pub fn migration_fetcher(
    builder: Arc<Builder>,
    migration: &MigrationConfig,
    hints: &IpfsHints,
) -> MfResult<DynFetcher> {
    let descriptors = resolve_sources(&migration.download_sources)?;
    build_fetcher(builder, &descriptors, hints)
}
