//! The core fetcher factory provided by migfetch.

use super::*;
use migfetch_api::*;
use std::sync::Arc;

/// The core fetcher factory provided by migfetch.
///
/// - [SourceDescriptor::ContentNetwork] builds a [CoreIpfsFetcher].
/// - [SourceDescriptor::GatewayDefault] builds a [CoreGatewayFetcher]
///   bound to the configured default gateway.
/// - [SourceDescriptor::GatewayCustom] builds a [CoreGatewayFetcher]
///   bound to the given gateway.
/// - Fallback chains are [MultiFetcher]s.
#[derive(Debug)]
pub struct CoreFetcherFactory {}

impl CoreFetcherFactory {
    /// Construct a new CoreFetcherFactory.
    pub fn create() -> DynFetcherFactory {
        let out: DynFetcherFactory = Arc::new(CoreFetcherFactory {});
        out
    }
}

impl FetcherFactory for CoreFetcherFactory {
    fn default_config(&self, config: &mut Config) -> MfResult<()> {
        config.add_default_module_config::<CoreGatewayFetcherModConfig>()?;
        config.add_default_module_config::<CoreIpfsFetcherModConfig>()?;
        config.add_default_module_config::<MultiFetcherModConfig>()?;
        Ok(())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
        source: &SourceDescriptor,
        hints: &IpfsHints,
    ) -> MfResult<DynFetcher> {
        let out: DynFetcher = match source {
            SourceDescriptor::ContentNetwork => {
                let config: CoreIpfsFetcherModConfig =
                    builder.config.get_module_config()?;
                Arc::new(CoreIpfsFetcher::new(
                    builder.clone(),
                    &config.core_ipfs_fetcher,
                    hints.clone(),
                ))
            }
            SourceDescriptor::GatewayDefault => {
                let config: CoreGatewayFetcherModConfig =
                    builder.config.get_module_config()?;
                Arc::new(CoreGatewayFetcher::new(
                    &config.core_gateway_fetcher,
                    None,
                )?)
            }
            SourceDescriptor::GatewayCustom { gateway } => {
                let config: CoreGatewayFetcherModConfig =
                    builder.config.get_module_config()?;
                Arc::new(CoreGatewayFetcher::new(
                    &config.core_gateway_fetcher,
                    Some(gateway.as_str()),
                )?)
            }
        };

        tracing::debug!(%source, info = %out.info(), "built fetcher");

        Ok(out)
    }

    fn create_fallback(
        &self,
        builder: Arc<Builder>,
        members: Vec<DynFetcher>,
    ) -> MfResult<DynFetcher> {
        if members.is_empty() {
            return Err(MfError::NoSources);
        }

        let config: MultiFetcherModConfig =
            builder.config.get_module_config()?;
        let out: DynFetcher =
            Arc::new(MultiFetcher::new(&config.multi_fetcher, members));
        Ok(out)
    }
}
