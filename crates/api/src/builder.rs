//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general migfetch builder.
/// This contains both configuration and factory instances,
/// allowing construction of fetchers.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building fetchers.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: config::Config,

    /// The [fetch::FetcherFactory] used to turn resolved download sources
    /// into fetchers.
    pub fetcher: fetch::DynFetcherFactory,

    /// The [transport::ContentTransportFactory] used by content network
    /// fetchers.
    pub content_transport: transport::DynContentTransportFactory,
}

impl Builder {
    /// Construct a default config given the configured module factories.
    /// Note, this should be called before freezing the Builder instance
    /// in an Arc<>.
    pub fn with_default_config(mut self) -> MfResult<Self> {
        {
            let Self {
                config,
                fetcher,
                content_transport,
            } = &mut self;

            fetcher.default_config(config)?;
            content_transport.default_config(config)?;
        }

        Ok(self)
    }

    /// Freeze this builder so it can be shared by the fetchers it builds.
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}
