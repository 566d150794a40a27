//! The content network fetcher provided by migfetch.
//!
//! This fetcher does not implement a content network itself. It is seeded
//! with the bootstrap and peering hints read from the node config and
//! brings up a [ContentTransport] through the builder's
//! [ContentTransportFactory] the first time it is asked to fetch.

use bytes::Bytes;
use migfetch_api::*;
use std::sync::Arc;

/// CoreIpfsFetcher configuration types.
pub mod config {
    /// Configuration parameters for [CoreIpfsFetcher](super::CoreIpfsFetcher).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct CoreIpfsFetcherConfig {
        /// The distribution root, overridable with `IPFS_DIST_PATH`.
        /// Default: `/ipns/dist.ipfs.io`.
        pub dist_path: String,

        /// Maximum artifact size in bytes. Default: 512 MiB.
        pub fetch_limit: u64,
    }

    impl Default for CoreIpfsFetcherConfig {
        fn default() -> Self {
            Self {
                dist_path: crate::dist::DEFAULT_DIST_PATH.into(),
                fetch_limit: 1024 * 1024 * 512,
            }
        }
    }

    /// Module-level configuration for CoreIpfsFetcher.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CoreIpfsFetcherModConfig {
        /// CoreIpfsFetcher configuration.
        #[serde(default)]
        pub core_ipfs_fetcher: CoreIpfsFetcherConfig,
    }

    impl migfetch_api::ModConfig for CoreIpfsFetcherModConfig {}
}

pub use config::*;

/// Fetches distribution artifacts from the content network.
#[derive(Debug)]
pub struct CoreIpfsFetcher {
    builder: Arc<Builder>,
    dist_path: String,
    fetch_limit: u64,
    hints: IpfsHints,
    transport: tokio::sync::OnceCell<DynContentTransport>,
}

impl CoreIpfsFetcher {
    /// Construct a new content network fetcher. No transport is started
    /// until the first fetch.
    pub fn new(
        builder: Arc<Builder>,
        config: &CoreIpfsFetcherConfig,
        hints: IpfsHints,
    ) -> Self {
        Self {
            builder,
            dist_path: crate::dist::dist_path(&config.dist_path),
            fetch_limit: config.fetch_limit,
            hints,
            transport: tokio::sync::OnceCell::new(),
        }
    }

    /// The hints this fetcher will seed its transport with.
    pub fn hints(&self) -> &IpfsHints {
        &self.hints
    }

    async fn transport(&self) -> MfResult<&DynContentTransport> {
        self.transport
            .get_or_try_init(|| {
                tracing::debug!(
                    bootstrap = ?self.hints.bootstrap,
                    peers = ?self.hints.peers,
                    "starting content network transport"
                );
                self.builder
                    .content_transport
                    .connect(self.builder.clone(), self.hints.clone())
            })
            .await
    }
}

impl Fetcher for CoreIpfsFetcher {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        cancel: CancellationToken,
    ) -> BoxFut<'a, MfResult<Bytes>> {
        Box::pin(async move {
            let transport = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(MfError::Cancelled),
                res = self.transport() => res?,
            };

            let path =
                format!("{}/{}", self.dist_path, path.trim_start_matches('/'));

            tracing::debug!(%path, "content network fetch");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(MfError::Cancelled),
                res = transport.get(path, self.fetch_limit) => res,
            }
        })
    }

    fn close(&self) -> BoxFut<'_, MfResult<()>> {
        Box::pin(async move {
            match self.transport.get() {
                Some(transport) => transport.close().await,
                None => Ok(()),
            }
        })
    }

    fn info(&self) -> FetcherInfo {
        FetcherInfo::ContentNetwork
    }
}
