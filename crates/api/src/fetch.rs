//! Migfetch fetcher types.

use crate::*;
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Diagnostic description of a built fetcher.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum FetcherInfo {
    /// A content network fetcher.
    ContentNetwork,

    /// An http(s) gateway fetcher.
    Gateway {
        /// The gateway base url.
        gateway: String,
    },

    /// A fallback chain of fetchers, tried in order.
    Fallback {
        /// Descriptions of the chain members, in order.
        members: Vec<FetcherInfo>,
    },
}

impl std::fmt::Display for FetcherInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentNetwork => f.write_str("content-network"),
            Self::Gateway { gateway } => write!(f, "gateway {gateway}"),
            Self::Fallback { members } => {
                f.write_str("fallback[")?;
                for (idx, m) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    m.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Retrieves migration artifacts by logical distribution path.
///
/// Implementations must not perform network I/O on construction.
pub trait Fetcher: 'static + Send + Sync + std::fmt::Debug {
    /// Fetch the artifact at `path`, relative to the distribution root,
    /// e.g. `fs-repo-11-to-12/versions`.
    ///
    /// If `cancel` fires before the fetch completes, this must resolve
    /// to [MfError::Cancelled].
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        cancel: CancellationToken,
    ) -> BoxFut<'a, MfResult<Bytes>>;

    /// Release any transport resources held by this fetcher.
    fn close(&self) -> BoxFut<'_, MfResult<()>>;

    /// Describe this fetcher.
    fn info(&self) -> FetcherInfo;
}

/// Trait-object [Fetcher].
pub type DynFetcher = Arc<dyn Fetcher>;

/// A factory for constructing the fetchers a download source resolves to.
///
/// Construction must be cheap and must not perform network I/O.
pub trait FetcherFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut Config) -> MfResult<()>;

    /// Construct the fetcher for a single resolved download source.
    fn create(
        &self,
        builder: Arc<Builder>,
        source: &SourceDescriptor,
        hints: &IpfsHints,
    ) -> MfResult<DynFetcher>;

    /// Wrap several fetchers into a fallback chain that tries them in order.
    fn create_fallback(
        &self,
        builder: Arc<Builder>,
        members: Vec<DynFetcher>,
    ) -> MfResult<DynFetcher>;
}

/// Trait-object [FetcherFactory].
pub type DynFetcherFactory = Arc<dyn FetcherFactory>;
