//! The content network transport seam.
//!
//! Migfetch does not speak any content network protocol itself. A
//! [ContentTransportFactory] is supplied through the [Builder] and is used
//! by the content network fetcher to bring up a transport the first time
//! an artifact is requested.

use crate::*;
use bytes::Bytes;
use std::sync::Arc;

/// A running connection to a content network.
pub trait ContentTransport: 'static + Send + Sync + std::fmt::Debug {
    /// Retrieve the content at an absolute content path,
    /// e.g. `/ipns/dist.ipfs.io/fs-repo-11-to-12/versions`.
    ///
    /// At most `limit` bytes may be returned; larger content is an error.
    fn get(&self, path: String, limit: u64) -> BoxFut<'_, MfResult<Bytes>>;

    /// Shut the transport down.
    fn close(&self) -> BoxFut<'_, MfResult<()>>;
}

/// Trait-object [ContentTransport].
pub type DynContentTransport = Arc<dyn ContentTransport>;

/// A factory for bringing up content transports.
pub trait ContentTransportFactory:
    'static + Send + Sync + std::fmt::Debug
{
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut Config) -> MfResult<()>;

    /// Connect to the content network, seeded with whatever hints
    /// were readable from the node configuration. Absent hints mean the
    /// transport should use its own defaults.
    fn connect(
        &self,
        builder: Arc<Builder>,
        hints: IpfsHints,
    ) -> BoxFut<'static, MfResult<DynContentTransport>>;
}

/// Trait-object [ContentTransportFactory].
pub type DynContentTransportFactory = Arc<dyn ContentTransportFactory>;
