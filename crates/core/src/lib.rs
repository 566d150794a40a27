#![deny(missing_docs)]
//! Migfetch selects the download sources for repository migration
//! artifacts and composes them into a fallback fetcher.
//!
//! The usual flow is:
//!
//! - [repo_config::read_migration_config] and
//!   [repo_config::read_ipfs_config] read the node's configuration file.
//! - [chain::migration_fetcher] resolves the configured download sources
//!   and builds a single [Fetcher](migfetch_api::Fetcher) over them.
//! - [dist] locates artifacts within the distribution root.

use migfetch_api::{builder::Builder, config::Config};

/// Construct a production-ready default builder.
///
/// - `fetcher` - The default fetcher factory is
///   [factories::CoreFetcherFactory].
/// - `content_transport` - No content network is embedded, so the default
///   is [factories::NoopContentTransportFactory]. Content network sources
///   fail as unreachable and a fallback chain moves on to its gateways.
pub fn default_builder() -> Builder {
    Builder {
        config: Config::default(),
        fetcher: factories::CoreFetcherFactory::create(),
        content_transport: factories::NoopContentTransportFactory::create(),
    }
}

/// Construct a builder whose content network is an in-memory
/// [factories::MemContentTransportFactory].
pub fn default_test_builder() -> Builder {
    Builder {
        config: Config::default(),
        fetcher: factories::CoreFetcherFactory::create(),
        content_transport: factories::MemContentTransportFactory::create(),
    }
}

pub mod chain;
pub mod dist;
pub mod factories;
pub mod repo_config;
pub mod source;
