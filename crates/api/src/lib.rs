#![deny(missing_docs)]
//! Migfetch API contains the fetcher and transport traits and the basic
//! types required to select migration download sources.
//!
//! If you want to build fetchers, please see the migfetch_core crate.

/// Boxed future type.
pub type BoxFut<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

pub mod builder;
pub use builder::Builder;

pub mod config;
pub use config::{Config, ModConfig};

mod error;
pub use error::*;

mod addr;
pub use addr::*;

pub mod fetch;
pub use fetch::{
    DynFetcher, DynFetcherFactory, Fetcher, FetcherFactory, FetcherInfo,
};

mod hints;
pub use hints::*;

mod migration;
pub use migration::*;

mod source;
pub use source::*;

pub mod transport;
pub use transport::{
    ContentTransport, ContentTransportFactory, DynContentTransport,
    DynContentTransportFactory,
};

pub use tokio_util::sync::CancellationToken;
