//! Factories for generating instances of migfetch modules.

mod core_fetcher;
pub use core_fetcher::*;

pub mod core_gateway;
pub use core_gateway::CoreGatewayFetcher;
pub use core_gateway::config::*;

pub mod core_ipfs;
pub use core_ipfs::CoreIpfsFetcher;
pub use core_ipfs::config::*;

pub mod multi_fetcher;
pub use multi_fetcher::MultiFetcher;
pub use multi_fetcher::config::*;

mod mem_transport;
pub use mem_transport::*;

mod noop_transport;
pub use noop_transport::*;
