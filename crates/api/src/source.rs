//! Resolved download sources.

/// A download source token resolved to a fetch strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceDescriptor {
    /// Fetch through the peer-to-peer content network.
    ContentNetwork,

    /// Fetch over http(s) from the configured default gateway.
    GatewayDefault,

    /// Fetch over http(s) from a specific gateway.
    GatewayCustom {
        /// Normalized gateway base url, without a trailing slash,
        /// e.g. `https://some.domain.io`.
        gateway: String,
    },
}

impl std::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentNetwork => f.write_str("ipfs"),
            Self::GatewayDefault => f.write_str("https"),
            Self::GatewayCustom { gateway } => f.write_str(gateway),
        }
    }
}
