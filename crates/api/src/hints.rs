//! Bootstrap and peering hints read from a node's configuration.

use crate::*;

/// A peer to keep a persistent connection with, from `Peering.Peers`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PeerAddrInfo {
    /// The peer id.
    #[serde(rename = "ID")]
    pub id: PeerId,

    /// Known addresses of the peer, in configured order.
    #[serde(rename = "Addrs", default)]
    pub addrs: Vec<Multiaddr>,
}

/// Hints used to seed a content network transport.
///
/// The two fields are independent. `None` means the field was missing or
/// could not be read; it never means "configured as empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpfsHints {
    /// Bootstrap addresses, in configured order.
    pub bootstrap: Option<Vec<Multiaddr>>,

    /// Peering peers that parsed cleanly, in configured order.
    pub peers: Option<Vec<PeerAddrInfo>>,
}

impl IpfsHints {
    /// Returns true if neither hint is available.
    pub fn is_empty(&self) -> bool {
        self.bootstrap.is_none() && self.peers.is_none()
    }
}
