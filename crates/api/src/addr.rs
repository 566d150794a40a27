//! Peer id and multiaddress types found in node configuration.
//!
//! Validation is done with the libp2p multiaddr and identity crates, but
//! the text is kept exactly as written in the config. Nothing in migfetch
//! dials these addresses itself; they are handed through to a content
//! transport.

use crate::*;
use std::sync::Arc;

macro_rules! imp_str_type {
    ($t:ident, $expect:literal) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct V;

                impl serde::de::Visitor<'_> for V {
                    type Value = $t;

                    fn expecting(
                        &self,
                        f: &mut std::fmt::Formatter,
                    ) -> std::fmt::Result {
                        f.write_str($expect)
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        $t::from_str(v).map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(V)
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{self}")
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::str::FromStr for $t {
            type Err = MfError;

            fn from_str(src: &str) -> Result<Self, Self::Err> {
                Self::from_str(src)
            }
        }
    };
}

/// A validated libp2p peer id in its base58btc text form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(Arc<str>);

imp_str_type!(PeerId, "a base58btc libp2p peer id");

impl PeerId {
    /// Construct a new validated PeerId from a str.
    // We *do* also implement the trait. But it's not as usable,
    // so implement a better local version as well.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str<S: AsRef<str>>(src: S) -> MfResult<Self> {
        let src = src.as_ref();

        src.parse::<libp2p_identity::PeerId>().map_err(|err| {
            MfError::other_src(format!("Invalid PeerId: {src}"), err)
        })?;

        Ok(Self(src.into()))
    }

    /// Get this peer id as a str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated multiaddress in its text form, e.g.
/// `/ip4/127.0.0.1/udp/4001/quic`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiaddr(Arc<str>);

imp_str_type!(Multiaddr, "a multiaddr string");

impl Multiaddr {
    /// Construct a new validated Multiaddr from a str.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str<S: AsRef<str>>(src: S) -> MfResult<Self> {
        let src = src.as_ref();

        let addr = src.parse::<multiaddr::Multiaddr>().map_err(|err| {
            MfError::other_src(format!("Invalid Multiaddr: {src}"), err)
        })?;

        if addr.is_empty() {
            return Err(MfError::other("Invalid Multiaddr, empty"));
        }

        Ok(Self(src.into()))
    }

    /// Get this multiaddr as a str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the peer id if this multiaddr ends in a `/p2p/` segment.
    pub fn peer_id(&self) -> Option<PeerId> {
        let addr = self.as_str().parse::<multiaddr::Multiaddr>().ok()?;
        match addr.iter().last()? {
            multiaddr::Protocol::P2p(id) => {
                Some(PeerId(id.to_base58().into_boxed_str().into()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn happy_serialize() {
        const ADDR: &str = "/ip4/127.0.0.1/tcp/4001";
        let a = Multiaddr::from_str(ADDR).unwrap();
        let e = serde_json::to_string(&a).unwrap();
        assert_eq!(format!("\"{ADDR}\""), e);
        let d: Multiaddr = serde_json::from_str(&e).unwrap();
        assert_eq!(d, a);
    }

    #[test]
    fn fixture_parse() {
        const F: &[(&str, Option<&str>)] = &[
            ("/ip4/127.0.0.1/tcp/4001", None),
            ("/ip4/127.0.0.1/udp/4001/quic", None),
            ("/ip6/::1/udp/4001/quic-v1/webtransport", None),
            (
                "/ip6zone/eth0/ip6/fe80::1/tcp/4001/p2p/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ",
                Some("QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ"),
            ),
            ("/dns4/example.com/tcp/443/wss", None),
            (
                "/dnsaddr/bootstrap.libp2p.io/p2p/QmcZf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt",
                Some("QmcZf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt"),
            ),
            (
                "/ip4/104.131.131.82/tcp/4001/ipfs/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ",
                Some("QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ"),
            ),
        ];

        for (s, id) in F.iter() {
            let a = Multiaddr::from_str(s).unwrap();
            assert_eq!(s, &a.as_str());
            assert_eq!(*id, a.peer_id().as_ref().map(PeerId::as_str));
        }
    }

    #[test]
    fn fixture_no_parse() {
        const F: &[&str] = &[
            "",
            "/",
            "ip4/127.0.0.1",
            "/ip4/300.0.0.1/tcp/1",
            "/ip4/127.0.0.1/tcp/99999",
            "/ip4/127.0.0.1/tcp",
            "/bogus/1",
            "/p2p/notapeerid",
        ];

        for s in F.iter() {
            assert!(Multiaddr::from_str(s).is_err(), "{s}");
        }
    }

    #[test]
    fn peer_id_forms() {
        for ok in [
            "QmcZf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt",
            "12D3KooWGC6TvWhfapngX6wvJHMYvKpDMXPb3ZnCZ6dMoaMtimQ5",
            "16Uiu2HAmLhLvBoYaoZfaMUKuibM6ac163GwKY74c5kiSLg5KvLpY",
        ] {
            assert_eq!(ok, PeerId::from_str(ok).unwrap().as_str());
        }

        for bad in [
            "",
            "Qm",
            // '0' and 'l' are not base58
            "Qm0Zf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt",
            "12D3KooWGC6TvWhfapngX6wvJHMYvKpDMXPb3ZnCZ6dMoaMtimQ",
            // base58 clean, but not a multihash
            "Qm11111111111111111111111111111111111111111111",
        ] {
            assert!(PeerId::from_str(bad).is_err(), "{bad}");
        }
    }
}
