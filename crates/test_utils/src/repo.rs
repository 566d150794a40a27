//! Temporary node repositories with a written config file.

/// A well formed node config.
pub const CONFIG_DATA: &str = r#"
{
	"Bootstrap": [
		"/dnsaddr/bootstrap.libp2p.io/p2p/QmcZf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt",
		"/ip4/104.131.131.82/tcp/4001/p2p/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ"
	],
	"Migration": {
		"DownloadSources": ["IPFS", "HTTP", "127.0.0.1"],
		"Keep": "cache"
	},
	"Peering": {
		"Peers": [
			{
				"ID": "12D3KooWGC6TvWhfapngX6wvJHMYvKpDMXPb3ZnCZ6dMoaMtimQ5",
				"Addrs": ["/ip4/127.0.0.1/tcp/4001", "/ip4/127.0.0.1/udp/4001/quic"]
			}
		]
	}
}
"#;

/// A node config whose `Peering` section is not an object.
pub const CONFIG_DATA_BAD_PEERS: &str = r#"
{
	"Bootstrap": [
		"/dnsaddr/bootstrap.libp2p.io/p2p/QmcZf59bWwK5XFi76CZX8cbJ4BhTzzA3gU1ZjYZcYW3dwt",
		"/ip4/104.131.131.82/tcp/4001/p2p/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ"
	],
	"Migration": {
		"DownloadSources": ["IPFS", "HTTP", "127.0.0.1"],
		"Keep": "cache"
	},
	"Peering": "Unreadable-data"
}
"#;

/// A node config whose `Bootstrap` section is not a list.
pub const CONFIG_DATA_BAD_BOOTSTRAP: &str = r#"
{
	"Bootstrap": "unreadable",
	"Migration": {
		"DownloadSources": ["IPFS", "HTTP", "127.0.0.1"],
		"Keep": "cache"
	},
	"Peering": {
		"Peers": [
			{
				"ID": "12D3KooWGC6TvWhfapngX6wvJHMYvKpDMXPb3ZnCZ6dMoaMtimQ5",
				"Addrs": ["/ip4/127.0.0.1/tcp/4001", "/ip4/127.0.0.1/udp/4001/quic"]
			}
		]
	}
}
"#;

/// A temporary repository directory, removed on drop.
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create a repository whose config file contains `config_data`.
    pub fn new(config_data: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("migration_test")
            .tempdir()
            .unwrap();
        std::fs::write(dir.path().join("config"), config_data).unwrap();
        Self { dir }
    }

    /// Create a repository with no config file at all.
    pub fn empty() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("migration_test")
            .tempdir()
            .unwrap();
        Self { dir }
    }

    /// The repository directory.
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
