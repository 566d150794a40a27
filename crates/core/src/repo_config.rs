//! Reading migration settings and content network hints from a node's
//! persisted configuration file.
//!
//! The migration section is required and any problem with it is an error.
//! The bootstrap and peering sections are only hints, so each of them is
//! decoded on its own and silently degrades to `None` when unreadable.

use migfetch_api::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a repository directory.
pub const CONFIG_FILE_NAME: &str = "config";

/// Environment variable that overrides the default repository location.
pub const ENV_REPO_PATH: &str = "IPFS_PATH";

/// Repository directory name used under the home directory by default.
pub const DEFAULT_REPO_DIR: &str = ".ipfs";

/// The configuration file path for a repository directory.
pub fn config_file_path(repo: &Path) -> PathBuf {
    repo.join(CONFIG_FILE_NAME)
}

/// Locate the default repository: `$IPFS_PATH`, or `~/.ipfs`.
pub fn default_repo_path() -> MfResult<PathBuf> {
    if let Some(p) = std::env::var_os(ENV_REPO_PATH) {
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }

    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => {
            Ok(PathBuf::from(home).join(DEFAULT_REPO_DIR))
        }
        _ => Err(MfError::config_read(format!(
            "cannot locate repository, neither {ENV_REPO_PATH} nor HOME is set"
        ))),
    }
}

fn load_document(repo: &Path) -> MfResult<serde_json::Value> {
    let path = config_file_path(repo);
    let data = std::fs::read(&path).map_err(|err| {
        MfError::config_read_src(
            format!("cannot read {}", path.display()),
            err,
        )
    })?;
    serde_json::from_slice(&data).map_err(|err| {
        MfError::config_read_src(
            format!("cannot decode {}", path.display()),
            err,
        )
    })
}

/// Read the `Migration` section of a repository's configuration.
///
/// Fails with [MfError::ConfigRead] if the file cannot be read or parsed,
/// or if the section is missing or malformed.
pub fn read_migration_config(repo: &Path) -> MfResult<MigrationConfig> {
    let mut doc = load_document(repo)?;

    let section = match doc.get_mut("Migration") {
        Some(section) if section.is_object() => section.take(),
        Some(_) => {
            return Err(MfError::config_read(
                "Migration section is not an object",
            ))
        }
        None => {
            return Err(MfError::config_read("Migration section is missing"))
        }
    };

    let cfg: MigrationConfig =
        serde_json::from_value(section).map_err(|err| {
            MfError::config_read_src("cannot decode Migration section", err)
        })?;

    tracing::debug!(
        download_sources = ?cfg.download_sources,
        keep = %cfg.keep,
        "read migration config"
    );

    Ok(cfg)
}

/// Read bootstrap and peering hints from a repository's configuration.
///
/// With no repository there is no local node, and both hints are `None`.
/// This never fails: an unreadable file yields no hints, and an unreadable
/// section only blanks out that one hint.
pub fn read_ipfs_config(repo: Option<&Path>) -> IpfsHints {
    let Some(repo) = repo else {
        return IpfsHints::default();
    };

    let doc = match load_document(repo) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(?err, "node config unreadable, using no hints");
            return IpfsHints::default();
        }
    };

    IpfsHints {
        bootstrap: decode_bootstrap(&doc),
        peers: decode_peers(&doc),
    }
}

fn decode_bootstrap(doc: &serde_json::Value) -> Option<Vec<Multiaddr>> {
    let value = doc.get("Bootstrap")?;
    match Vec::<Multiaddr>::deserialize(value) {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable Bootstrap config");
            None
        }
    }
}

fn decode_peers(doc: &serde_json::Value) -> Option<Vec<PeerAddrInfo>> {
    let peering = doc.get("Peering")?;
    if !peering.is_object() {
        tracing::warn!("ignoring unreadable Peering config, not an object");
        return None;
    }

    let list = match peering.get("Peers")? {
        serde_json::Value::Array(list) => list,
        _ => {
            tracing::warn!("ignoring unreadable Peering.Peers config");
            return None;
        }
    };

    let peers = list
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match PeerAddrInfo::deserialize(entry) {
            Ok(peer) => Some(peer),
            Err(err) => {
                tracing::debug!(idx, %err, "dropping unreadable peering peer");
                None
            }
        })
        .collect();

    Some(peers)
}
