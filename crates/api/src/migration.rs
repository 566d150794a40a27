//! The `Migration` section of a node's persisted configuration.

use crate::*;

/// What to do with downloaded migration artifacts once a migration run
/// has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeepPolicy {
    /// Keep the downloaded artifacts in the local cache.
    #[default]
    Cache,

    /// Remove the downloaded artifacts.
    Discard,
}

impl KeepPolicy {
    /// Parse a keep policy, case-insensitively. An empty string selects
    /// the default policy.
    pub fn parse(src: &str) -> MfResult<Self> {
        match src.trim().to_ascii_lowercase().as_str() {
            "" | "cache" => Ok(Self::Cache),
            "discard" => Ok(Self::Discard),
            _ => Err(MfError::config_read(format!(
                "unknown Migration.Keep value {src:?}, must be 'cache' or 'discard'"
            ))),
        }
    }

    /// The config file spelling of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Discard => "discard",
        }
    }
}

impl std::fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for KeepPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for KeepPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Download sources used when a `Migration` section does not list any.
pub const DEFAULT_DOWNLOAD_SOURCES: &[&str] = &["HTTPS", "IPFS"];

fn default_download_sources() -> Vec<String> {
    DEFAULT_DOWNLOAD_SOURCES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Migration configuration.
///
/// `download_sources` is in fetch-priority order, exactly as written on
/// disk. It may be empty and may contain empty strings; those are rejected
/// later, when the sources are resolved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MigrationConfig {
    /// Ordered download source tokens.
    #[serde(rename = "DownloadSources", default = "default_download_sources")]
    pub download_sources: Vec<String>,

    /// What to do with downloaded artifacts.
    #[serde(rename = "Keep", default)]
    pub keep: KeepPolicy,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            download_sources: default_download_sources(),
            keep: KeepPolicy::default(),
        }
    }
}
