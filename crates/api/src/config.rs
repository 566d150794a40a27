//! Types for use when configuring migfetch modules.

use crate::*;
use std::sync::Mutex;

/// helper transcode function
fn tc<S: serde::Serialize, D: serde::de::DeserializeOwned>(
    s: &S,
) -> MfResult<D> {
    serde_json::from_str(
        &serde_json::to_string(s)
            .map_err(|e| MfError::other_src("encode", e))?,
    )
    .map_err(|e| MfError::other_src("decode", e))
}

/// Denotes a type used to configure a specific migfetch module.
///
/// A module config type should be a struct with a single camelCase field
/// named after the module, e.g. `{ "coreGatewayFetcher": { ... } }`, so
/// that multiple modules can share one [Config] object without colliding.
///
/// The inner properties should use `#[serde(default)]` so that a
/// hand-edited config file missing some properties still loads.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// Migfetch module configuration.
#[derive(Debug, Default)]
pub struct Config(Mutex<serde_json::Map<String, serde_json::Value>>);

impl serde::Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&*self.lock(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map: serde_json::Map<String, serde_json::Value> =
            serde::Deserialize::deserialize(deserializer)?;
        Ok(Self(Mutex::new(map)))
    }
}

impl Config {
    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, serde_json::Map<String, serde_json::Value>>
    {
        // the map is never left half-written, so a poisoned lock is fine
        match self.0.lock() {
            Ok(g) => g,
            Err(p) => p.into_inner(),
        }
    }

    /// Merge the top-level sections of a module config into this config,
    /// replacing any sections of the same name.
    pub fn set_module_config<M: ModConfig>(&self, m: &M) -> MfResult<()> {
        let value: serde_json::Value = tc(m)?;
        let serde_json::Value::Object(sections) = value else {
            return Err(MfError::other(
                "module config must serialize to an object",
            ));
        };
        let mut lock = self.lock();
        for (name, section) in sections {
            lock.insert(name, section);
        }
        Ok(())
    }

    /// Merge default module config sections, leaving any section that is
    /// already present untouched.
    pub fn add_default_module_config<M: ModConfig>(&self) -> MfResult<()> {
        let value: serde_json::Value = tc(&M::default())?;
        let serde_json::Value::Object(sections) = value else {
            return Err(MfError::other(
                "module config must serialize to an object",
            ));
        };
        let mut lock = self.lock();
        for (name, section) in sections {
            lock.entry(name).or_insert(section);
        }
        Ok(())
    }

    /// Extract a module config. Sections that are not set take the
    /// module defaults. Note that this config may be loaded from disk and
    /// edited by humans, so module configs should be tolerant to missing
    /// properties.
    pub fn get_module_config<M: ModConfig>(&self) -> MfResult<M> {
        let map = self.lock().clone();
        tc(&map)
    }
}
