// ── Persisted bridge connection record ──
//
// One JSON file (`api_config.json`) holds the bridge URLs and the paired
// credentials for the lifetime of the installation. Read once at startup,
// written back on mutation. No file locking -- concurrent invocations of
// the tool can race on this file, an accepted limitation of the
// single-user CLI design.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use hue_api::PairingCredential;

use crate::error::CoreError;

/// File name of the persisted connection record.
pub const CONFIG_FILE: &str = "api_config.json";

/// Bridge connection + credential state.
///
/// The two URLs are set together or not at all -- both derive from one
/// bridge address. Credentials are filled in by a successful pairing
/// handshake and stay stable until the user re-pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConnection {
    /// Paired username; sent as the application-key header.
    pub api_username: Option<String>,
    /// Entertainment-stream client key; persisted, never sent on
    /// resource requests.
    pub api_key: Option<String>,
    /// Plaintext control URL (`http://{ip}/api`) -- pairing only.
    pub bridge_api_url: Option<Url>,
    /// TLS resource URL (`https://{ip}/clip/v2`).
    pub bridge_clip_url: Option<Url>,
}

impl BridgeConnection {
    /// Derive both URLs from a bare bridge address (IP or host[:port]).
    pub fn from_address(address: &str) -> Result<Self, CoreError> {
        let api: Url = format!("http://{address}/api")
            .parse()
            .map_err(|e: url::ParseError| CoreError::Api {
                message: format!("invalid bridge address '{address}': {e}"),
            })?;
        let clip: Url = format!("https://{address}/clip/v2")
            .parse()
            .map_err(|e: url::ParseError| CoreError::Api {
                message: format!("invalid bridge address '{address}': {e}"),
            })?;
        Ok(Self {
            api_username: None,
            api_key: None,
            bridge_api_url: Some(api),
            bridge_clip_url: Some(clip),
        })
    }

    /// Both URLs present.
    pub fn has_address(&self) -> bool {
        self.bridge_api_url.is_some() && self.bridge_clip_url.is_some()
    }

    /// URLs and credentials all present.
    pub fn is_complete(&self) -> bool {
        self.has_address() && self.api_username.is_some() && self.api_key.is_some()
    }

    /// The stored pairing credential, if any.
    pub fn credentials(&self) -> Option<PairingCredential> {
        let username = self.api_username.as_ref()?;
        let client_key = self.api_key.as_ref()?;
        Some(PairingCredential {
            username: username.clone(),
            client_key: client_key.clone(),
        })
    }

    /// Store a freshly obtained pairing credential.
    pub fn set_credentials(&mut self, cred: &PairingCredential) {
        self.api_username = Some(cred.username.clone());
        self.api_key = Some(cred.client_key.clone());
    }
}

/// Loads and persists the [`BridgeConnection`] record.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// A store for `api_config.json` inside the given data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(CONFIG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record. A missing file is not an error; a
    /// present-but-unparseable file is fatal [`CoreError::ConfigCorrupt`].
    pub fn load(&self) -> Result<Option<BridgeConnection>, CoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::Io(e)),
        };

        let connection =
            serde_json::from_str(&text).map_err(|source| CoreError::ConfigCorrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!("loaded bridge connection from {}", self.path.display());
        Ok(Some(connection))
    }

    /// Overwrite the record. Plain write -- this is not a
    /// crash-consistency-critical path for a single-process CLI.
    pub fn save(&self, connection: &BridgeConnection) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(connection).map_err(|source| {
            CoreError::ConfigCorrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json)?;
        debug!("saved bridge connection to {}", self.path.display());
        Ok(())
    }
}

/// Resolve the default data directory via XDG / platform conventions.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "huectl", "huectl").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".local");
            p.push("share");
            p.push("huectl");
            p
        },
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips_field_for_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());

        let mut conn = BridgeConnection::from_address("192.168.1.5").unwrap();
        conn.set_credentials(&PairingCredential {
            username: "abc123".into(),
            client_key: "FFEE00".into(),
        });

        store.save(&conn).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, conn);
    }

    #[test]
    fn persisted_record_uses_stable_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());

        let conn = BridgeConnection::from_address("192.168.1.5").unwrap();
        store.save(&conn).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["bridge_api_url"], "http://192.168.1.5/api");
        assert_eq!(value["bridge_clip_url"], "https://192.168.1.5/clip/v2");
        assert!(value.get("api_username").is_some());
        assert!(value.get("api_key").is_some());
    }

    #[test]
    fn malformed_record_is_config_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();

        match store.load() {
            Err(CoreError::ConfigCorrupt { ref path, .. }) => {
                assert_eq!(path, store.path());
            }
            other => panic!("expected ConfigCorrupt, got: {other:?}"),
        }
    }

    #[test]
    fn urls_are_derived_together() {
        let conn = BridgeConnection::from_address("10.0.0.2").unwrap();
        assert!(conn.has_address());
        assert!(!conn.is_complete());
        assert!(conn.credentials().is_none());
    }
}
