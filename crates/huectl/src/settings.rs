//! CLI-owned settings: a TOML file layered with `HUE_*` environment
//! variables via figment. Flag values override both layers.
//!
//! Core never sees these types -- it receives a pre-built `BridgeOptions`.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Persistent defaults for flags that are tedious to repeat.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Bridge address; skips cloud discovery when set.
    pub bridge: Option<String>,

    /// Data directory for the connection record and cache.
    pub data_dir: Option<PathBuf>,

    /// Verify the bridge certificate against the system trust store.
    #[serde(default)]
    pub verify_tls: bool,

    /// Custom CA certificate (PEM) for bridge verification.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Mirror bridge exchanges to diagnostic files.
    #[serde(default)]
    pub debug_files: bool,

    /// Default output format name (table, json, json-compact, plain).
    #[serde(default = "default_output")]
    pub output: String,

    /// Default color mode name (auto, always, never).
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bridge: None,
            data_dir: None,
            verify_tls: false,
            ca_cert: None,
            timeout: default_timeout(),
            debug_files: false,
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Location of the settings file (`config.toml` in the platform config dir).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "huectl", "huectl")
        .map_or_else(|| PathBuf::from("config.toml"), |d| d.config_dir().join("config.toml"))
}

/// Load settings from the TOML file and `HUE_*` environment variables.
/// A missing file yields the defaults; a malformed one is an error.
pub fn load() -> Result<Settings, CliError> {
    let settings = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("HUE_"))
        .extract()?;
    Ok(settings)
}
