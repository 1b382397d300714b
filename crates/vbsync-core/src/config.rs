//! Settings loaded from `vbsync.toml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vbsync_content::LegacyCodec;
use vbsync_fs::{ConfigStore, NormalizedPath};

use crate::{Error, Result};

/// File name looked up in the sync directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "vbsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSettings {
    /// Quiet time per file before its import fires
    pub debounce_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Period of the reverse export in bidirectional mode
    pub poll_interval_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingSettings {
    /// Label of the host's single-byte code page
    pub legacy: String,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            legacy: "windows-1252".into(),
        }
    }
}

/// All tunables, each with a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub watch: WatchSettings,
    pub sync: SyncSettings,
    pub encoding: EncodingSettings,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist. Otherwise `vbsync.toml` in `sync_dir`
    /// is used when present, and defaults when not. The encoding label is
    /// validated here so a bad label fails before anything is synced.
    pub fn load(path: Option<&Path>, sync_dir: &Path) -> Result<Self> {
        let store = ConfigStore::new();
        let settings: Self = match path {
            Some(path) => store.load(&NormalizedPath::new(path))?,
            None => store.load_or_default(&NormalizedPath::new(sync_dir.join(CONFIG_FILE_NAME)))?,
        };
        settings.codec()?;
        Ok(settings)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watch.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.sync.poll_interval_ms)
    }

    pub fn codec(&self) -> Result<LegacyCodec> {
        LegacyCodec::for_label(&self.encoding.legacy).map_err(|e| Error::Config {
            message: format!("[encoding] legacy: {}", e),
        })
    }
}
