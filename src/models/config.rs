use crate::services::installation::InstallationHints;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Mojang's version manifest endpoint.
pub const DEFAULT_VERSION_LIST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Launcher configuration from `Launcher Config.yaml`
///
/// Keys are snake_case so the same names work as `MC_PROFILES_*` environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub launcher: LauncherSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherSettings {
    #[serde(default)]
    pub installation: InstallationSettings,

    #[serde(default)]
    pub version_list: VersionListSettings,

    /// Profile name to load as soon as it has resolved.
    #[serde(default)]
    pub selected_profile: Option<String>,

    #[serde(default)]
    pub debug_mode: bool,
}

/// Explicit installation locations. Anything left unset falls back to the
/// platform default search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationSettings {
    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub libraries: Option<String>,

    #[serde(default)]
    pub saves: Option<String>,

    #[serde(default)]
    pub versions: Option<String>,

    #[serde(default)]
    pub profiles_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionListSettings {
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Local copy used when the remote list cannot be fetched.
    #[serde(default)]
    pub cache_file: Option<String>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for VersionListSettings {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            cache_file: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_remote_url() -> String {
    DEFAULT_VERSION_LIST_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl LauncherConfig {
    /// Installation overrides in the form `open_installation` takes them.
    pub fn installation_hints(&self) -> InstallationHints {
        let settings = &self.launcher.installation;
        let path = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Utf8PathBuf::from)
        };

        InstallationHints {
            root: path(&settings.root),
            libraries: path(&settings.libraries),
            saves: path(&settings.saves),
            versions: path(&settings.versions),
            profiles_file: path(&settings.profiles_file),
        }
    }

    /// Where the version list is cached: the configured file, or the
    /// platform cache directory.
    pub fn version_list_cache_file(&self) -> Option<Utf8PathBuf> {
        if let Some(file) = self.launcher.version_list.cache_file.as_deref() {
            if !file.trim().is_empty() {
                return Some(Utf8PathBuf::from(file));
            }
        }

        dirs::cache_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .map(|dir| dir.join(crate::APP_NAME).join("version_manifest_v2.json"))
    }
}
