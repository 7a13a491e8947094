use crate::models::installation::{InstallationRoot, VersionDirectory};
use crate::models::version::VersionMetadata;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Contents of `launcher_profiles.json`.
///
/// Only the `profiles` object is modelled; everything else the official
/// launcher writes (settings, authentication database, ...) is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherProfilesJson {
    #[serde(default)]
    pub profiles: IndexMap<String, ProfileEntry>,
}

/// One entry of the `profiles` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub last_version_id: Option<String>,

    #[serde(rename = "type", default)]
    pub profile_type: Option<String>,

    #[serde(default)]
    pub game_dir: Option<String>,
}

/// Symbolic version names that need a version list to become concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionAlias {
    LatestRelease,
    LatestSnapshot,
}

impl VersionAlias {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "latest-release" => Some(VersionAlias::LatestRelease),
            "latest-snapshot" => Some(VersionAlias::LatestSnapshot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionAlias::LatestRelease => "latest-release",
            VersionAlias::LatestSnapshot => "latest-snapshot",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            VersionAlias::LatestRelease => "Latest release",
            VersionAlias::LatestSnapshot => "Latest snapshot",
        }
    }
}

impl fmt::Display for VersionAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a profile points at: an installed version id or an alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionReference {
    Concrete(String),
    Alias(VersionAlias),
}

impl VersionReference {
    /// Interpret `lastVersionId` / `type` the way the official launcher writes them.
    pub fn from_entry(entry: &ProfileEntry) -> Self {
        match entry.last_version_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => match VersionAlias::parse(id) {
                Some(alias) => VersionReference::Alias(alias),
                None => VersionReference::Concrete(id.to_string()),
            },
            _ => VersionReference::Alias(
                entry
                    .profile_type
                    .as_deref()
                    .and_then(VersionAlias::parse)
                    .unwrap_or(VersionAlias::LatestRelease),
            ),
        }
    }
}

impl fmt::Display for VersionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionReference::Concrete(id) => f.write_str(id),
            VersionReference::Alias(alias) => write!(f, "{alias}"),
        }
    }
}

/// A profile as listed by the launcher, before its version is looked up.
#[derive(Debug, Clone)]
pub struct UnresolvedProfile {
    id: String,
    name: String,
    version: VersionReference,
    game_dir: Option<Utf8PathBuf>,
    installation: Arc<InstallationRoot>,
}

impl UnresolvedProfile {
    pub fn new(
        id: impl Into<String>,
        entry: &ProfileEntry,
        installation: Arc<InstallationRoot>,
    ) -> Self {
        let id = id.into();
        let version = VersionReference::from_entry(entry);

        let name = match entry.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => match &version {
                VersionReference::Alias(alias) => alias.display_name().to_string(),
                VersionReference::Concrete(_) => id.clone(),
            },
        };

        let game_dir = entry
            .game_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(Utf8PathBuf::from);

        Self {
            id,
            name,
            version,
            game_dir,
            installation,
        }
    }

    /// Key of the profile inside `launcher_profiles.json`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &VersionReference {
        &self.version
    }

    pub fn game_dir(&self) -> Option<&Utf8Path> {
        self.game_dir.as_deref()
    }

    pub fn installation(&self) -> &Arc<InstallationRoot> {
        &self.installation
    }
}

/// A profile whose version has been located and parsed. Never mutated.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    installation: Arc<InstallationRoot>,
    profile_name: String,
    game_dir: Utf8PathBuf,
    version_directory: VersionDirectory,
    metadata: VersionMetadata,
}

impl ResolvedProfile {
    pub(crate) fn new(
        installation: Arc<InstallationRoot>,
        profile_name: String,
        game_dir: Utf8PathBuf,
        version_directory: VersionDirectory,
        metadata: VersionMetadata,
    ) -> Self {
        Self {
            installation,
            profile_name,
            game_dir,
            version_directory,
            metadata,
        }
    }

    pub fn installation(&self) -> &InstallationRoot {
        &self.installation
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Working directory of the game (`gameDir`, or the installation root).
    pub fn game_dir(&self) -> &Utf8Path {
        &self.game_dir
    }

    pub fn version_directory(&self) -> &VersionDirectory {
        &self.version_directory
    }

    pub fn metadata(&self) -> &VersionMetadata {
        &self.metadata
    }

    /// The authoritative version id, taken from the parsed metadata.
    pub fn version_id(&self) -> &str {
        self.metadata.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: Option<&str>, last: Option<&str>, kind: Option<&str>) -> ProfileEntry {
        ProfileEntry {
            name: name.map(String::from),
            last_version_id: last.map(String::from),
            profile_type: kind.map(String::from),
            game_dir: None,
        }
    }

    fn root() -> Arc<InstallationRoot> {
        Arc::new(InstallationRoot::from_validated_paths(
            "/mc".into(),
            "/mc/libraries".into(),
            "/mc/saves".into(),
            "/mc/versions".into(),
            "/mc/launcher_profiles.json".into(),
        ))
    }

    #[test]
    fn test_concrete_reference() {
        let reference = VersionReference::from_entry(&entry(None, Some("1.12.2"), Some("custom")));
        assert_eq!(reference, VersionReference::Concrete("1.12.2".into()));
    }

    #[test]
    fn test_alias_in_last_version_id() {
        let reference = VersionReference::from_entry(&entry(None, Some("latest-snapshot"), None));
        assert_eq!(
            reference,
            VersionReference::Alias(VersionAlias::LatestSnapshot)
        );
    }

    #[test]
    fn test_alias_from_type_when_version_missing() {
        let reference =
            VersionReference::from_entry(&entry(None, None, Some("latest-snapshot")));
        assert_eq!(
            reference,
            VersionReference::Alias(VersionAlias::LatestSnapshot)
        );

        let reference = VersionReference::from_entry(&entry(None, Some("  "), Some("custom")));
        assert_eq!(reference, VersionReference::Alias(VersionAlias::LatestRelease));
    }

    #[test]
    fn test_profile_name_fallbacks() {
        let named = UnresolvedProfile::new("abc", &entry(Some("Survival"), Some("1.20.1"), None), root());
        assert_eq!(named.name(), "Survival");

        let unnamed = UnresolvedProfile::new("abc", &entry(None, Some("1.20.1"), None), root());
        assert_eq!(unnamed.name(), "abc");

        let latest = UnresolvedProfile::new(
            "abc",
            &entry(Some(""), None, Some("latest-release")),
            root(),
        );
        assert_eq!(latest.name(), "Latest release");
    }

    #[test]
    fn test_profiles_json_preserves_order() {
        let json = r#"{
            "profiles": {
                "zeta": { "name": "Zeta", "lastVersionId": "1.8.9" },
                "alpha": { "name": "Alpha", "type": "latest-release" }
            },
            "settings": { "enableSnapshots": false }
        }"#;
        let parsed: LauncherProfilesJson = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = parsed.profiles.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta".to_string(), "alpha".to_string()]);
    }
}
