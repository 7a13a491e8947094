use crate::models::profile::VersionAlias;
use serde::{Deserialize, Serialize};

/// Parsed `<version>.json`.
///
/// Only the id is needed by the resolver; the rest of the document is kept
/// as an opaque map for whatever consumes the running profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VersionMetadata {
    /// The authoritative version id. May differ from the directory name.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Mojang's version manifest (`version_manifest_v2.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionList {
    #[serde(default)]
    pub latest: LatestVersions,

    #[serde(default)]
    pub versions: Vec<VersionListEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatestVersions {
    #[serde(default)]
    pub release: String,

    #[serde(default)]
    pub snapshot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionListEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    #[serde(default)]
    pub release_time: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl VersionList {
    /// Concrete id behind an alias, if the manifest names one.
    pub fn latest(&self, alias: VersionAlias) -> Option<&str> {
        let id = match alias {
            VersionAlias::LatestRelease => &self.latest.release,
            VersionAlias::LatestSnapshot => &self.latest.snapshot,
        };
        (!id.is_empty()).then_some(id.as_str())
    }

    pub fn find_version(&self, id: &str) -> Option<&VersionListEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}
