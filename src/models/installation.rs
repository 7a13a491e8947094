use camino::{Utf8Path, Utf8PathBuf};

/// File name of the launcher's profile list inside the installation root.
pub const PROFILES_FILE_NAME: &str = "launcher_profiles.json";

/// A validated Minecraft installation (`.minecraft` or a custom layout).
///
/// Every path was checked to exist when the value was built by
/// [`open_installation`](crate::services::installation::open_installation) or
/// [`new_custom_installation`](crate::services::installation::new_custom_installation).
/// The value is read-only afterwards and is shared between lifecycles behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRoot {
    root: Utf8PathBuf,
    libraries: Utf8PathBuf,
    saves: Utf8PathBuf,
    versions: Utf8PathBuf,
    profiles_file: Utf8PathBuf,
}

impl InstallationRoot {
    pub(crate) fn from_validated_paths(
        root: Utf8PathBuf,
        libraries: Utf8PathBuf,
        saves: Utf8PathBuf,
        versions: Utf8PathBuf,
        profiles_file: Utf8PathBuf,
    ) -> Self {
        Self {
            root,
            libraries,
            saves,
            versions,
            profiles_file,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn libraries(&self) -> &Utf8Path {
        &self.libraries
    }

    pub fn saves(&self) -> &Utf8Path {
        &self.saves
    }

    pub fn versions(&self) -> &Utf8Path {
        &self.versions
    }

    pub fn profiles_file(&self) -> &Utf8Path {
        &self.profiles_file
    }

    /// Conventional location of a version's files: `versions/<id>/<id>.{jar,json}`.
    pub fn version_file_paths(&self, version_id: &str) -> (Utf8PathBuf, Utf8PathBuf) {
        let dir = self.versions.join(version_id);
        (
            dir.join(format!("{version_id}.jar")),
            dir.join(format!("{version_id}.json")),
        )
    }
}

/// The metadata/artifact pair of one installed version.
///
/// `version_id` is the lookup key the directory was found under. The
/// authoritative id is the one inside the metadata file, see
/// [`VersionMetadata::id`](crate::models::VersionMetadata).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionDirectory {
    version_id: String,
    jar: Utf8PathBuf,
    json: Utf8PathBuf,
}

impl VersionDirectory {
    pub(crate) fn from_validated_files(
        version_id: String,
        jar: Utf8PathBuf,
        json: Utf8PathBuf,
    ) -> Self {
        Self {
            version_id,
            jar,
            json,
        }
    }

    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    pub fn jar(&self) -> &Utf8Path {
        &self.jar
    }

    pub fn json(&self) -> &Utf8Path {
        &self.json
    }

    /// Whether both files are still present on disk.
    pub fn is_valid(&self) -> bool {
        self.jar.is_file() && self.json.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_file_paths() {
        let root = InstallationRoot::from_validated_paths(
            "/mc".into(),
            "/mc/libraries".into(),
            "/mc/saves".into(),
            "/mc/versions".into(),
            "/mc/launcher_profiles.json".into(),
        );

        let (jar, json) = root.version_file_paths("1.12.2");
        assert_eq!(jar, Utf8PathBuf::from("/mc/versions/1.12.2/1.12.2.jar"));
        assert_eq!(json, Utf8PathBuf::from("/mc/versions/1.12.2/1.12.2.json"));
    }
}
