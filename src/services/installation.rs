//! Installation discovery and the directory conventions of a `.minecraft` folder.
//!
//! This module turns paths into validated handles:
//! - [`open_installation`] finds the installation root (explicit hints first,
//!   then the platform default) and checks the four required subpaths
//! - [`list_profiles`] reads `launcher_profiles.json` into [`UnresolvedProfile`]s
//! - [`resolve_version_directory`] / [`resolve_version_directory_from_files`]
//!   locate the metadata/artifact pair of a version
//! - [`open_save`] opens a world directory and parses its `level.dat`
//!
//! All functions here do blocking filesystem I/O and must only run as
//! background work, never on the control loop.

use crate::error::{LauncherError, LauncherResult};
use crate::models::installation::PROFILES_FILE_NAME;
use crate::models::{
    InstallationRoot, LauncherProfilesJson, SaveDirectory, SaveGame, UnresolvedProfile,
    VersionDirectory,
};
use crate::services::level_dat;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::Arc;

/// Optional overrides for each location of an installation.
///
/// Any field left `None` is derived from the root, and the root itself from
/// [`default_installation_root`] when not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationHints {
    pub root: Option<Utf8PathBuf>,
    pub libraries: Option<Utf8PathBuf>,
    pub saves: Option<Utf8PathBuf>,
    pub versions: Option<Utf8PathBuf>,
    pub profiles_file: Option<Utf8PathBuf>,
}

impl InstallationHints {
    pub fn with_root(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }
}

/// Platform default location of the `.minecraft` directory.
///
/// - Windows: `%APPDATA%\.minecraft`
/// - macOS: `~/Library/Application Support/minecraft`
/// - everything else: `~/.minecraft`
pub fn default_installation_root() -> Option<Utf8PathBuf> {
    let dir = if cfg!(target_os = "windows") {
        dirs::data_dir().map(|data| data.join(".minecraft"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().map(|data| data.join("minecraft"))
    } else {
        dirs::home_dir().map(|home| home.join(".minecraft"))
    }?;

    Utf8PathBuf::from_path_buf(dir).ok()
}

/// Open an installation, applying `hints` over the default layout.
///
/// # Errors
///
/// [`LauncherError::InstallationNotFound`] naming the root, or the first of
/// the four required subpaths that does not exist.
pub fn open_installation(hints: &InstallationHints) -> LauncherResult<InstallationRoot> {
    let root = match hints.root.clone().or_else(default_installation_root) {
        Some(root) => root,
        None => {
            return Err(LauncherError::InstallationNotFound {
                path: Utf8PathBuf::from(".minecraft"),
            });
        }
    };

    if !root.is_dir() {
        return Err(LauncherError::InstallationNotFound { path: root });
    }

    let libraries = hints
        .libraries
        .clone()
        .unwrap_or_else(|| root.join("libraries"));
    let saves = hints.saves.clone().unwrap_or_else(|| root.join("saves"));
    let versions = hints
        .versions
        .clone()
        .unwrap_or_else(|| root.join("versions"));
    let profiles_file = hints
        .profiles_file
        .clone()
        .unwrap_or_else(|| root.join(PROFILES_FILE_NAME));

    let installation = validated(root, libraries, saves, versions, profiles_file)?;
    tracing::info!(
        "Using Minecraft installation at: {}",
        installation.root()
    );
    Ok(installation)
}

/// Build an installation from four explicit locations.
///
/// Relative locations are made absolute first. The root is taken to be the
/// parent of `versions`.
pub fn new_custom_installation(
    libraries: impl Into<Utf8PathBuf>,
    saves: impl Into<Utf8PathBuf>,
    versions: impl Into<Utf8PathBuf>,
    profiles_file: impl Into<Utf8PathBuf>,
) -> LauncherResult<InstallationRoot> {
    let versions = absolute(versions.into())?;
    let root = versions
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| versions.clone());

    let installation = validated(
        root,
        absolute(libraries.into())?,
        absolute(saves.into())?,
        versions,
        absolute(profiles_file.into())?,
    )?;
    tracing::info!(
        "Using custom Minecraft installation at: {}",
        installation.root()
    );
    Ok(installation)
}

fn absolute(path: Utf8PathBuf) -> LauncherResult<Utf8PathBuf> {
    path.canonicalize_utf8()
        .map_err(|_| LauncherError::InstallationNotFound { path })
}

fn validated(
    root: Utf8PathBuf,
    libraries: Utf8PathBuf,
    saves: Utf8PathBuf,
    versions: Utf8PathBuf,
    profiles_file: Utf8PathBuf,
) -> LauncherResult<InstallationRoot> {
    for dir in [&root, &libraries, &saves, &versions] {
        if !dir.is_dir() {
            return Err(LauncherError::InstallationNotFound { path: dir.clone() });
        }
    }
    if !profiles_file.is_file() {
        return Err(LauncherError::InstallationNotFound {
            path: profiles_file,
        });
    }

    Ok(InstallationRoot::from_validated_paths(
        root,
        libraries,
        saves,
        versions,
        profiles_file,
    ))
}

/// Read the profile list of an installation, in file order.
///
/// # Errors
///
/// - [`LauncherError::Io`] if the file cannot be read
/// - [`LauncherError::Parse`] if it is not a valid profile list
pub fn list_profiles(installation: &Arc<InstallationRoot>) -> LauncherResult<Vec<UnresolvedProfile>> {
    let path = installation.profiles_file();
    let contents = fs::read_to_string(path).map_err(|e| LauncherError::io(path, e))?;
    let parsed: LauncherProfilesJson =
        serde_json::from_str(&contents).map_err(|e| LauncherError::parse(path, e))?;

    let profiles: Vec<_> = parsed
        .profiles
        .iter()
        .map(|(id, entry)| UnresolvedProfile::new(id.clone(), entry, Arc::clone(installation)))
        .collect();

    tracing::info!("Read {} launcher profiles from {}", profiles.len(), path);
    Ok(profiles)
}

/// Locate `versions/<id>/<id>.{jar,json}`.
///
/// # Errors
///
/// [`LauncherError::VersionNotFound`] naming whichever file is missing, or
/// the versions directory itself when the id is not a single path component.
pub fn resolve_version_directory(
    installation: &InstallationRoot,
    version_id: &str,
) -> LauncherResult<VersionDirectory> {
    if !is_plain_version_id(version_id) {
        tracing::warn!("Rejecting version id {:?}: not a plain directory name", version_id);
        return Err(LauncherError::VersionNotFound {
            version: version_id.to_string(),
            path: installation.versions().to_path_buf(),
        });
    }

    let (jar, json) = installation.version_file_paths(version_id);
    checked_version_directory(version_id.to_string(), jar, json)
}

/// Use an explicit jar/json pair, bypassing the directory convention.
///
/// The lookup key is the json file stem.
pub fn resolve_version_directory_from_files(
    jar: impl Into<Utf8PathBuf>,
    json: impl Into<Utf8PathBuf>,
) -> LauncherResult<VersionDirectory> {
    let json = json.into();
    let version_id = json.file_stem().unwrap_or_default().to_string();
    checked_version_directory(version_id, jar.into(), json)
}

// Ids name a directory directly under `versions/`.
fn is_plain_version_id(version_id: &str) -> bool {
    !version_id.is_empty()
        && version_id != "."
        && version_id != ".."
        && !version_id.contains(['/', '\\'])
}

fn checked_version_directory(
    version_id: String,
    jar: Utf8PathBuf,
    json: Utf8PathBuf,
) -> LauncherResult<VersionDirectory> {
    for file in [&json, &jar] {
        if !file.is_file() {
            tracing::debug!("Version {} is missing {}", version_id, file);
            return Err(LauncherError::VersionNotFound {
                version: version_id,
                path: file.clone(),
            });
        }
    }

    Ok(VersionDirectory::from_validated_files(version_id, jar, json))
}

/// Open a world directory and parse its `level.dat`.
///
/// # Errors
///
/// - [`LauncherError::Io`] if the directory or `level.dat` is missing or unreadable
/// - [`LauncherError::Parse`] if `level.dat` is not valid NBT
pub fn open_save(location: impl Into<Utf8PathBuf>) -> LauncherResult<SaveGame> {
    let location = location.into();
    if !location.is_dir() {
        return Err(LauncherError::io(
            location.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "save directory not found"),
        ));
    }

    let directory = SaveDirectory::new(location);
    let bytes =
        fs::read(directory.level_dat()).map_err(|e| LauncherError::io(directory.level_dat(), e))?;
    let level_data = level_dat::parse_level_dat(&bytes)
        .map_err(|e| LauncherError::parse(directory.level_dat(), e))?;

    tracing::info!(
        "Opened save {} (seed {})",
        directory.root(),
        level_data.seed
    );
    Ok(SaveGame::new(directory, level_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap()
    }

    fn create_installation(root: &Utf8Path) {
        for dir in ["libraries", "saves", "versions"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join(PROFILES_FILE_NAME), r#"{"profiles": {}}"#).unwrap();
    }

    #[test]
    fn test_open_installation_with_root_hint() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        create_installation(&root);

        let installation = open_installation(&InstallationHints::with_root(&root)).unwrap();
        assert_eq!(installation.root(), root);
        assert_eq!(installation.versions(), root.join("versions"));
        assert_eq!(installation.profiles_file(), root.join(PROFILES_FILE_NAME));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = utf8(&temp).join("nope");

        let err = open_installation(&InstallationHints::with_root(&missing)).unwrap_err();
        assert!(matches!(err, LauncherError::InstallationNotFound { path } if path == missing));
    }

    #[test]
    fn test_missing_subpath_is_not_found() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        create_installation(&root);
        fs::remove_dir(root.join("saves")).unwrap();

        let err = open_installation(&InstallationHints::with_root(&root)).unwrap_err();
        assert!(
            matches!(err, LauncherError::InstallationNotFound { path } if path == root.join("saves"))
        );
    }

    #[test]
    fn test_override_replaces_single_subpath() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        create_installation(&root);
        let elsewhere = root.join("other-saves");
        fs::create_dir_all(&elsewhere).unwrap();

        let hints = InstallationHints {
            root: Some(root.clone()),
            saves: Some(elsewhere.clone()),
            ..InstallationHints::default()
        };
        let installation = open_installation(&hints).unwrap();
        assert_eq!(installation.saves(), elsewhere);
        assert_eq!(installation.libraries(), root.join("libraries"));
    }

    #[test]
    fn test_version_directory_from_files_uses_json_stem() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        let jar = root.join("client.jar");
        let json = root.join("my-version.json");
        fs::write(&jar, b"jar").unwrap();
        fs::write(&json, b"{}").unwrap();

        let directory = resolve_version_directory_from_files(&jar, &json).unwrap();
        assert_eq!(directory.version_id(), "my-version");
        assert_eq!(directory.jar(), jar);
    }

    #[test]
    fn test_open_save_without_directory() {
        let temp = TempDir::new().unwrap();
        let err = open_save(utf8(&temp).join("World1")).unwrap_err();
        assert!(matches!(err, LauncherError::Io { .. }));
    }
}
