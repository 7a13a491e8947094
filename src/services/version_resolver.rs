use crate::error::{LauncherError, LauncherResult};
use crate::models::{InstallationRoot, ResolvedProfile, VersionDirectory, VersionMetadata};
use crate::services::installation::{
    resolve_version_directory, resolve_version_directory_from_files,
};
use camino::Utf8PathBuf;
use std::fs;
use std::sync::Arc;

/// Read and parse a version's metadata file.
///
/// The returned id is authoritative. It can differ from the directory the
/// file was found in (renamed or hand-copied versions), so callers must use
/// [`VersionMetadata::id`] from here on rather than their lookup key.
pub fn resolve_version(directory: &VersionDirectory) -> LauncherResult<VersionMetadata> {
    let path = directory.json();
    let contents = fs::read_to_string(path).map_err(|e| LauncherError::io(path, e))?;
    let metadata: VersionMetadata =
        serde_json::from_str(&contents).map_err(|e| LauncherError::parse(path, e))?;

    if metadata.id() != directory.version_id() {
        tracing::debug!(
            "Version directory '{}' declares id '{}'",
            directory.version_id(),
            metadata.id()
        );
    }

    Ok(metadata)
}

/// Assemble a resolved profile. Pure construction.
///
/// `game_dir` defaults to the installation root.
pub fn build_resolved_profile(
    installation: Arc<InstallationRoot>,
    profile_name: impl Into<String>,
    game_dir: Option<Utf8PathBuf>,
    directory: VersionDirectory,
    metadata: VersionMetadata,
) -> ResolvedProfile {
    let game_dir = game_dir.unwrap_or_else(|| installation.root().to_path_buf());
    ResolvedProfile::new(
        installation,
        profile_name.into(),
        game_dir,
        directory,
        metadata,
    )
}

/// Resolve an installed version by id without going through the profile list.
pub fn new_resolved_profile(
    installation: &Arc<InstallationRoot>,
    version_id: &str,
) -> LauncherResult<ResolvedProfile> {
    let directory = resolve_version_directory(installation, version_id)?;
    let metadata = resolve_version(&directory)?;
    let name = metadata.id().to_string();
    Ok(build_resolved_profile(
        Arc::clone(installation),
        name,
        None,
        directory,
        metadata,
    ))
}

/// Resolve an explicit jar/json pair against an installation.
pub fn new_resolved_profile_from_files(
    installation: &Arc<InstallationRoot>,
    jar: impl Into<Utf8PathBuf>,
    json: impl Into<Utf8PathBuf>,
) -> LauncherResult<ResolvedProfile> {
    let directory = resolve_version_directory_from_files(jar, json)?;
    let metadata = resolve_version(&directory)?;
    let name = metadata.id().to_string();
    Ok(build_resolved_profile(
        Arc::clone(installation),
        name,
        None,
        directory,
        metadata,
    ))
}
