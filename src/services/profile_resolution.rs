use crate::error::{LauncherError, LauncherResult};
use crate::models::{ResolvedProfile, UnresolvedProfile, VersionReference};
use crate::services::installation::resolve_version_directory;
use crate::services::version_list::VersionListSource;
use crate::services::version_resolver::{build_resolved_profile, resolve_version};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static MODDED_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)optifine|forge").expect("Invalid modded version regex"));

/// Turn a listed profile into a [`ResolvedProfile`].
///
/// Aliases are looked up in `version_list` first; a concrete id skips that
/// step. The directory lookup and metadata parse run on the blocking pool.
/// This does network and disk I/O and must only run as background work.
pub async fn resolve_profile(
    profile: &UnresolvedProfile,
    version_list: &dyn VersionListSource,
) -> LauncherResult<ResolvedProfile> {
    let version_id = match profile.version() {
        VersionReference::Concrete(id) => id.clone(),
        VersionReference::Alias(alias) => {
            let id = version_list.latest(*alias).await?;
            tracing::debug!(
                "Profile '{}': {} is version '{}'",
                profile.name(),
                alias,
                id
            );
            id
        }
    };

    let installation = Arc::clone(profile.installation());
    let name = profile.name().to_string();
    let game_dir = profile.game_dir().map(|dir| dir.to_path_buf());
    let versions_dir = installation.versions().to_path_buf();

    let resolved = tokio::task::spawn_blocking(move || -> LauncherResult<ResolvedProfile> {
        let directory = resolve_version_directory(&installation, &version_id)?;
        let metadata = resolve_version(&directory)?;
        Ok(build_resolved_profile(
            installation,
            name,
            game_dir,
            directory,
            metadata,
        ))
    })
    .await
    .map_err(|e| LauncherError::io(versions_dir, std::io::Error::other(e)))??;

    tracing::info!(
        "Resolved profile '{}' to version '{}'",
        resolved.profile_name(),
        resolved.version_id()
    );
    Ok(resolved)
}

/// Whether a version id looks like a Forge or OptiFine install.
pub fn is_modded_version(version_id: &str) -> bool {
    MODDED_VERSION_PATTERN.is_match(version_id)
}

/// Refuse modded versions before anything is launched.
///
/// # Errors
///
/// [`LauncherError::UnsupportedModdedProfile`] if the id contains `forge` or
/// `optifine` in any letter case.
pub fn ensure_unmodded(version_id: &str) -> LauncherResult<()> {
    if is_modded_version(version_id) {
        return Err(LauncherError::UnsupportedModdedProfile(
            version_id.to_string(),
        ));
    }
    Ok(())
}
