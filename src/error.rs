// Error types shared by the installation model, resolver and lifecycle.
//
// Everything below the binary returns `LauncherResult<T>`; failures raised in
// background work are carried back to the control loop as values.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Central error type for installation discovery, profile resolution and launch.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── Installation ────────────────────────────────────
    #[error("Minecraft installation not found: {path}")]
    InstallationNotFound { path: Utf8PathBuf },

    #[error("Version not found: {version} (missing {path})")]
    VersionNotFound { version: String, path: Utf8PathBuf },

    // ── Parsing ─────────────────────────────────────────
    #[error("Failed to parse {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    // ── Version list ────────────────────────────────────
    #[error("Version list unavailable: {0}")]
    VersionListUnavailable(String),

    #[error("Version list has no entry for alias '{0}'")]
    UnknownAlias(String),

    // ── Launch ──────────────────────────────────────────
    #[error(
        "Modded Minecraft profiles are not supported (version '{0}'). Please select or create an unmodded profile via the Minecraft Launcher."
    )]
    UnsupportedModdedProfile(String),

    #[error("Failed to construct a running profile: {0}")]
    LaunchConstructionFailed(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<Utf8PathBuf>, message: impl ToString) -> Self {
        LauncherError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this failure should additionally be shown in an error dialog.
    ///
    /// Only the policy rejection and launch construction failures are
    /// surfaced that way; everything else is reported through phase status.
    pub fn needs_dialog(&self) -> bool {
        matches!(
            self,
            LauncherError::UnsupportedModdedProfile(_) | LauncherError::LaunchConstructionFailed(_)
        )
    }
}
