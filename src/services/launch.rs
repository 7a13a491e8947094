use crate::error::{LauncherError, LauncherResult};
use crate::models::ResolvedProfile;
use crate::services::profile_resolution::ensure_unmodded;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Handle to a successfully loaded profile, handed to the application once.
#[derive(Debug, Clone)]
pub struct RunningProfile {
    profile: ResolvedProfile,
    started_at: DateTime<Utc>,
}

impl RunningProfile {
    pub fn new(profile: ResolvedProfile) -> Self {
        Self {
            profile,
            started_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> &ResolvedProfile {
        &self.profile
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Builds a running instance from a resolved profile.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileRunner: Send + Sync {
    fn run(&self, profile: &ResolvedProfile) -> LauncherResult<RunningProfile>;
}

/// Runner for the local installation.
///
/// Checks that the resolved files are still where resolution found them
/// before handing out a [`RunningProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProfileRunner;

impl ProfileRunner for LocalProfileRunner {
    fn run(&self, profile: &ResolvedProfile) -> LauncherResult<RunningProfile> {
        let directory = profile.version_directory();
        if !directory.is_valid() {
            return Err(LauncherError::LaunchConstructionFailed(format!(
                "version files for '{}' disappeared from {}",
                profile.version_id(),
                directory.json().parent().unwrap_or(directory.json())
            )));
        }

        if !profile.game_dir().is_dir() {
            return Err(LauncherError::LaunchConstructionFailed(format!(
                "game directory {} does not exist",
                profile.game_dir()
            )));
        }

        Ok(RunningProfile::new(profile.clone()))
    }
}

/// The load step: modded guard, then the runner.
///
/// The guard runs against the authoritative version id, so a rejected
/// profile never reaches `runner`.
pub fn load_profile(
    profile: &ResolvedProfile,
    runner: &dyn ProfileRunner,
) -> LauncherResult<RunningProfile> {
    tracing::info!(
        "Using launcher profile '{}' with version '{}'",
        profile.profile_name(),
        profile.version_id()
    );

    if let Err(e) = ensure_unmodded(profile.version_id()) {
        tracing::error!("{}", e);
        return Err(e);
    }

    // A panicking runner is a failed launch, so the profile can be retried.
    let result = panic::catch_unwind(AssertUnwindSafe(|| runner.run(profile))).unwrap_or_else(
        |payload| {
            Err(LauncherError::LaunchConstructionFailed(format!(
                "runner panicked: {}",
                panic_message(payload.as_ref())
            )))
        },
    );

    result.inspect_err(|e| {
        tracing::error!("Loading profile '{}' failed: {}", profile.profile_name(), e);
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
