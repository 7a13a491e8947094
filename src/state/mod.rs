// Profile state module
//
// This module provides ProfileLifecycle, the per-profile state machine, and the
// PhaseChange events emitted on every transition so status displays can follow.

use crate::error::LauncherError;
use crate::models::{ResolvedProfile, UnresolvedProfile};
use crate::services::RunningProfile;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where a profile currently is in its resolve/load workflow.
///
/// ```text
/// Unresolved -> Resolving -> ResolveFailed
///                         -> Resolved -> Loading -> Running
///                                                -> LoadFailed -> Loading ...
/// ```
///
/// Failure and progress are separate variants, so "loading" and "failed
/// loading" can never both hold for the same attempt.
#[derive(Debug, Clone)]
pub enum ProfilePhase {
    Unresolved,
    Resolving,
    ResolveFailed {
        error: Arc<LauncherError>,
    },
    Resolved {
        profile: ResolvedProfile,
    },
    Loading {
        profile: ResolvedProfile,
    },
    /// The last load attempt failed; the resolved profile is kept for a retry.
    LoadFailed {
        profile: ResolvedProfile,
        error: Arc<LauncherError>,
    },
    Running {
        profile: ResolvedProfile,
    },
}

/// Data-free summary of a [`ProfilePhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileStatus {
    Unresolved,
    Resolving,
    ResolveFailed,
    Resolved,
    Loading,
    LoadFailed,
    Running,
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProfileStatus::Unresolved => "unresolved",
            ProfileStatus::Resolving => "resolving",
            ProfileStatus::ResolveFailed => "failed resolving",
            ProfileStatus::Resolved => "ready to load",
            ProfileStatus::Loading => "loading",
            ProfileStatus::LoadFailed => "failed loading",
            ProfileStatus::Running => "running",
        };
        f.pad(text)
    }
}

impl ProfilePhase {
    pub fn status(&self) -> ProfileStatus {
        match self {
            ProfilePhase::Unresolved => ProfileStatus::Unresolved,
            ProfilePhase::Resolving => ProfileStatus::Resolving,
            ProfilePhase::ResolveFailed { .. } => ProfileStatus::ResolveFailed,
            ProfilePhase::Resolved { .. } => ProfileStatus::Resolved,
            ProfilePhase::Loading { .. } => ProfileStatus::Loading,
            ProfilePhase::LoadFailed { .. } => ProfileStatus::LoadFailed,
            ProfilePhase::Running { .. } => ProfileStatus::Running,
        }
    }

    fn resolved_profile(&self) -> Option<&ResolvedProfile> {
        match self {
            ProfilePhase::Resolved { profile }
            | ProfilePhase::Loading { profile }
            | ProfilePhase::LoadFailed { profile, .. }
            | ProfilePhase::Running { profile } => Some(profile),
            _ => None,
        }
    }

    fn error(&self) -> Option<&Arc<LauncherError>> {
        match self {
            ProfilePhase::ResolveFailed { error } | ProfilePhase::LoadFailed { error, .. } => {
                Some(error)
            }
            _ => None,
        }
    }
}

/// Emitted on every phase transition (the repaint notification).
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseChange {
    /// Position of the profile in the selection.
    pub index: usize,
    pub profile_name: String,
    pub from: ProfileStatus,
    pub to: ProfileStatus,
    /// Authoritative version id, once resolved.
    pub version_id: Option<String>,
    pub error: Option<String>,
}

/// A transition was requested from a phase that does not allow it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {action} profile '{profile}' while it is {status}")]
    InvalidTransition {
        profile: String,
        action: &'static str,
        status: ProfileStatus,
    },

    #[error("no profile named '{0}'")]
    UnknownProfile(String),
}

/// The resolve/load state machine of one launcher profile.
///
/// Transitions are driven from the control loop only; the background work
/// they start lives in [`crate::control::ProfileSelection`]. Each transition
/// method returns the [`PhaseChange`] that must be forwarded as a repaint.
#[derive(Debug)]
pub struct ProfileLifecycle {
    index: usize,
    unresolved: UnresolvedProfile,
    phase: ProfilePhase,
}

impl ProfileLifecycle {
    pub fn new(index: usize, unresolved: UnresolvedProfile) -> Self {
        Self {
            index,
            unresolved,
            phase: ProfilePhase::Unresolved,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn unresolved(&self) -> &UnresolvedProfile {
        &self.unresolved
    }

    pub fn phase(&self) -> &ProfilePhase {
        &self.phase
    }

    pub fn status(&self) -> ProfileStatus {
        self.phase.status()
    }

    pub fn profile_name(&self) -> &str {
        self.unresolved.name()
    }

    /// The resolved version id, or `None` until the profile is ready to load.
    pub fn version_name(&self) -> Option<&str> {
        self.phase.resolved_profile().map(ResolvedProfile::version_id)
    }

    pub fn resolved_profile(&self) -> Option<&ResolvedProfile> {
        self.phase.resolved_profile()
    }

    pub fn last_error(&self) -> Option<&LauncherError> {
        self.phase.error().map(|e| e.as_ref())
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, ProfilePhase::Resolving)
    }

    pub fn failed_resolving(&self) -> bool {
        matches!(self.phase, ProfilePhase::ResolveFailed { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ProfilePhase::Loading { .. })
    }

    pub fn failed_loading(&self) -> bool {
        matches!(self.phase, ProfilePhase::LoadFailed { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ProfilePhase::Running { .. })
    }

    /// Whether a load may be triggered now.
    pub fn is_ready_to_load(&self) -> bool {
        matches!(
            self.phase,
            ProfilePhase::Resolved { .. } | ProfilePhase::LoadFailed { .. }
        )
    }

    /// Unresolved -> Resolving. Returns the profile to hand to the resolve work.
    pub fn begin_resolve(&mut self) -> Result<(UnresolvedProfile, PhaseChange), LifecycleError> {
        if !matches!(self.phase, ProfilePhase::Unresolved) {
            return Err(self.invalid("resolve"));
        }
        let change = self.transition(ProfilePhase::Resolving);
        Ok((self.unresolved.clone(), change))
    }

    /// Resolving -> Resolved | ResolveFailed.
    pub fn finish_resolve(
        &mut self,
        result: Result<ResolvedProfile, LauncherError>,
    ) -> Result<PhaseChange, LifecycleError> {
        if !self.is_resolving() {
            return Err(self.invalid("finish resolving"));
        }
        let next = match result {
            Ok(profile) => ProfilePhase::Resolved { profile },
            Err(error) => ProfilePhase::ResolveFailed {
                error: Arc::new(error),
            },
        };
        Ok(self.transition(next))
    }

    /// Resolved | LoadFailed -> Loading. Returns the profile to hand to the load work.
    pub fn begin_load(&mut self) -> Result<(ResolvedProfile, PhaseChange), LifecycleError> {
        let profile = match &self.phase {
            ProfilePhase::Resolved { profile } | ProfilePhase::LoadFailed { profile, .. } => {
                profile.clone()
            }
            _ => return Err(self.invalid("load")),
        };
        let change = self.transition(ProfilePhase::Loading {
            profile: profile.clone(),
        });
        Ok((profile, change))
    }

    /// Loading -> Running | LoadFailed.
    pub fn finish_load(
        &mut self,
        result: Result<RunningProfile, LauncherError>,
    ) -> Result<(PhaseChange, Option<RunningProfile>), LifecycleError> {
        let ProfilePhase::Loading { profile } = &self.phase else {
            return Err(self.invalid("finish loading"));
        };
        let profile = profile.clone();

        match result {
            Ok(running) => {
                let change = self.transition(ProfilePhase::Running { profile });
                Ok((change, Some(running)))
            }
            Err(error) => {
                let change = self.transition(ProfilePhase::LoadFailed {
                    profile,
                    error: Arc::new(error),
                });
                Ok((change, None))
            }
        }
    }

    fn transition(&mut self, next: ProfilePhase) -> PhaseChange {
        let from = self.phase.status();
        self.phase = next;
        let change = PhaseChange {
            index: self.index,
            profile_name: self.profile_name().to_string(),
            from,
            to: self.phase.status(),
            version_id: self.version_name().map(String::from),
            error: self.last_error().map(ToString::to_string),
        };
        tracing::debug!(
            "Profile '{}': {} -> {}",
            change.profile_name,
            change.from,
            change.to
        );
        change
    }

    fn invalid(&self, action: &'static str) -> LifecycleError {
        LifecycleError::InvalidTransition {
            profile: self.profile_name().to_string(),
            action,
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstallationRoot, ProfileEntry, VersionDirectory, VersionMetadata};
    use crate::services::build_resolved_profile;

    fn installation() -> Arc<InstallationRoot> {
        Arc::new(InstallationRoot::from_validated_paths(
            "/mc".into(),
            "/mc/libraries".into(),
            "/mc/saves".into(),
            "/mc/versions".into(),
            "/mc/launcher_profiles.json".into(),
        ))
    }

    fn lifecycle() -> ProfileLifecycle {
        let entry = ProfileEntry {
            name: Some("Vanilla".to_string()),
            last_version_id: Some("1.12.2".to_string()),
            ..ProfileEntry::default()
        };
        ProfileLifecycle::new(0, UnresolvedProfile::new("vanilla", &entry, installation()))
    }

    fn resolved(id: &str) -> ResolvedProfile {
        let metadata: VersionMetadata =
            serde_json::from_str(&format!(r#"{{"id": "{id}"}}"#)).unwrap();
        let directory = VersionDirectory::from_validated_files(
            id.to_string(),
            format!("/mc/versions/{id}/{id}.jar").into(),
            format!("/mc/versions/{id}/{id}.json").into(),
        );
        build_resolved_profile(installation(), "Vanilla", None, directory, metadata)
    }

    fn assert_flags_exclusive(lifecycle: &ProfileLifecycle) {
        assert!(!(lifecycle.is_resolving() && lifecycle.failed_resolving()));
        assert!(!(lifecycle.is_loading() && lifecycle.failed_loading()));
    }

    #[test]
    fn test_resolve_success_path() {
        let mut lifecycle = lifecycle();
        assert_eq!(lifecycle.status(), ProfileStatus::Unresolved);
        assert_eq!(lifecycle.version_name(), None);

        let (_, change) = lifecycle.begin_resolve().unwrap();
        assert_eq!(change.from, ProfileStatus::Unresolved);
        assert_eq!(change.to, ProfileStatus::Resolving);
        assert!(lifecycle.is_resolving());
        assert_flags_exclusive(&lifecycle);

        let change = lifecycle.finish_resolve(Ok(resolved("1.12.2"))).unwrap();
        assert_eq!(change.to, ProfileStatus::Resolved);
        assert_eq!(change.version_id.as_deref(), Some("1.12.2"));
        assert!(lifecycle.is_ready_to_load());
        assert_eq!(lifecycle.version_name(), Some("1.12.2"));
    }

    #[test]
    fn test_resolve_failure_is_terminal() {
        let mut lifecycle = lifecycle();
        lifecycle.begin_resolve().unwrap();

        let change = lifecycle
            .finish_resolve(Err(LauncherError::UnknownAlias("latest-release".into())))
            .unwrap();
        assert_eq!(change.to, ProfileStatus::ResolveFailed);
        assert!(change.error.is_some());
        assert!(lifecycle.failed_resolving());
        assert!(!lifecycle.is_resolving());
        assert!(!lifecycle.is_ready_to_load());

        assert!(lifecycle.begin_resolve().is_err());
        assert!(matches!(
            lifecycle.begin_load(),
            Err(LifecycleError::InvalidTransition {
                status: ProfileStatus::ResolveFailed,
                ..
            })
        ));
    }

    #[test]
    fn test_load_rejected_before_resolved() {
        let mut lifecycle = lifecycle();
        assert!(lifecycle.begin_load().is_err());

        lifecycle.begin_resolve().unwrap();
        assert!(matches!(
            lifecycle.begin_load(),
            Err(LifecycleError::InvalidTransition {
                action: "load",
                status: ProfileStatus::Resolving,
                ..
            })
        ));
        assert!(lifecycle.is_resolving());
    }

    #[test]
    fn test_load_failure_allows_retry() {
        let mut lifecycle = lifecycle();
        lifecycle.begin_resolve().unwrap();
        lifecycle.finish_resolve(Ok(resolved("1.12.2"))).unwrap();

        lifecycle.begin_load().unwrap();
        assert!(lifecycle.is_loading());
        assert!(lifecycle.begin_load().is_err());

        let (change, running) = lifecycle
            .finish_load(Err(LauncherError::LaunchConstructionFailed("x".into())))
            .unwrap();
        assert!(running.is_none());
        assert_eq!(change.to, ProfileStatus::LoadFailed);
        assert!(lifecycle.failed_loading());
        assert!(!lifecycle.is_loading());
        assert_flags_exclusive(&lifecycle);

        let (profile, change) = lifecycle.begin_load().unwrap();
        assert_eq!(profile.version_id(), "1.12.2");
        assert_eq!(change.from, ProfileStatus::LoadFailed);
        assert!(!lifecycle.failed_loading());
    }

    #[test]
    fn test_running_is_terminal() {
        let mut lifecycle = lifecycle();
        lifecycle.begin_resolve().unwrap();
        lifecycle.finish_resolve(Ok(resolved("1.12.2"))).unwrap();
        let (profile, _) = lifecycle.begin_load().unwrap();

        let (change, running) = lifecycle
            .finish_load(Ok(RunningProfile::new(profile)))
            .unwrap();
        assert_eq!(change.to, ProfileStatus::Running);
        assert!(running.is_some());
        assert!(lifecycle.is_running());
        assert!(lifecycle.begin_load().is_err());
        assert!(lifecycle.finish_load(Err(LauncherError::UnknownAlias("x".into()))).is_err());
    }
}
