// ProfileSelection - Drives every profile lifecycle from the control thread
//
// It handles:
// - Scheduling resolution of each listed profile at construction
// - Load triggers, guarded by the lifecycle state machine
// - Turning completions into phase changes, repaints, dialogs and the hand-off

use crate::control::executor::WorkerExecutor;
use crate::control::shell::LauncherShell;
use crate::error::LauncherError;
use crate::metrics::Metrics;
use crate::models::{ResolvedProfile, UnresolvedProfile};
use crate::services::{ProfileRunner, RunningProfile, VersionListSource, load_profile, resolve_profile};
use crate::state::{LifecycleError, PhaseChange, ProfileLifecycle};
use std::sync::Arc;
use std::time::Instant;

/// The control context of a profile selection screen.
///
/// Lives inside a [`ControlLoop`](crate::control::ControlLoop); every method
/// runs on the control thread and never blocks.
///
/// # Example
/// ```ignore
/// let mut control = ControlLoop::new(runtime.handle().clone(), |executor| {
///     ProfileSelection::new(profiles, version_list, runner, HeadlessShell::new(), metrics, executor)
/// });
/// control.run_until_idle();
/// control.with_context(|selection, executor| selection.load_by_name("Vanilla", executor))?;
/// control.run_until_idle();
/// ```
pub struct ProfileSelection<S: LauncherShell> {
    lifecycles: Vec<ProfileLifecycle>,
    version_list: Arc<dyn VersionListSource>,
    runner: Arc<dyn ProfileRunner>,
    shell: S,
    metrics: Arc<Metrics>,
}

impl<S: LauncherShell + 'static> ProfileSelection<S> {
    /// Wrap each profile in a lifecycle and schedule its resolution.
    pub fn new(
        profiles: Vec<UnresolvedProfile>,
        version_list: Arc<dyn VersionListSource>,
        runner: Arc<dyn ProfileRunner>,
        shell: S,
        metrics: Arc<Metrics>,
        executor: &WorkerExecutor<Self>,
    ) -> Self {
        let lifecycles = profiles
            .into_iter()
            .enumerate()
            .map(|(index, profile)| ProfileLifecycle::new(index, profile))
            .collect();

        let mut selection = Self {
            lifecycles,
            version_list,
            runner,
            shell,
            metrics,
        };

        for index in 0..selection.lifecycles.len() {
            selection.schedule_resolve(index, executor);
        }

        tracing::info!(
            "Profile selection initialized with {} profiles",
            selection.lifecycles.len()
        );
        selection
    }

    pub fn lifecycles(&self) -> &[ProfileLifecycle] {
        &self.lifecycles
    }

    pub fn lifecycle(&self, index: usize) -> Option<&ProfileLifecycle> {
        self.lifecycles.get(index)
    }

    /// First lifecycle whose profile has this display name.
    pub fn find(&self, name: &str) -> Option<&ProfileLifecycle> {
        self.lifecycles.iter().find(|l| l.profile_name() == name)
    }

    /// Lifecycles that reached `Running`.
    pub fn running(&self) -> impl Iterator<Item = &ProfileLifecycle> {
        self.lifecycles.iter().filter(|l| l.is_running())
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    /// True once no lifecycle is resolving or loading.
    pub fn is_settled(&self) -> bool {
        self.lifecycles
            .iter()
            .all(|l| !l.is_resolving() && !l.is_loading())
    }

    /// Load trigger for the profile at `index`.
    ///
    /// Only accepted while the profile is ready to load; the work itself is
    /// scheduled on the blocking pool.
    pub fn load(
        &mut self,
        index: usize,
        executor: &WorkerExecutor<Self>,
    ) -> Result<(), LifecycleError> {
        let lifecycle = self
            .lifecycles
            .get_mut(index)
            .ok_or_else(|| LifecycleError::UnknownProfile(format!("#{index}")))?;

        let (profile, change) = lifecycle.begin_load().inspect_err(|e| {
            tracing::warn!("Load rejected: {}", e);
        })?;
        self.notify(&change);

        let runner = Arc::clone(&self.runner);
        executor.run_blocking(
            move || load_profile(&profile, runner.as_ref()),
            move |selection: &mut Self, result, _| selection.on_loaded(index, result),
        );
        Ok(())
    }

    /// Load trigger by display name.
    pub fn load_by_name(
        &mut self,
        name: &str,
        executor: &WorkerExecutor<Self>,
    ) -> Result<(), LifecycleError> {
        let index = self
            .lifecycles
            .iter()
            .position(|l| l.profile_name() == name)
            .ok_or_else(|| LifecycleError::UnknownProfile(name.to_string()))?;
        self.load(index, executor)
    }

    fn schedule_resolve(&mut self, index: usize, executor: &WorkerExecutor<Self>) {
        let (profile, change) = match self.lifecycles[index].begin_resolve() {
            Ok(started) => started,
            Err(e) => {
                tracing::warn!("{}", e);
                return;
            }
        };
        self.notify(&change);

        let version_list = Arc::clone(&self.version_list);
        let started = Instant::now();
        executor.run(
            async move {
                // Spawned separately so a panicking version list still
                // settles this profile as ResolveFailed.
                tokio::spawn(async move { resolve_profile(&profile, version_list.as_ref()).await })
                    .await
                    .unwrap_or_else(|e| {
                        Err(LauncherError::VersionListUnavailable(format!(
                            "resolution did not complete: {e}"
                        )))
                    })
            },
            move |selection: &mut Self, result, _| selection.on_resolved(index, result, started),
        );
    }

    fn on_resolved(
        &mut self,
        index: usize,
        result: Result<ResolvedProfile, LauncherError>,
        started: Instant,
    ) {
        self.metrics.record_resolve(result.is_ok(), started.elapsed());

        let lifecycle = &mut self.lifecycles[index];
        if let Err(e) = &result {
            tracing::warn!("Resolving profile '{}' failed: {}", lifecycle.profile_name(), e);
        }

        match lifecycle.finish_resolve(result) {
            Ok(change) => self.notify(&change),
            Err(e) => tracing::error!("Dropped resolve result: {}", e),
        }
    }

    fn on_loaded(&mut self, index: usize, result: Result<RunningProfile, LauncherError>) {
        let dialog = match &result {
            Ok(_) => {
                self.metrics.record_load_succeeded();
                None
            }
            Err(e) => {
                self.metrics.record_load_failed();
                if matches!(e, LauncherError::UnsupportedModdedProfile(_)) {
                    self.metrics.record_modded_rejection();
                }
                e.needs_dialog().then(|| e.to_string())
            }
        };

        let (change, running) = match self.lifecycles[index].finish_load(result) {
            Ok(finished) => finished,
            Err(e) => {
                tracing::error!("Dropped load result: {}", e);
                return;
            }
        };
        self.notify(&change);

        if let Some(message) = dialog {
            self.shell.display_error("Unable to load profile", &message);
        }
        // Running is terminal, so this fires at most once per lifecycle.
        if let Some(running) = running {
            self.shell.display_main_window(running);
        }
    }

    fn notify(&mut self, change: &PhaseChange) {
        self.metrics.record_repaint();
        self.shell.repaint(change);
    }
}
