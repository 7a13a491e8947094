// LauncherShell - The presentation side of profile selection
//
// ProfileSelection reports every phase change, the hand-off and error dialogs
// through this trait. HeadlessShell backs the binary and broadcasts changes.

use crate::services::RunningProfile;
use crate::state::PhaseChange;
use tokio::sync::broadcast;

/// Whatever presents profile status to the user.
///
/// All methods are called on the control thread.
pub trait LauncherShell {
    /// A lifecycle changed phase. Called on every transition, failures included.
    fn repaint(&mut self, change: &PhaseChange);

    /// Hand-off point for a profile that reached `Running`.
    fn display_main_window(&mut self, running: RunningProfile);

    /// Modal error message (modded profile rejection, launch failure).
    fn display_error(&mut self, title: &str, message: &str);
}

/// A shell without a window: phase changes are broadcast to subscribers and
/// errors go to the log.
pub struct HeadlessShell {
    change_tx: broadcast::Sender<PhaseChange>,
    running: Option<RunningProfile>,
    errors: Vec<(String, String)>,
    repaints: usize,
}

impl HeadlessShell {
    pub fn new() -> Self {
        // Capacity of 256 is plenty for status observers
        let (change_tx, _) = broadcast::channel(256);
        Self {
            change_tx,
            running: None,
            errors: Vec::new(),
            repaints: 0,
        }
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> broadcast::Receiver<PhaseChange> {
        self.change_tx.subscribe()
    }

    /// The profile handed off through `display_main_window`, if any.
    pub fn running(&self) -> Option<&RunningProfile> {
        self.running.as_ref()
    }

    pub fn take_running(&mut self) -> Option<RunningProfile> {
        self.running.take()
    }

    /// `(title, message)` of every error shown so far.
    pub fn errors(&self) -> &[(String, String)] {
        &self.errors
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints
    }
}

impl Default for HeadlessShell {
    fn default() -> Self {
        Self::new()
    }
}

impl LauncherShell for HeadlessShell {
    fn repaint(&mut self, change: &PhaseChange) {
        self.repaints += 1;
        // No subscribers is fine
        let _ = self.change_tx.send(change.clone());
    }

    fn display_main_window(&mut self, running: RunningProfile) {
        tracing::info!(
            "Profile '{}' is running version '{}' (started {})",
            running.profile().profile_name(),
            running.profile().version_id(),
            running.started_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        self.running = Some(running);
    }

    fn display_error(&mut self, title: &str, message: &str) {
        tracing::error!("{}: {}", title, message);
        self.errors.push((title.to_string(), message.to_string()));
    }
}
