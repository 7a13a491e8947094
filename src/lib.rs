// mc-profiles - Locate, resolve and launch Minecraft launcher profiles
//
// This is the library crate containing the installation model, the profile
// lifecycle and the control loop that drives it. The binary crate (main.rs)
// provides a headless entry point.

pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use control::{ControlLoop, HeadlessShell, LauncherShell, ProfileSelection, WorkerExecutor};
pub use error::{LauncherError, LauncherResult};
pub use metrics::Metrics;
pub use models::{InstallationRoot, LauncherConfig, ResolvedProfile, UnresolvedProfile};
pub use state::{LifecycleError, PhaseChange, ProfileLifecycle, ProfilePhase, ProfileStatus};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
