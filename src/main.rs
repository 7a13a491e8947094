//! mc-profiles - Locate, resolve and launch Minecraft launcher profiles
//!
//! Main entry point for the headless application.
//!
//! # Overview
//!
//! The binary initializes:
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (4 worker threads for version list and disk I/O)
//! - Configuration loading ([`ConfigManager`])
//! - A [`ControlLoop`] around a [`ProfileSelection`] with a [`HeadlessShell`]
//!
//! The application uses a hybrid threading model:
//! - **Main thread**: The control loop; owns every profile lifecycle
//! - **Tokio workers**: Resolve and load work, reporting back over a channel
//!
//! # Execution Flow
//!
//! 1. Load `Launcher Config.yaml` from the config directory (first argument,
//!    default `mc-profiles Data/`)
//! 2. Initialize logging → logs/mc-profiles.<date>
//! 3. Create tokio runtime with 4 worker threads
//! 4. Open the installation and list its profiles
//! 5. Resolve every profile, print one status line per profile
//! 6. Load the configured `selected_profile`, if any
//! 7. Log metrics and shut the runtime down with a 5s timeout

use anyhow::{Context, Result};
use mc_profiles::services::{
    LocalProfileRunner, RemoteOrLocalVersionList, list_profiles, open_installation,
};
use mc_profiles::{
    APP_NAME, ConfigManager, ControlLoop, HeadlessShell, Metrics, ProfileSelection, VERSION,
};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_DIR: &str = "mc-profiles Data";

fn main() -> Result<()> {
    let config_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());

    let config_manager = ConfigManager::new(config_dir.as_str())?;
    let config = config_manager.load_launcher_config()?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = mc_profiles::logging::setup_logging_with_console(
        "logs",
        APP_NAME,
        config.launcher.debug_mode,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("mc-profiles-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    // Startup reads happen here, before the control loop exists. From the
    // first resolve onwards this thread only runs completions.
    let installation = Arc::new(
        open_installation(&config.installation_hints())
            .context("Failed to open Minecraft installation")?,
    );
    let profiles = list_profiles(&installation).context("Failed to list launcher profiles")?;
    tracing::info!("Found {} launcher profiles", profiles.len());

    let version_list = Arc::new(RemoteOrLocalVersionList::from_config(&config)?);
    let metrics = Arc::new(Metrics::new());

    let mut control = ControlLoop::new(runtime.handle().clone(), |executor| {
        ProfileSelection::new(
            profiles,
            version_list,
            Arc::new(LocalProfileRunner),
            HeadlessShell::new(),
            Arc::clone(&metrics),
            executor,
        )
    });
    control.run_until_idle();

    for lifecycle in control.context().lifecycles() {
        match (lifecycle.version_name(), lifecycle.last_error()) {
            (_, Some(error)) => println!(
                "{:<32} {:<16} {}",
                lifecycle.profile_name(),
                lifecycle.status(),
                error
            ),
            (Some(version), None) => println!(
                "{:<32} {:<16} {}",
                lifecycle.profile_name(),
                lifecycle.status(),
                version
            ),
            (None, None) => println!("{:<32} {}", lifecycle.profile_name(), lifecycle.status()),
        }
    }

    if let Some(name) = config.launcher.selected_profile.as_deref() {
        match control.with_context(|selection, executor| selection.load_by_name(name, executor)) {
            Ok(()) => control.run_until_idle(),
            Err(e) => tracing::error!("Cannot load selected profile: {}", e),
        }

        match control.context().shell().running() {
            Some(running) => println!(
                "Running '{}' ({})",
                running.profile().profile_name(),
                running.profile().version_id()
            ),
            None => println!("Profile '{}' was not started", name),
        }
    }

    metrics.log_summary();

    runtime.shutdown_timeout(Duration::from_secs(5));

    tracing::info!("Application shutdown complete");
    Ok(())
}
