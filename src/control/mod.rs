//! Control module - The single-threaded control path and its collaborators.
//!
//! # Architecture
//!
//! ```text
//!  control thread                              tokio runtime
//!  ──────────────                              ─────────────
//!  ControlLoop<ProfileSelection>
//!    ├─ ProfileSelection::new ── run ────────▶  resolve_profile (async)
//!    ├─ ProfileSelection::load ─ run_blocking ▶ load_profile (blocking pool)
//!    │                                              │
//!    └─ pump / run_next ◀──── completion channel ◀──┘
//!         └─ ProfileLifecycle transition
//!              └─ LauncherShell::repaint / display_error / display_main_window
//! ```
//!
//! Lifecycle state is only touched by completions and triggers running on the
//! control thread, so it needs no locking. Results, including failures, travel
//! back as values inside the completion.

pub mod executor;
pub mod selection;
pub mod shell;

pub use executor::{ControlLoop, WorkerExecutor};
pub use selection::ProfileSelection;
pub use shell::{HeadlessShell, LauncherShell};
