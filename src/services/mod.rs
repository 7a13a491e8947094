//! Services module - Filesystem and network logic for installations and profiles.
//!
//! This module contains everything that performs I/O on behalf of the profile
//! lifecycle. The services are **framework-agnostic**: they know nothing about
//! the control loop or whoever displays status, and take all inputs as
//! explicit parameters.
//!
//! # Components
//!
//! - [`installation`]: Opening a `.minecraft` directory (or a custom layout),
//!   reading `launcher_profiles.json`, locating version directories and saves
//! - [`version_resolver`]: Parsing `<version>.json` and assembling [`ResolvedProfile`](crate::models::ResolvedProfile)s
//! - [`version_list`]: Alias lookup against Mojang's manifest with a local fallback
//! - [`profile_resolution`]: The full resolve step for one profile, plus the
//!   modded-version guard
//! - [`launch`]: The load step and the [`ProfileRunner`] seam
//! - [`level_dat`]: A small NBT reader for `level.dat`
//!
//! # Threading
//!
//! Every function here may block on disk or network. They are called from
//! background work scheduled through [`WorkerExecutor`](crate::control::WorkerExecutor),
//! never from the control loop itself.

pub mod installation;
pub mod launch;
pub mod level_dat;
pub mod profile_resolution;
pub mod version_list;
pub mod version_resolver;

pub use installation::{
    InstallationHints, default_installation_root, list_profiles, new_custom_installation,
    open_installation, open_save, resolve_version_directory, resolve_version_directory_from_files,
};
pub use launch::{LocalProfileRunner, ProfileRunner, RunningProfile, load_profile};
pub use profile_resolution::{ensure_unmodded, is_modded_version, resolve_profile};
pub use version_list::{RemoteOrLocalVersionList, StaticVersionList, VersionListSource};
pub use version_resolver::{
    build_resolved_profile, new_resolved_profile, new_resolved_profile_from_files,
    resolve_version,
};
