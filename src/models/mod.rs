//! Data models for mc-profiles.
//!
//! This module contains the plain data structures the services and the
//! lifecycle pass around:
//! - [`InstallationRoot`] / [`VersionDirectory`]: validated paths into a Minecraft installation
//! - [`UnresolvedProfile`] / [`ResolvedProfile`]: a launcher profile before and after version lookup
//! - [`VersionMetadata`] / [`VersionList`]: parsed `<version>.json` and Mojang's version manifest
//! - [`SaveGame`]: a world directory plus its parsed `level.dat`
//! - [`LauncherConfig`]: settings loaded from `Launcher Config.yaml`
//!
//! # Architecture Note
//!
//! Models carry no I/O. Everything that touches the filesystem or the network
//! lives in [`crate::services`]; path-bearing types can only be built there, so
//! holding one means its files were checked to exist.

pub mod config;
pub mod installation;
pub mod profile;
pub mod save;
pub mod version;

pub use config::{InstallationSettings, LauncherConfig, LauncherSettings, VersionListSettings};
pub use installation::{InstallationRoot, VersionDirectory};
pub use profile::{
    LauncherProfilesJson, ProfileEntry, ResolvedProfile, UnresolvedProfile, VersionAlias,
    VersionReference,
};
pub use save::{LevelData, SaveDirectory, SaveGame};
pub use version::{VersionList, VersionMetadata};
