//! Integration tests for installation discovery
//!
//! These tests build throwaway `.minecraft` layouts and verify:
//! - Opening installations from a root or from explicit locations
//! - Reading `launcher_profiles.json` (order, aliases, name fallbacks)
//! - Resolving version directories and direct profile creation
//! - Opening save games and parsing `level.dat`

use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use mc_profiles::LauncherError;
use mc_profiles::models::{InstallationRoot, VersionAlias, VersionReference};
use mc_profiles::services::{
    InstallationHints, LocalProfileRunner, list_profiles, load_profile, new_custom_installation,
    new_resolved_profile, new_resolved_profile_from_files, open_installation, open_save,
    resolve_version_directory,
};
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

fn root_of(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap()
}

fn create_installation(root: &Utf8Path, profiles_json: &str) -> Arc<InstallationRoot> {
    for dir in ["libraries", "saves", "versions"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    fs::write(root.join("launcher_profiles.json"), profiles_json).unwrap();
    Arc::new(open_installation(&InstallationHints::with_root(root)).unwrap())
}

fn install_version(root: &Utf8Path, dir_name: &str, json_id: &str) {
    let dir = root.join("versions").join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{dir_name}.json")),
        format!(r#"{{"id": "{json_id}", "type": "release", "mainClass": "net.minecraft.client.main.Main"}}"#),
    )
    .unwrap();
    fs::write(dir.join(format!("{dir_name}.jar")), b"PK\x03\x04").unwrap();
}

fn named(out: &mut Vec<u8>, tag_type: u8, name: &str) {
    out.push(tag_type);
    out.extend_from_slice(&(name.len() as u16).to_be_bytes());
    out.extend_from_slice(name.as_bytes());
}

fn write_level_dat(save_dir: &Utf8Path, seed: i64, generator: &str) {
    let mut raw = Vec::new();
    named(&mut raw, 10, "");
    named(&mut raw, 10, "Data");
    named(&mut raw, 4, "RandomSeed");
    raw.extend_from_slice(&seed.to_be_bytes());
    named(&mut raw, 3, "SpawnX");
    raw.extend_from_slice(&8i32.to_be_bytes());
    named(&mut raw, 3, "SpawnZ");
    raw.extend_from_slice(&(-16i32).to_be_bytes());
    named(&mut raw, 8, "generatorName");
    raw.extend_from_slice(&(generator.len() as u16).to_be_bytes());
    raw.extend_from_slice(generator.as_bytes());
    raw.push(0);
    raw.push(0);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    fs::create_dir_all(save_dir).unwrap();
    fs::write(save_dir.join("level.dat"), encoder.finish().unwrap()).unwrap();
}

#[test]
fn test_profiles_keep_file_order_and_interpret_versions() {
    let temp = TempDir::new().unwrap();
    let installation = create_installation(
        &root_of(&temp),
        r#"{
            "profiles": {
                "zeta": {"name": "Zeta", "lastVersionId": "1.12.2", "type": "custom"},
                "alpha": {"name": "", "type": "latest-release"},
                "snap": {"lastVersionId": "latest-snapshot", "gameDir": "/worlds/snap"},
                "bare": {}
            },
            "settings": {"enableSnapshots": true}
        }"#,
    );

    let profiles = list_profiles(&installation).unwrap();
    let ids: Vec<&str> = profiles.iter().map(|p| p.id()).collect();
    assert_eq!(ids, ["zeta", "alpha", "snap", "bare"]);

    assert_eq!(profiles[0].name(), "Zeta");
    assert_eq!(
        profiles[0].version(),
        &VersionReference::Concrete("1.12.2".to_string())
    );

    assert_eq!(
        profiles[1].version(),
        &VersionReference::Alias(VersionAlias::LatestRelease)
    );
    assert_eq!(profiles[1].name(), "Latest release");

    assert_eq!(
        profiles[2].version(),
        &VersionReference::Alias(VersionAlias::LatestSnapshot)
    );
    assert_eq!(profiles[2].game_dir(), Some(Utf8Path::new("/worlds/snap")));

    assert_eq!(
        profiles[3].version(),
        &VersionReference::Alias(VersionAlias::LatestRelease)
    );
}

#[test]
fn test_invalid_profile_list_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let installation = create_installation(&root_of(&temp), "{ not json");

    let err = list_profiles(&installation).unwrap_err();
    assert!(
        matches!(&err, LauncherError::Parse { path, .. } if path.ends_with("launcher_profiles.json")),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_profiles_file_removed_after_open_is_io_error() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    fs::remove_file(root.join("launcher_profiles.json")).unwrap();

    let err = list_profiles(&installation).unwrap_err();
    assert!(matches!(err, LauncherError::Io { .. }));
}

#[test]
fn test_custom_installation_from_explicit_locations() {
    let temp = TempDir::new().unwrap();
    let base = root_of(&temp).canonicalize_utf8().unwrap();
    let game = base.join("game");
    for dir in ["shared-libraries", "worlds"] {
        fs::create_dir_all(base.join(dir)).unwrap();
    }
    fs::create_dir_all(game.join("versions")).unwrap();
    fs::write(base.join("profiles.json"), r#"{"profiles": {}}"#).unwrap();

    let installation = new_custom_installation(
        base.join("shared-libraries"),
        base.join("worlds"),
        game.join("versions"),
        base.join("profiles.json"),
    )
    .unwrap();

    assert_eq!(installation.root(), game);
    assert_eq!(installation.saves(), base.join("worlds"));
    assert_eq!(installation.profiles_file(), base.join("profiles.json"));
}

#[test]
fn test_custom_installation_from_relative_locations_can_load() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp).canonicalize_utf8().unwrap();
    create_installation(&root, r#"{"profiles": {}}"#);
    install_version(&root, "1.20.1", "1.20.1");

    // The only test in this binary that depends on the working directory.
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&root).unwrap();
    let installation = new_custom_installation(
        "libraries",
        "saves",
        "versions",
        "launcher_profiles.json",
    );
    std::env::set_current_dir(previous).unwrap();

    let installation = Arc::new(installation.unwrap());
    assert_eq!(installation.root(), root);
    assert_eq!(installation.versions(), root.join("versions"));
    assert!(installation.profiles_file().is_absolute());

    let profile = new_resolved_profile(&installation, "1.20.1").unwrap();
    assert_eq!(profile.game_dir(), root);

    let running = load_profile(&profile, &LocalProfileRunner).unwrap();
    assert_eq!(running.profile().version_id(), "1.20.1");
}

#[test]
fn test_custom_installation_missing_location() {
    let temp = TempDir::new().unwrap();
    let base = root_of(&temp);
    fs::create_dir_all(base.join("versions")).unwrap();

    let err = new_custom_installation(
        base.join("libraries"),
        base.join("saves"),
        base.join("versions"),
        base.join("launcher_profiles.json"),
    )
    .unwrap_err();
    assert!(matches!(err, LauncherError::InstallationNotFound { .. }));
}

#[test]
fn test_version_directory_requires_both_files() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    install_version(&root, "1.20.1", "1.20.1");
    fs::remove_file(root.join("versions/1.20.1/1.20.1.jar")).unwrap();

    let err = resolve_version_directory(&installation, "1.20.1").unwrap_err();
    assert!(matches!(
        err,
        LauncherError::VersionNotFound { version, path } if version == "1.20.1" && path.as_str().ends_with(".jar")
    ));

    let err = resolve_version_directory(&installation, "1.8.9").unwrap_err();
    assert!(matches!(err, LauncherError::VersionNotFound { .. }));
}

#[test]
fn test_version_id_cannot_leave_versions_directory() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    // A complete version layout one level above versions/
    fs::create_dir_all(root.join("escape")).unwrap();
    fs::write(root.join("escape/escape.json"), r#"{"id": "escape"}"#).unwrap();
    fs::write(root.join("escape/escape.jar"), b"PK").unwrap();

    for id in ["../escape", "..", ".", "", "a\\b", "1.20.1/../../escape"] {
        let err = resolve_version_directory(&installation, id).unwrap_err();
        assert!(
            matches!(&err, LauncherError::VersionNotFound { version, path } if version == id && path == installation.versions()),
            "{id:?} gave {err:?}"
        );
    }
}

#[test]
fn test_direct_profile_creation_uses_metadata_id() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    install_version(&root, "my-copy", "1.12.2");

    let profile = new_resolved_profile(&installation, "my-copy").unwrap();
    assert_eq!(profile.version_id(), "1.12.2");
    assert_eq!(profile.version_directory().version_id(), "my-copy");
    assert_eq!(profile.game_dir(), root);
    assert_eq!(
        profile.metadata().main_class.as_deref(),
        Some("net.minecraft.client.main.Main")
    );

    let from_files = new_resolved_profile_from_files(
        &installation,
        root.join("versions/my-copy/my-copy.jar"),
        root.join("versions/my-copy/my-copy.json"),
    )
    .unwrap();
    assert_eq!(from_files.version_id(), "1.12.2");
}

#[test]
fn test_invalid_version_metadata_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    install_version(&root, "broken", "broken");
    fs::write(root.join("versions/broken/broken.json"), r#"{"type": "release"}"#).unwrap();

    let err = new_resolved_profile(&installation, "broken").unwrap_err();
    assert!(matches!(err, LauncherError::Parse { .. }));
}

#[test]
fn test_open_save_reads_level_dat() {
    let temp = TempDir::new().unwrap();
    let root = root_of(&temp);
    let installation = create_installation(&root, r#"{"profiles": {}}"#);
    let world = installation.saves().join("New World");
    write_level_dat(&world, 1_234_567_890_123, "default");

    let save = open_save(&world).unwrap();
    assert_eq!(save.seed(), 1_234_567_890_123);
    assert_eq!(save.level_data().spawn_x, 8);
    assert_eq!(save.level_data().spawn_z, -16);
    assert_eq!(save.level_data().generator_name.as_deref(), Some("default"));
    assert_eq!(save.directory().root(), world);
}

#[test]
fn test_open_save_without_level_dat() {
    let temp = TempDir::new().unwrap();
    let world = root_of(&temp).join("empty-world");
    fs::create_dir_all(&world).unwrap();

    let err = open_save(&world).unwrap_err();
    assert!(
        matches!(&err, LauncherError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    );
}

#[test]
fn test_open_save_with_corrupt_level_dat() {
    let temp = TempDir::new().unwrap();
    let world = root_of(&temp).join("corrupt");
    fs::create_dir_all(&world).unwrap();
    fs::write(world.join("level.dat"), b"\x1f\x8b\x08garbage").unwrap();

    let err = open_save(&world).unwrap_err();
    assert!(matches!(err, LauncherError::Parse { .. }));
}
