use camino::{Utf8Path, Utf8PathBuf};

/// A world directory under `saves/` (or anywhere else the user points at).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDirectory {
    root: Utf8PathBuf,
    level_dat: Utf8PathBuf,
}

impl SaveDirectory {
    pub(crate) fn new(root: Utf8PathBuf) -> Self {
        let level_dat = root.join("level.dat");
        Self { root, level_dat }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn level_dat(&self) -> &Utf8Path {
        &self.level_dat
    }
}

/// The fields of `level.dat` this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelData {
    pub level_name: Option<String>,
    pub seed: i64,
    pub spawn_x: i32,
    pub spawn_z: i32,
    pub generator_name: Option<String>,
}

/// An opened world: its directory plus the parsed level data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveGame {
    directory: SaveDirectory,
    level_data: LevelData,
}

impl SaveGame {
    pub(crate) fn new(directory: SaveDirectory, level_data: LevelData) -> Self {
        Self {
            directory,
            level_data,
        }
    }

    pub fn directory(&self) -> &SaveDirectory {
        &self.directory
    }

    pub fn level_data(&self) -> &LevelData {
        &self.level_data
    }

    pub fn seed(&self) -> i64 {
        self.level_data.seed
    }
}
