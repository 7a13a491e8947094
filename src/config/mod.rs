use crate::models::LauncherConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the launcher configuration inside the config directory.
pub const LAUNCHER_CONFIG_FILE: &str = "Launcher Config.yaml";

/// Prefix of environment variables that override configuration values.
///
/// Nested keys are separated by a double underscore, for example
/// `MC_PROFILES_LAUNCHER__DEBUG_MODE=true` or
/// `MC_PROFILES_LAUNCHER__INSTALLATION__ROOT=/games/.minecraft`.
pub const ENV_PREFIX: &str = "MC_PROFILES";

/// Configuration manager for loading and saving the YAML launcher configuration.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    launcher_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            launcher_config_path: config_dir.join(LAUNCHER_CONFIG_FILE),
            config_dir,
        })
    }

    /// Load the launcher configuration.
    ///
    /// The YAML file is optional; environment overrides are layered on top
    /// and defaults fill in everything else.
    pub fn load_launcher_config(&self) -> Result<LauncherConfig> {
        if !self.launcher_config_path.exists() {
            tracing::warn!(
                "Launcher config file not found at {}, using defaults",
                self.launcher_config_path
            );
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::new(self.launcher_config_path.as_str(), ::config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| {
                format!(
                    "Failed to read launcher config: {}",
                    self.launcher_config_path
                )
            })?;

        let config: LauncherConfig = settings.try_deserialize().with_context(|| {
            format!(
                "Failed to parse launcher config: {}",
                self.launcher_config_path
            )
        })?;

        tracing::info!("Loaded launcher config from {}", self.launcher_config_path);
        Ok(config)
    }

    /// Save the launcher configuration file.
    pub fn save_launcher_config(&self, config: &LauncherConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize launcher config to YAML")?;

        fs::write(&self.launcher_config_path, yaml_string).with_context(|| {
            format!(
                "Failed to write launcher config: {}",
                self.launcher_config_path
            )
        })?;

        tracing::info!("Saved launcher config to {}", self.launcher_config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn launcher_config_path(&self) -> &Utf8Path {
        &self.launcher_config_path
    }
}
