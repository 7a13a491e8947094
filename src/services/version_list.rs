//! Version list providers: turn `latest-release` / `latest-snapshot` into a concrete id.
//!
//! [`RemoteOrLocalVersionList`] downloads Mojang's manifest and keeps a local
//! copy; when the download fails the copy is used instead. The list is
//! fetched at most once per provider, so any number of profiles resolving at
//! the same time share a single request.

use crate::error::{LauncherError, LauncherResult};
use crate::models::{LauncherConfig, VersionAlias, VersionList};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::time::Duration;
use tokio::sync::OnceCell;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Something that can map a version alias to a concrete version id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionListSource: Send + Sync {
    async fn latest(&self, alias: VersionAlias) -> LauncherResult<String>;
}

/// Remote manifest with a cached local fallback.
pub struct RemoteOrLocalVersionList {
    client: reqwest::Client,
    remote_url: String,
    cache_file: Option<Utf8PathBuf>,
    list: OnceCell<VersionList>,
}

impl RemoteOrLocalVersionList {
    pub fn new(
        remote_url: impl Into<String>,
        cache_file: Option<Utf8PathBuf>,
        timeout: Duration,
    ) -> LauncherResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LauncherError::VersionListUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            remote_url: remote_url.into(),
            cache_file,
            list: OnceCell::new(),
        })
    }

    pub fn from_config(config: &LauncherConfig) -> LauncherResult<Self> {
        let settings = &config.launcher.version_list;
        Self::new(
            settings.remote_url.clone(),
            config.version_list_cache_file(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// The version list, fetching it on first use.
    pub async fn version_list(&self) -> LauncherResult<&VersionList> {
        self.list.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> LauncherResult<VersionList> {
        match self.fetch_remote().await {
            Ok(list) => {
                tracing::info!(
                    "Loaded {} versions from remote version list",
                    list.versions.len()
                );
                self.write_cache(&list).await;
                Ok(list)
            }
            Err(remote_err) => {
                tracing::warn!(
                    "Unable to fetch remote version list ({}), trying local copy",
                    remote_err
                );
                self.read_cache().await.map_err(|local_err| {
                    LauncherError::VersionListUnavailable(format!(
                        "remote: {remote_err}; local: {local_err}"
                    ))
                })
            }
        }
    }

    async fn fetch_remote(&self) -> Result<VersionList, reqwest::Error> {
        self.client
            .get(&self.remote_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn read_cache(&self) -> LauncherResult<VersionList> {
        let path = self.cache_file.as_ref().ok_or_else(|| {
            LauncherError::VersionListUnavailable("no local version list configured".to_string())
        })?;

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        let list: VersionList =
            serde_json::from_str(&contents).map_err(|e| LauncherError::parse(path, e))?;

        tracing::info!("Loaded version list from local copy {}", path);
        Ok(list)
    }

    async fn write_cache(&self, list: &VersionList) {
        let Some(path) = self.cache_file.as_ref() else {
            return;
        };

        let result = async {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let json = serde_json::to_vec(list).map_err(std::io::Error::other)?;
            tokio::fs::write(path, json).await
        }
        .await;

        // A stale cache only matters when offline, so this is not fatal.
        if let Err(e) = result {
            tracing::warn!("Failed to write version list cache {}: {}", path, e);
        }
    }
}

#[async_trait]
impl VersionListSource for RemoteOrLocalVersionList {
    async fn latest(&self, alias: VersionAlias) -> LauncherResult<String> {
        let list = self.version_list().await?;
        list.latest(alias)
            .map(String::from)
            .ok_or_else(|| LauncherError::UnknownAlias(alias.to_string()))
    }
}

/// A version list that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticVersionList {
    list: VersionList,
}

impl StaticVersionList {
    pub fn new(list: VersionList) -> Self {
        Self { list }
    }

    pub fn with_latest(release: impl Into<String>, snapshot: impl Into<String>) -> Self {
        let mut list = VersionList::default();
        list.latest.release = release.into();
        list.latest.snapshot = snapshot.into();
        Self { list }
    }
}

#[async_trait]
impl VersionListSource for StaticVersionList {
    async fn latest(&self, alias: VersionAlias) -> LauncherResult<String> {
        self.list
            .latest(alias)
            .map(String::from)
            .ok_or_else(|| LauncherError::UnknownAlias(alias.to_string()))
    }
}
