use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::StateConfig;
use crate::error::CuratorResult;

/// Persistence for the run marker and the posted-URL history.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Date (`YYYY-MM-DD`) of the last completed run, if any.
    async fn load_marker(&self) -> CuratorResult<Option<String>>;
    async fn save_marker(&self, date: &str) -> CuratorResult<()>;
    async fn load_history(&self) -> CuratorResult<Vec<String>>;
    /// Replaces the stored history wholesale.
    async fn save_history(&self, urls: &[String]) -> CuratorResult<()>;
}

/// Flat files: the marker holds one date, the history one URL per line.
pub struct FileStateStore {
    marker_path: PathBuf,
    history_path: PathBuf,
}

impl FileStateStore {
    pub fn new(marker_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            marker_path: marker_path.into(),
            history_path: history_path.into(),
        }
    }

    pub fn from_config(config: &StateConfig) -> Self {
        Self::new(&config.marker_path, &config.posted_path)
    }

    async fn read_optional(path: &Path) -> CuratorResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load_marker(&self) -> CuratorResult<Option<String>> {
        let content = Self::read_optional(&self.marker_path).await?;
        Ok(content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()))
    }

    async fn save_marker(&self, date: &str) -> CuratorResult<()> {
        tokio::fs::write(&self.marker_path, date).await?;
        Ok(())
    }

    async fn load_history(&self) -> CuratorResult<Vec<String>> {
        let content = Self::read_optional(&self.history_path).await?;
        Ok(content
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn save_history(&self, urls: &[String]) -> CuratorResult<()> {
        let mut content = String::new();
        for url in urls {
            content.push_str(url);
            content.push('\n');
        }
        tokio::fs::write(&self.history_path, content).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStateStore {
    marker: Mutex<Option<String>>,
    history: Mutex<Vec<String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(marker: Option<&str>, history: Vec<String>) -> Self {
        Self {
            marker: Mutex::new(marker.map(str::to_string)),
            history: Mutex::new(history),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load_marker(&self) -> CuratorResult<Option<String>> {
        Ok(self.marker.lock().await.clone())
    }

    async fn save_marker(&self, date: &str) -> CuratorResult<()> {
        *self.marker.lock().await = Some(date.to_string());
        Ok(())
    }

    async fn load_history(&self) -> CuratorResult<Vec<String>> {
        Ok(self.history.lock().await.clone())
    }

    async fn save_history(&self, urls: &[String]) -> CuratorResult<()> {
        *self.history.lock().await = urls.to_vec();
        Ok(())
    }
}
