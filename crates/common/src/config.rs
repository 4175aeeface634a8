use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::error::{CuratorError, CuratorResult};

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
pub struct FeedlyConfig {
    pub baseurl: String,
    pub token: String,
    #[serde(default)]
    pub streams: HashMap<String, String>,
    #[serde(default = "default_channel")]
    pub stream: String,
    #[serde(default = "default_time_delta")]
    pub time_delta: i64,
    #[serde(default = "default_feed_count")]
    pub count: u32,
}

impl FeedlyConfig {
    pub fn require_stream(&self) -> CuratorResult<&String> {
        self.streams.get(&self.stream).ok_or_else(|| {
            CuratorError::Config(format!("feedly stream '{}' is not configured", self.stream))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickyUrls {
    pub api_url: String,
    pub login_url: Option<String>,
    pub content_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickyConfig {
    /// Accepted as a JSON string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub siteid: String,
    pub sitekey: String,
    pub urls: ClickyUrls,
    pub username: Option<String>,
    pub pw: Option<String>,
    #[serde(default = "default_clicky_date")]
    pub date: String,
    #[serde(default = "default_clicky_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BufferConfig {
    pub baseurl: String,
    pub access_token: String,
    #[serde(default)]
    pub profiles: HashMap<String, String>,
    #[serde(default = "default_channel")]
    pub profile: String,
}

impl BufferConfig {
    pub fn require_profile(&self, name: &str) -> CuratorResult<&String> {
        self.profiles
            .get(name)
            .ok_or_else(|| CuratorError::UnknownProfile(name.to_string()))
    }
}

/// Number of articles to take from each source per run.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ArticleCounts {
    pub feedly: usize,
    pub clicky: usize,
}

impl ArticleCounts {
    pub fn total(&self) -> usize {
        self.feedly + self.clicky
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_posted_path")]
    pub posted_path: PathBuf,
    #[serde(default = "default_marker_path")]
    pub marker_path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            posted_path: default_posted_path(),
            marker_path: default_marker_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feedly: FeedlyConfig,
    pub clicky: ClickyConfig,
    pub buffer: BufferConfig,
    pub posting_hours: Vec<u8>,
    pub articles: ArticleCounts,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default = "default_post_delay_secs")]
    pub post_delay_secs: u64,
}

impl Config {
    /// Reads the JSON file named by `CURATOR_CONFIG` (or `config.json`) and
    /// applies secret overrides from the environment. `.env` is loaded by the
    /// binary before this is called.
    pub fn from_env() -> Result<Self> {
        let path = env::var("CURATOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;

        if let Ok(token) = env::var("FEEDLY_TOKEN") {
            config.feedly.token = token;
        }
        if let Ok(sitekey) = env::var("CLICKY_SITEKEY") {
            config.clicky.sitekey = sitekey;
        }
        if let Ok(access_token) = env::var("BUFFER_ACCESS_TOKEN") {
            config.buffer.access_token = access_token;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CuratorResult<()> {
        if let Some(hour) = self.posting_hours.iter().find(|h| **h > 23) {
            return Err(CuratorError::Config(format!(
                "posting hour {} is outside 0..=23",
                hour
            )));
        }
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SiteId {
        Text(String),
        Number(u64),
    }

    Ok(match SiteId::deserialize(deserializer)? {
        SiteId::Text(id) => id,
        SiteId::Number(id) => id.to_string(),
    })
}

fn default_channel() -> String {
    "twitter".to_string()
}

fn default_time_delta() -> i64 {
    1
}

fn default_feed_count() -> u32 {
    100
}

fn default_clicky_date() -> String {
    "today".to_string()
}

fn default_clicky_limit() -> u32 {
    50
}

fn default_posted_path() -> PathBuf {
    PathBuf::from("posted.txt")
}

fn default_marker_path() -> PathBuf {
    PathBuf::from("done_today.txt")
}

fn default_post_delay_secs() -> u64 {
    1
}

#[cfg(test)]
pub(crate) const SAMPLE_CONFIG: &str = r#"{
    "feedly": {
        "baseurl": "https://cloud.feedly.com/v3",
        "token": "feedly-token",
        "streams": {"twitter": "user/abc/category/tech"}
    },
    "clicky": {
        "siteid": "101",
        "sitekey": "clicky-key",
        "urls": {"api_url": "https://api.clicky.com/api/stats/4"}
    },
    "buffer": {
        "baseurl": "https://api.bufferapp.com/1/",
        "access_token": "buffer-token",
        "profiles": {"twitter": "5f00aa", "linkedin": "5f00bb"}
    },
    "posting_hours": [9, 14, 20],
    "articles": {"feedly": 2, "clicky": 1}
}"#;
