use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CuratorError, CuratorResult};
use crate::models::Candidate;

/// A ranked list of candidate articles from one upstream.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch(&self) -> CuratorResult<Vec<Candidate>>;
    fn name(&self) -> &'static str;
}

/// Which connected account(s) a post goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileTarget {
    Single(String),
    Many(Vec<String>),
}

impl ProfileTarget {
    pub fn single(name: impl Into<String>) -> Self {
        ProfileTarget::Single(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledTime {
    Now,
    /// Epoch seconds; must be a positive 10-digit value.
    At(i64),
    /// Free-form time expressions such as "tomorrow 9am".
    Expression(String),
}

impl ScheduledTime {
    pub fn validate(&self) -> CuratorResult<()> {
        match self {
            ScheduledTime::Now => Ok(()),
            ScheduledTime::At(ts) if (1_000_000_000..=9_999_999_999).contains(ts) => Ok(()),
            ScheduledTime::At(ts) => Err(CuratorError::InvalidTimestamp(*ts)),
            ScheduledTime::Expression(_) => Err(CuratorError::NotImplemented(
                "scheduled time must be an epoch timestamp".to_string(),
            )),
        }
    }
}

/// Response of the scheduling API for one created update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[async_trait]
pub trait PostScheduler: Send + Sync {
    async fn schedule(
        &self,
        text: &str,
        profile: &ProfileTarget,
        scheduled: &ScheduledTime,
    ) -> CuratorResult<UpdateResponse>;
}
