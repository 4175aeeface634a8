pub mod api;
pub mod models;

use api::FeedlyAPI;
use async_trait::async_trait;
use common::config::FeedlyConfig;
use common::{Candidate, CandidateSource, CuratorError, CuratorResult, FeedArticle};
use models::StreamContents;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

const SOURCE_NAME: &str = "Feedly";
const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Pulls the configured stream and ranks its recent entries by engagement.
pub struct FeedlyFetcher {
    api: FeedlyAPI,
    stream_id: String,
    time_delta: i64,
    count: u32,
    extra_params: Vec<(String, String)>,
}

impl FeedlyFetcher {
    pub fn new(config: &FeedlyConfig) -> CuratorResult<Self> {
        let stream_id = config.require_stream()?.clone();

        Ok(Self {
            api: FeedlyAPI::new(config),
            stream_id,
            time_delta: config.time_delta,
            count: config.count,
            extra_params: Vec::new(),
        })
    }

    /// Extra query parameters forwarded verbatim to the stream endpoint.
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.extra_params = params;
        self
    }

    pub async fn get_feed(&self) -> CuratorResult<Vec<FeedArticle>> {
        let mut params = vec![("count".to_string(), self.count.to_string())];
        params.extend(self.extra_params.iter().cloned());

        info!("Fetching feedly stream {}", self.stream_id);
        let response = self.api.get_stream_contents(&self.stream_id, params).await?;
        let articles = parse_stream(response, OffsetDateTime::now_utc(), self.time_delta)?;
        info!("Kept {} feedly articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl CandidateSource for FeedlyFetcher {
    async fn fetch(&self) -> CuratorResult<Vec<Candidate>> {
        let articles = self.get_feed().await?;
        Ok(articles.into_iter().map(Candidate::from).collect())
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

/// Turns a stream response into articles sorted by engagement, highest first.
///
/// Items arrive newest first. Iteration stops at the first item whose age in
/// whole days equals `time_delta`, so an item exactly `time_delta` days old is
/// excluded along with everything after it.
pub fn parse_stream(
    response: Value,
    now: OffsetDateTime,
    time_delta: i64,
) -> CuratorResult<Vec<FeedArticle>> {
    let raw = response.to_string();
    let contents: StreamContents =
        serde_json::from_value(response).map_err(|_| CuratorError::MalformedResponse {
            source_name: SOURCE_NAME,
            body: raw.clone(),
        })?;

    let items = match contents.items {
        Some(items) if !items.is_empty() => items,
        _ => {
            if let Some(code) = contents.error_code {
                let code = match code {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                return Err(CuratorError::Upstream {
                    source_name: SOURCE_NAME,
                    code,
                    message: contents.error_message.unwrap_or_default(),
                });
            }
            return Err(CuratorError::MalformedResponse {
                source_name: SOURCE_NAME,
                body: raw,
            });
        }
    };

    let mut articles = Vec::new();
    for item in items {
        let published_ms = match item.published {
            Some(ms) if ms != 0.0 => ms as i128,
            _ => continue,
        };
        let Some(published_ns) = published_ms.checked_mul(1_000_000) else {
            warn!("Skipping item with out of range publish time {}", published_ms);
            continue;
        };
        let published = match OffsetDateTime::from_unix_timestamp_nanos(published_ns) {
            Ok(published) => published,
            Err(e) => {
                warn!("Skipping item with invalid publish time {}: {}", published_ms, e);
                continue;
            }
        };

        let age_days = (now - published).whole_nanoseconds().div_euclid(NANOS_PER_DAY);
        if age_days == i128::from(time_delta) {
            break;
        }

        let Some(url) = item.origin_id else {
            debug!("Skipping item without originId");
            continue;
        };

        articles.push(FeedArticle {
            title: item.title.unwrap_or_default(),
            url,
            engagement: item.engagement.unwrap_or(0.0) as i64,
            published,
        });
    }

    articles.sort_by(|a, b| b.engagement.cmp(&a.engagement));
    Ok(articles)
}
