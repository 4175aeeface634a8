pub mod api;
pub mod models;
pub mod dashboard;

use api::ClickyAPI;
use async_trait::async_trait;
use common::config::ClickyConfig;
use common::{Candidate, CandidateSource, CuratorError, CuratorResult, PageArticle};
use models::ResultSet;
use serde_json::Value;
use tracing::info;

pub use dashboard::{parse_news_paths, ClickyScraper};

const SOURCE_NAME: &str = "Clicky";
const CATEGORY: &str = "news";

/// Recently visited news pages of the tracked site, in the order Clicky
/// reports them.
pub struct ClickyFetcher {
    api: ClickyAPI,
    date: String,
    output: String,
    limit: u32,
    extra_params: Vec<(String, String)>,
}

impl ClickyFetcher {
    pub fn new(config: &ClickyConfig) -> Self {
        Self {
            api: ClickyAPI::new(config),
            date: config.date.clone(),
            output: "json".to_string(),
            limit: config.limit,
            extra_params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.extra_params = params;
        self
    }

    pub async fn get_pages(&self) -> CuratorResult<Vec<PageArticle>> {
        info!("Fetching clicky pages for {}", self.date);
        let response = self
            .api
            .get_pages(&self.date, &self.output, self.limit, &self.extra_params)
            .await?;
        let articles = parse_pages(response)?;
        info!("Kept {} clicky articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl CandidateSource for ClickyFetcher {
    async fn fetch(&self) -> CuratorResult<Vec<Candidate>> {
        let articles = self.get_pages().await?;
        Ok(articles.into_iter().map(Candidate::from).collect())
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

/// Flattens the first result-set's first date bucket and keeps news articles.
pub fn parse_pages(response: Value) -> CuratorResult<Vec<PageArticle>> {
    let raw = response.to_string();
    let malformed = || CuratorError::MalformedResponse {
        source_name: SOURCE_NAME,
        body: raw.clone(),
    };

    let result_sets: Vec<ResultSet> = serde_json::from_value(response).map_err(|_| malformed())?;
    let first = result_sets.into_iter().next().ok_or_else(malformed)?;

    if let Some(message) = first.error {
        return Err(CuratorError::Upstream {
            source_name: SOURCE_NAME,
            code: "error".to_string(),
            message,
        });
    }

    let bucket = first.dates.into_iter().next().ok_or_else(malformed)?;

    Ok(bucket
        .items
        .into_iter()
        .filter(|item| is_article_url(&item.url))
        .map(|item| PageArticle {
            title: item.title,
            url: item.url,
        })
        .collect())
}

/// `https://host/news/slug` splits into `["https:", "", "host", "news", "slug"]`:
/// the category sits at index 3 and a slug must follow it.
pub fn is_article_url(url: &str) -> bool {
    let segments: Vec<&str> = url.split('/').collect();
    segments.len() > 4 && segments[3] == CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_url_filter() {
        assert!(is_article_url("https://site/news/my-article"));
        assert!(!is_article_url("https://site/other/x"));
        assert!(!is_article_url("https://site/news"));
        assert!(!is_article_url("https://site"));
        assert!(is_article_url("https://site/news/2024/03/story"));
    }

    #[test]
    fn test_parse_pages_keeps_news_in_order() {
        let response = json!([
            {
                "type": "pages",
                "dates": [
                    {
                        "date": "2024-03-01",
                        "items": [
                            {"title": "Second story", "url": "https://site/news/second", "value": "40"},
                            {"title": "Home", "url": "https://site/", "value": "400"},
                            {"title": "First story", "url": "https://site/news/first", "value": "12"},
                            {"title": "News index", "url": "https://site/news", "value": "90"}
                        ]
                    },
                    {
                        "date": "2024-02-29",
                        "items": [{"title": "Ignored", "url": "https://site/news/ignored"}]
                    }
                ]
            }
        ]);

        let articles = parse_pages(response).unwrap();
        let urls: Vec<&str> = articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://site/news/second", "https://site/news/first"]);
        assert_eq!(articles[0].title, "Second story");
    }

    #[test]
    fn test_parse_pages_upstream_error() {
        let response = json!([{"error": "Invalid sitekey"}]);
        assert!(matches!(
            parse_pages(response),
            Err(CuratorError::Upstream { message, .. }) if message == "Invalid sitekey"
        ));
    }

    #[test]
    fn test_parse_pages_malformed() {
        assert!(matches!(parse_pages(json!([])), Err(CuratorError::MalformedResponse { .. })));
        assert!(matches!(
            parse_pages(json!([{"dates": []}])),
            Err(CuratorError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_pages(json!({"items": []})),
            Err(CuratorError::MalformedResponse { .. })
        ));
    }
}
