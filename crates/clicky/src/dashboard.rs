use common::config::ClickyConfig;
use common::{CuratorError, CuratorResult};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

/// Reads the news paths off the Clicky dashboard instead of the stats API.
/// Needs `login_url`, `content_url`, `username` and `pw` in the config.
pub struct ClickyScraper {
    client: Client,
    login_url: String,
    content_url: String,
    username: String,
    password: String,
    site_id: String,
}

impl ClickyScraper {
    pub fn new(config: &ClickyConfig) -> CuratorResult<Self> {
        let missing = |field: &str| CuratorError::Config(format!("clicky {} must be set", field));

        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            login_url: config.urls.login_url.clone().ok_or_else(|| missing("urls.login_url"))?,
            content_url: config.urls.content_url.clone().ok_or_else(|| missing("urls.content_url"))?,
            username: config.username.clone().ok_or_else(|| missing("username"))?,
            password: config.pw.clone().ok_or_else(|| missing("pw"))?,
            site_id: config.siteid.clone(),
        })
    }

    pub async fn scrape(&self, date: &str) -> CuratorResult<Vec<String>> {
        self.client
            .post(&self.login_url)
            .form(&[("username", &self.username), ("password", &self.password)])
            .send()
            .await?;

        let html = self
            .client
            .get(&self.content_url)
            .query(&[("site_id", self.site_id.as_str()), ("date", date)])
            .send()
            .await?
            .text()
            .await?;

        let paths = parse_news_paths(&html)?;
        info!("Scraped {} news paths from clicky dashboard", paths.len());
        Ok(paths)
    }
}

pub fn parse_news_paths(html: &str) -> CuratorResult<Vec<String>> {
    let selector = |css: &str| {
        Selector::parse(css).map_err(|e| CuratorError::Config(format!("invalid selector {}: {}", css, e)))
    };
    let table_selector = selector("table.graph")?;
    let row_selector = selector("tr.alt")?;
    let cell_selector = selector("td.itemname2")?;
    let link_selector = selector("a")?;

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_selector).next() else {
        return Err(CuratorError::MalformedResponse {
            source_name: "Clicky dashboard",
            body: "no table.graph found".to_string(),
        });
    };

    let paths = table
        .select(&row_selector)
        .filter_map(|row| row.select(&cell_selector).next())
        .filter_map(|cell| cell.select(&link_selector).nth(1))
        .map(|link| link.text().collect::<String>())
        .filter(|path| path.starts_with("/news/"))
        .collect();

    Ok(paths)
}
