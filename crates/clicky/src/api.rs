use common::config::ClickyConfig;
use common::{ApiClient, ApiRequest, CuratorResult};
use serde_json::Value;

#[derive(Clone)]
pub struct ClickyAPI {
    client: ApiClient,
    api_url: String,
    site_id: String,
    sitekey: String,
}

impl ClickyAPI {
    pub fn new(config: &ClickyConfig) -> Self {
        Self {
            client: ApiClient::new(),
            api_url: config.urls.api_url.clone(),
            site_id: config.siteid.clone(),
            sitekey: config.sitekey.clone(),
        }
    }

    pub fn pages_request(
        &self,
        date: &str,
        output: &str,
        limit: u32,
        extra: &[(String, String)],
    ) -> ApiRequest {
        ApiRequest::get(&self.api_url)
            .param("site_id", &self.site_id)
            .param("sitekey", &self.sitekey)
            .param("type", "pages")
            .param("output", output)
            .param("date", date)
            .param("limit", limit)
            .params(extra.iter().cloned())
    }

    /// Page-visit statistics for one day. `date` accepts `today`,
    /// `yesterday`, `X-days-ago` or `YYYY-MM-DD`.
    pub async fn get_pages(
        &self,
        date: &str,
        output: &str,
        limit: u32,
        extra: &[(String, String)],
    ) -> CuratorResult<Value> {
        let request = self.pages_request(date, output, limit, extra);
        self.client.make_request(request).await
    }
}
