use common::config::FeedlyConfig;
use common::{ApiClient, ApiRequest, CuratorError, CuratorResult};
use reqwest::Url;
use serde_json::Value;

#[derive(Clone)]
pub struct FeedlyAPI {
    client: ApiClient,
    base_url: String,
    token: String,
}

impl FeedlyAPI {
    pub fn new(config: &FeedlyConfig) -> Self {
        Self {
            client: ApiClient::new(),
            base_url: config.baseurl.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// `{base}/streams/{stream id, fully escaped}/contents`
    pub fn contents_url(&self, stream_id: &str) -> CuratorResult<String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CuratorError::Config(format!("invalid feedly baseurl: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CuratorError::Config("feedly baseurl cannot be a base".to_string()))?
            .pop_if_empty()
            .push("streams")
            .push(stream_id)
            .push("contents");
        Ok(url.to_string())
    }

    pub async fn get_stream_contents(
        &self,
        stream_id: &str,
        params: Vec<(String, String)>,
    ) -> CuratorResult<Value> {
        let request = ApiRequest::get(self.contents_url(stream_id)?)
            .header("Authorization", format!("OAuth {}", self.token))
            .params(params);
        self.client.make_request(request).await
    }
}
