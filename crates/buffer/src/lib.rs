pub mod models;

use async_trait::async_trait;
use common::config::BufferConfig;
use common::{
    ApiClient, ApiRequest, CuratorError, CuratorResult, PostScheduler, ProfileTarget,
    ScheduledTime, UpdateResponse,
};
use models::Profile;
use tracing::{debug, info};

/// Client for the Buffer publishing API.
#[derive(Clone)]
pub struct BufferClient {
    client: ApiClient,
    config: BufferConfig,
}

impl BufferClient {
    pub fn new(config: &BufferConfig) -> Self {
        Self {
            client: ApiClient::new(),
            config: config.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.baseurl.trim_end_matches('/'), path)
    }

    fn resolve_profile(&self, profile: &ProfileTarget) -> CuratorResult<&String> {
        match profile {
            ProfileTarget::Single(name) => self.config.require_profile(name),
            ProfileTarget::Many(_) => Err(CuratorError::NotImplemented(
                "posting to multiple profiles at once".to_string(),
            )),
        }
    }

    /// Builds the update request. Fails without touching the network when
    /// the profile or the scheduled time is unusable.
    pub fn update_request(
        &self,
        text: &str,
        profile: &ProfileTarget,
        scheduled: &ScheduledTime,
    ) -> CuratorResult<ApiRequest> {
        let profile_id = self.resolve_profile(profile)?;
        scheduled.validate()?;

        let mut payload = vec![
            ("profile_ids".to_string(), profile_id.clone()),
            ("text".to_string(), text.to_string()),
        ];
        match scheduled {
            ScheduledTime::At(ts) => payload.push(("scheduled_at".to_string(), ts.to_string())),
            _ => payload.push(("now".to_string(), "true".to_string())),
        }

        Ok(ApiRequest::post(self.endpoint("updates/create.json"), payload)
            .param("access_token", &self.config.access_token))
    }

    pub async fn list_profiles(&self) -> CuratorResult<Vec<Profile>> {
        let request = ApiRequest::get(self.endpoint("profiles.json"))
            .param("access_token", &self.config.access_token);
        let response = self.client.make_request(request).await?;
        let profiles: Vec<Profile> = serde_json::from_value(response)?;
        info!("Buffer returned {} profiles", profiles.len());
        Ok(profiles)
    }
}

#[async_trait]
impl PostScheduler for BufferClient {
    async fn schedule(
        &self,
        text: &str,
        profile: &ProfileTarget,
        scheduled: &ScheduledTime,
    ) -> CuratorResult<UpdateResponse> {
        let request = self.update_request(text, profile, scheduled)?;
        debug!("Creating buffer update: {}", text);
        let response = self.client.make_request(request).await?;
        Ok(serde_json::from_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> BufferClient {
        BufferClient::new(&BufferConfig {
            // Nothing listens here; any request that escapes validation fails.
            baseurl: "http://127.0.0.1:9/1/".to_string(),
            access_token: "token".to_string(),
            profiles: HashMap::from([
                ("twitter".to_string(), "tw-1".to_string()),
                ("linkedin".to_string(), "li-1".to_string()),
            ]),
            profile: "twitter".to_string(),
        })
    }

    fn payload_value<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
        request
            .payload
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_scheduled_update_request() {
        let request = client()
            .update_request(
                "Title https://example.com",
                &ProfileTarget::single("twitter"),
                &ScheduledTime::At(1_709_290_861),
            )
            .unwrap();

        assert_eq!(request.url, "http://127.0.0.1:9/1/updates/create.json");
        assert_eq!(request.params, vec![("access_token".to_string(), "token".to_string())]);
        assert_eq!(payload_value(&request, "profile_ids"), Some("tw-1"));
        assert_eq!(payload_value(&request, "text"), Some("Title https://example.com"));
        assert_eq!(payload_value(&request, "scheduled_at"), Some("1709290861"));
        assert_eq!(payload_value(&request, "now"), None);
    }

    #[test]
    fn test_immediate_update_request() {
        let request = client()
            .update_request("hello", &ProfileTarget::single("linkedin"), &ScheduledTime::Now)
            .unwrap();

        assert_eq!(payload_value(&request, "profile_ids"), Some("li-1"));
        assert_eq!(payload_value(&request, "now"), Some("true"));
        assert_eq!(payload_value(&request, "scheduled_at"), None);
    }

    #[tokio::test]
    async fn test_short_timestamp_fails_before_network() {
        let result = client()
            .schedule("hello", &ProfileTarget::single("twitter"), &ScheduledTime::At(12_345))
            .await;
        assert!(matches!(result, Err(CuratorError::InvalidTimestamp(12_345))));
    }

    #[tokio::test]
    async fn test_multiple_profiles_not_implemented() {
        let profiles = ProfileTarget::Many(vec!["twitter".to_string(), "linkedin".to_string()]);
        let result = client().schedule("hello", &profiles, &ScheduledTime::Now).await;
        assert!(matches!(result, Err(CuratorError::NotImplemented(_))));
    }

    #[tokio::test]
    async fn test_time_expression_not_implemented() {
        let result = client()
            .schedule(
                "hello",
                &ProfileTarget::single("twitter"),
                &ScheduledTime::Expression("tomorrow 9am".to_string()),
            )
            .await;
        assert!(matches!(result, Err(CuratorError::NotImplemented(_))));
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let result = client()
            .schedule("hello", &ProfileTarget::single("mastodon"), &ScheduledTime::Now)
            .await;
        assert!(matches!(result, Err(CuratorError::UnknownProfile(_))));
    }

    #[test]
    fn test_profile_decoding() {
        let profiles: Vec<Profile> = serde_json::from_value(serde_json::json!([
            {"service": "twitter", "_id": "tw-1", "formatted_username": "@example"}
        ]))
        .unwrap();
        assert_eq!(profiles[0].service, "twitter");
        assert_eq!(profiles[0].id, "tw-1");
    }
}
