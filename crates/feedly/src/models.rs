use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamContents {
    #[serde(default)]
    pub items: Option<Vec<StreamItem>>,
    #[serde(default)]
    pub error_code: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamItem {
    pub title: Option<String>,
    /// Canonical URL of the entry.
    pub origin_id: Option<String>,
    pub engagement: Option<f64>,
    /// Milliseconds since the epoch.
    pub published: Option<f64>,
}
