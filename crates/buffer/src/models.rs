use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub service: String,
    #[serde(rename = "_id")]
    pub id: String,
}
