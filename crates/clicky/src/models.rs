use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub dates: Vec<DateBucket>,
}

#[derive(Debug, Deserialize)]
pub struct DateBucket {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub items: Vec<PageItem>,
}

#[derive(Debug, Deserialize)]
pub struct PageItem {
    #[serde(default)]
    pub title: String,
    pub url: String,
}
