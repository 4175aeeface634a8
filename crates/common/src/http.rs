use std::fmt;
use std::str::FromStr;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{CuratorError, CuratorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            other => Err(CuratorError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

pub type Pairs = Vec<(String, String)>;

/// One request against an upstream JSON API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Pairs,
    pub params: Pairs,
    pub payload: Option<Pairs>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: Vec::new(),
            params: Vec::new(),
            payload: None,
        }
    }

    pub fn post(url: impl Into<String>, payload: Pairs) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: Vec::new(),
            params: Vec::new(),
            payload: Some(payload),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Checks the request shape before anything goes on the wire.
    pub fn validate(&self) -> CuratorResult<()> {
        if self.method == HttpMethod::Post
            && self.payload.as_ref().map_or(true, |payload| payload.is_empty())
        {
            return Err(CuratorError::MissingPayload);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn make_request(&self, request: ApiRequest) -> CuratorResult<Value> {
        request.validate()?;
        debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(payload) = &request.payload {
            builder = builder.form(payload);
        }

        let response = builder.send().await?;
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}
