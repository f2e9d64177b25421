//! HTTP transport against a remote ledger API

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::query::encode_pairs;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{LedgerError, LedgerResult};

/// Header carrying the acting user until real authentication exists
pub const USER_HEADER: &str = "x-user-id";

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        user_id: Option<String>,
        timeout: Duration,
    ) -> LedgerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(user) = user_id {
            let value = HeaderValue::from_str(&user)
                .map_err(|e| LedgerError::Config(format!("Invalid user id '{}': {}", user, e)))?;
            headers.insert(USER_HEADER, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a request, query string included
    pub fn url(&self, request: &ApiRequest) -> String {
        if request.query.is_empty() {
            format!("{}{}", self.base_url, request.path)
        } else {
            format!(
                "{}{}?{}",
                self.base_url,
                request.path,
                encode_pairs(&request.query)
            )
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> LedgerResult<ApiResponse> {
        let url = self.url(request);
        log::debug!("{} {}", request.method, url);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| LedgerError::Transport(format!("{} {}: {}", request.method, url, e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| LedgerError::Transport(format!("Failed to read response: {}", e)))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                LedgerError::Transport(format!(
                    "Unexpected non-JSON response ({}): {}",
                    status, e
                ))
            })?
        };

        log::debug!("{} {} -> {}", request.method, url, status);
        Ok(ApiResponse { status, body })
    }
}
