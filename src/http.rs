//! HTTP transport returning the status line and headers together with the body

use crate::error::{Result, RouterError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::fmt::Write;
use std::time::Duration;

/// The capability the router client needs from an HTTP stack.
///
/// `get` returns the whole exchange as one text blob
/// (`"HTTP/1.1 200 OK\r\nheader: value\r\n\r\nbody"`), so failure
/// classification can look at the status line. A request that produced no
/// response at all is reported as [`RouterError::UnknownResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String>;
}

pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Build a client. `timeout` of `None` lets requests block indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Firefox/120.0"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(RouterError::ClientBuild)?;

        Ok(Self { inner: client })
    }

    /// Flatten a response into `status line + headers + blank line + body`.
    async fn render(resp: Response) -> Result<String> {
        let mut out = format!("{:?} {}\r\n", resp.version(), resp.status());
        for (name, value) in resp.headers() {
            let _ = write!(out, "{}: {}\r\n", name, value.to_str().unwrap_or(""));
        }
        out.push_str("\r\n");

        let body = resp.text().await.map_err(|e| {
            tracing::warn!("Failed to read response body: {}", e);
            RouterError::UnknownResponse(e.to_string())
        })?;
        out.push_str(&body);

        Ok(out)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let resp = self
            .inner
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Request error: {}", e);
                RouterError::UnknownResponse(e.to_string())
            })?;

        Self::render(resp).await
    }
}
