use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{MetadataError, Result};

/// Upstream fetches are bounded by a per-call timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A reqwest client with a minimum interval between requests and
/// bounded retries on 429 and transient network errors.
pub struct RateLimitedClient {
    client: reqwest::Client,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(min_interval: Duration, max_retries: u32, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
            max_retries,
        })
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            self.wait_for_rate_limit().await;
            let resp = self.client.get(url).send().await;
            match resp {
                Ok(r) if r.status() == 429 => {
                    if attempt >= self.max_retries {
                        return Err(MetadataError::RateLimit(url.to_string(), 60));
                    }
                    let wait = r
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    sleep(Duration::from_secs(wait)).await;
                    attempt += 1;
                }
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    let body = r.text().await.unwrap_or_default();
                    return Err(MetadataError::ApiError(
                        url.to_string(),
                        format!("HTTP {status}: {body}"),
                    ));
                }
                Ok(r) => return r.text().await.map_err(MetadataError::Http),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(MetadataError::Http(e));
                    }
                    let backoff = 2u64.pow(attempt);
                    sleep(Duration::from_secs(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get(url).await?;
        serde_json::from_str(&text).map_err(|e| MetadataError::Parse(e.to_string()))
    }
}

/// HEAD a URL without following redirects and return the `Location`
/// header, if any.
pub async fn head_location(url: &str, user_agent: &str) -> Result<Option<String>> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let resp = client.head(url).send().await?;
    Ok(resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn get_json_parses_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value": 7}"#)
            .create_async()
            .await;

        let client = RateLimitedClient::new(Duration::from_secs(0), 0, "commonpid/0.1").unwrap();
        let body: serde_json::Value = client.get_json(&format!("{}/ok", server.url())).await.unwrap();
        assert_eq!(body["value"], 7);
    }

    #[tokio::test]
    async fn error_status_surfaces_as_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Resource not found.")
            .create_async()
            .await;

        let client = RateLimitedClient::new(Duration::from_secs(0), 0, "commonpid/0.1").unwrap();
        let err = client.get(&format!("{}/missing", server.url())).await.unwrap_err();
        match err {
            MetadataError::ApiError(_, msg) => assert!(msg.contains("404")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn head_location_does_not_follow_redirects() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("HEAD", "/10.5555/12345")
            .with_status(302)
            .with_header("location", "https://example.org/landing")
            .create_async()
            .await;

        let location = head_location(&format!("{}/10.5555/12345", server.url()), "commonpid/0.1")
            .await
            .unwrap();
        assert_eq!(location.as_deref(), Some("https://example.org/landing"));
    }
}
