// src/core/net.rs
// One blocking GET per page, fixed timeout, no retries.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::consts::USER_AGENT;
use crate::error::FetchError;

/// Page source. `HttpFetcher` in production; tests feed canned pages.
pub trait Fetch: Send + Sync {
    /// Body of `url` on HTTP 200, otherwise the failure cause.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        resp.text().map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: s!(url) }
    } else {
        FetchError::Network { url: s!(url), message: e.to_string() }
    }
}
