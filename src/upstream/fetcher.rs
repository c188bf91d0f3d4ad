//! Upstream fetcher module
//!
//! One GET per call, no retries. The outcome is a value, never an error.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use hyper::body::Bytes;
use reqwest::Client;

use crate::config::UpstreamConfig;

/// Result of a single upstream fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx status, fully buffered body
    Fetched(Bytes),
    /// Request completed with a non-success status
    UpstreamStatus(u16),
    /// Connect, DNS, timeout or body read failure
    Transport(String),
}

/// Source of raw script bodies
#[async_trait]
pub trait ScriptFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// `reqwest`-backed fetcher sharing one connection pool
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ScriptFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::Transport(describe(&e)),
        };

        let status = resp.status();
        if !status.is_success() {
            return FetchOutcome::UpstreamStatus(status.as_u16());
        }

        match resp.bytes().await {
            Ok(body) => FetchOutcome::Fetched(body),
            Err(e) => FetchOutcome::Transport(describe(&e)),
        }
    }
}

/// Error message including its source chain
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
