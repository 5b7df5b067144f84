//! HTTP transport for the results API

use async_trait::async_trait;
use loterias_domain::{FetchError, LotteryId};
use reqwest::Client;
use serde_json::Value;
use std::fmt;

/// Parameters of one `/resultado` request
#[derive(Clone, Copy)]
pub struct ResultQuery<'a> {
    pub lottery: LotteryId,
    pub contest: Option<u32>,
    pub token: &'a str,
}

impl fmt::Debug for ResultQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultQuery")
            .field("lottery", &self.lottery)
            .field("contest", &self.contest)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// One GET against one host; no retries, no caching
#[async_trait]
pub trait ResultTransport: Send + Sync {
    /// Returns the decoded body, which must be a JSON object
    async fn get(&self, base_url: &str, query: &ResultQuery<'_>) -> Result<Value, FetchError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("loterias/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultTransport for HttpTransport {
    async fn get(&self, base_url: &str, query: &ResultQuery<'_>) -> Result<Value, FetchError> {
        let url = format!("{}/resultado", base_url.trim_end_matches('/'));

        let mut params = vec![
            ("loteria", query.lottery.slug().to_string()),
            ("token", query.token.to_string()),
        ];
        if let Some(contest) = query.contest {
            params.push(("concurso", contest.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::InvalidPayload(format!("Malformed JSON: {}", e)))?;

        if !payload.is_object() {
            return Err(FetchError::InvalidPayload(
                "Expected a JSON object".to_string(),
            ));
        }

        Ok(payload)
    }
}
