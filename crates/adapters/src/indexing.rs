//! Search-engine indexing notifiers

use async_trait::async_trait;
use loterias_domain::{IndexNotifier, NotifyError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Shared IndexNow endpoint; it forwards submissions to participating engines
pub const INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/indexnow";

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
}

async fn check_response(response: reqwest::Response) -> Result<(), NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// IndexNow submission (<https://www.indexnow.org/documentation>)
pub struct IndexNowNotifier {
    client: Client,
    endpoint: String,
    host: String,
    key: SecretString,
    key_location: Option<String>,
}

impl IndexNowNotifier {
    pub fn with_endpoint(endpoint: String, host: impl Into<String>, key: SecretString) -> Self {
        Self {
            client: build_client(),
            endpoint,
            host: host.into(),
            key,
            key_location: None,
        }
    }

    /// URL of the hosted key file, when it is not at `/{key}.txt`
    pub fn with_key_location(mut self, key_location: impl Into<String>) -> Self {
        self.key_location = Some(key_location.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexNowRequest<'a> {
    host: &'a str,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_location: Option<&'a str>,
    url_list: &'a [String],
}

#[async_trait]
impl IndexNotifier for IndexNowNotifier {
    async fn notify(&self, urls: &[String]) -> Result<(), NotifyError> {
        if urls.is_empty() {
            return Ok(());
        }
        if self.key.expose_secret().trim().is_empty() {
            return Err(NotifyError::Config("Missing IndexNow key".to_string()));
        }

        let request = IndexNowRequest {
            host: &self.host,
            key: self.key.expose_secret(),
            key_location: self.key_location.as_deref(),
            url_list: urls,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        check_response(response).await?;
        tracing::debug!(count = urls.len(), "IndexNow accepted URLs");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "indexnow"
    }
}

/// Generic webhook that forwards URL lists (e.g., an edge function calling an indexing API)
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: build_client(),
            url,
        }
    }
}

#[derive(Serialize)]
struct WebhookRequest<'a> {
    urls: &'a [String],
}

#[async_trait]
impl IndexNotifier for WebhookNotifier {
    async fn notify(&self, urls: &[String]) -> Result<(), NotifyError> {
        if urls.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(&self.url)
            .json(&WebhookRequest { urls })
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        check_response(response).await
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

/// Sends to every inner notifier; fails only when all of them fail
pub struct FanoutNotifier {
    notifiers: Vec<Arc<dyn IndexNotifier>>,
}

impl FanoutNotifier {
    pub fn new(notifiers: Vec<Arc<dyn IndexNotifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl IndexNotifier for FanoutNotifier {
    async fn notify(&self, urls: &[String]) -> Result<(), NotifyError> {
        let mut last_error = None;
        let mut delivered = false;

        for notifier in &self.notifiers {
            match notifier.notify(urls).await {
                Ok(()) => delivered = true,
                Err(e) => {
                    tracing::warn!(notifier = notifier.name(), error = %e, "Notifier failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !delivered => Err(e),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "fanout"
    }
}
