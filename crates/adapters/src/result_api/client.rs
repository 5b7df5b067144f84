//! Results API client with retries, host failover and caching

use async_trait::async_trait;
use loterias_domain::{FetchError, LotteryId, ResultSource};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use super::cache::{CacheKey, ResponseCache};
use super::transport::{HttpTransport, ResultQuery, ResultTransport};

/// Retry and timeout policy applied per host
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts against each host before failing over
    pub max_attempts: u32,
    /// Timeout of the first attempt
    pub timeout: Duration,
    /// Added to the timeout for each further attempt
    pub timeout_step: Duration,
    /// Wait after the n-th failed attempt; the last element repeats
    pub backoff: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Duration::from_millis(5000),
            timeout_step: Duration::from_millis(250),
            backoff: vec![
                Duration::from_millis(200),
                Duration::from_millis(750),
                Duration::from_millis(1500),
            ],
        }
    }
}

impl RetryPolicy {
    /// Timeout for the attempt with 0-based index `attempt`
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.timeout + self.timeout_step * attempt
    }

    /// Wait after the failed attempt with 0-based index `attempt`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let index = (attempt as usize).min(self.backoff.len().saturating_sub(1));
        self.backoff.get(index).copied().unwrap_or(Duration::ZERO)
    }
}

/// [`ResultSource`] backed by the upstream results API
pub struct ResultsApiClient<T = HttpTransport> {
    transport: T,
    hosts: Vec<String>,
    token: SecretString,
    policy: RetryPolicy,
    cache: ResponseCache,
}

impl ResultsApiClient<HttpTransport> {
    pub fn new(
        hosts: Vec<String>,
        token: SecretString,
        policy: RetryPolicy,
        cache: ResponseCache,
    ) -> Self {
        Self::with_transport(HttpTransport::new(), hosts, token, policy, cache)
    }
}

impl<T: ResultTransport> ResultsApiClient<T> {
    pub fn with_transport(
        transport: T,
        hosts: Vec<String>,
        token: SecretString,
        policy: RetryPolicy,
        cache: ResponseCache,
    ) -> Self {
        let hosts = hosts
            .into_iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();

        Self {
            transport,
            hosts,
            token,
            policy,
            cache,
        }
    }

    fn check_config(&self) -> Result<(), FetchError> {
        if self.hosts.is_empty() {
            return Err(FetchError::Config(
                "No result API hosts configured".to_string(),
            ));
        }
        if self.token.expose_secret().trim().is_empty() {
            return Err(FetchError::Config(
                "Missing result API access token".to_string(),
            ));
        }
        Ok(())
    }

    async fn attempt(
        &self,
        host: &str,
        query: &ResultQuery<'_>,
        attempt: u32,
    ) -> Result<Value, FetchError> {
        let timeout = self.policy.timeout_for(attempt);
        match tokio::time::timeout(timeout, self.transport.get(host, query)).await {
            Ok(outcome) => outcome,
            // Dropping the request future aborts the in-flight request
            Err(_) => Err(FetchError::Timeout(timeout.as_millis() as u64)),
        }
    }
}

#[async_trait]
impl<T: ResultTransport> ResultSource for ResultsApiClient<T> {
    async fn fetch_raw(
        &self,
        lottery: LotteryId,
        contest: Option<u32>,
    ) -> Result<Value, FetchError> {
        self.check_config()?;

        let key = CacheKey::new(lottery, contest);
        if let Some(payload) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Result cache hit");
            return Ok(payload);
        }

        let query = ResultQuery {
            lottery,
            contest,
            token: self.token.expose_secret(),
        };

        let max_attempts = self.policy.max_attempts.max(1);
        let total_attempts = max_attempts * self.hosts.len() as u32;
        let mut made = 0;
        let mut last_error = None;

        for (host_index, host) in self.hosts.iter().enumerate() {
            for attempt in 0..max_attempts {
                made += 1;

                match self.attempt(host, &query, attempt).await {
                    Ok(payload) => {
                        if host_index > 0 {
                            tracing::info!(key = %key, host = %host, "Fetched result from fallback host");
                        }
                        self.cache.insert(key, payload.clone());
                        return Ok(payload);
                    }
                    Err(error) => {
                        tracing::warn!(
                            key = %key,
                            host = %host,
                            attempt = attempt + 1,
                            error = %error,
                            "Result fetch attempt failed"
                        );
                        last_error = Some(error);
                    }
                }

                if made < total_attempts {
                    tokio::time::sleep(self.policy.backoff_for(attempt)).await;
                }
            }

            if host_index + 1 < self.hosts.len() {
                tracing::warn!(key = %key, host = %host, "Host exhausted, failing over");
            }
        }

        Err(FetchError::Exhausted {
            attempts: made,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt made".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_api::cache::ManualClock;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Scripted transport: answers per host, in order; the last answer repeats
    struct ScriptedTransport {
        scripts: Mutex<Vec<(String, VecDeque<Result<Value, FetchError>>)>>,
        calls: Mutex<Vec<(String, Option<u32>)>>,
        delay: Duration,
    }

    impl ScriptedTransport {
        fn new(scripts: Vec<(&str, Vec<Result<Value, FetchError>>)>) -> Self {
            Self {
                scripts: Mutex::new(
                    scripts
                        .into_iter()
                        .map(|(host, answers)| (host.to_string(), answers.into()))
                        .collect(),
                ),
                calls: Mutex::new(vec![]),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls_to(&self, host: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(h, _)| h == host)
                .count()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResultTransport for ScriptedTransport {
        async fn get(&self, base_url: &str, query: &ResultQuery<'_>) -> Result<Value, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), query.contest));

            let answer = {
                let mut scripts = self.scripts.lock().unwrap();
                let (_, answers) = scripts
                    .iter_mut()
                    .find(|(host, _)| host == base_url)
                    .expect("host is scripted");
                if answers.len() > 1 {
                    answers.pop_front().unwrap()
                } else {
                    answers.front().cloned().unwrap()
                }
            };

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            answer
        }
    }

    fn payload(contest: u32) -> Value {
        serde_json::json!({"concurso": contest})
    }

    fn network_error() -> Result<Value, FetchError> {
        Err(FetchError::Transport("connection refused".to_string()))
    }

    fn client(
        transport: ScriptedTransport,
        hosts: &[&str],
        clock: Arc<ManualClock>,
    ) -> ResultsApiClient<ScriptedTransport> {
        ResultsApiClient::with_transport(
            transport,
            hosts.iter().map(|h| h.to_string()).collect(),
            SecretString::new("token".into()),
            RetryPolicy::default(),
            ResponseCache::new(Duration::from_secs(60), clock),
        )
    }

    #[test]
    fn test_policy_schedules() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout_for(0), Duration::from_millis(5000));
        assert_eq!(policy.timeout_for(2), Duration::from_millis(5500));
        assert_eq!(policy.backoff_for(0), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(750));
        assert_eq!(policy.backoff_for(7), Duration::from_millis(1500));

        let no_backoff = RetryPolicy {
            backoff: vec![],
            ..Default::default()
        };
        assert_eq!(no_backoff.backoff_for(3), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_over_to_backup_after_primary_backoff() {
        let transport = ScriptedTransport::new(vec![
            ("http://primary", vec![network_error()]),
            ("http://backup", vec![Ok(payload(2700))]),
        ]);
        let client = client(
            transport,
            &["http://primary", "http://backup"],
            Arc::new(ManualClock::new()),
        );

        let started = Instant::now();
        let result = client.fetch_raw(LotteryId::MegaSena, None).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(result, payload(2700));
        assert_eq!(client.transport.calls_to("http://primary"), 2);
        assert_eq!(client.transport.calls_to("http://backup"), 1);
        // 200 ms after the first primary attempt, 750 ms after the second
        assert!(elapsed >= Duration::from_millis(950), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(960), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_same_host_before_failing_over() {
        let transport = ScriptedTransport::new(vec![
            (
                "http://primary",
                vec![
                    Err(FetchError::InvalidPayload("Expected a JSON object".to_string())),
                    Ok(payload(10)),
                ],
            ),
            ("http://backup", vec![Ok(payload(99))]),
        ]);
        let client = client(
            transport,
            &["http://primary", "http://backup"],
            Arc::new(ManualClock::new()),
        );

        let result = client.fetch_raw(LotteryId::Quina, Some(10)).await.unwrap();

        assert_eq!(result, payload(10));
        assert_eq!(client.transport.calls_to("http://backup"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_last_error() {
        let transport = ScriptedTransport::new(vec![
            ("http://primary", vec![network_error()]),
            (
                "http://backup",
                vec![Err(FetchError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                })],
            ),
        ]);
        let client = client(
            transport,
            &["http://primary", "http://backup"],
            Arc::new(ManualClock::new()),
        );

        let result = client.fetch_raw(LotteryId::Lotofacil, None).await;

        match result {
            Err(FetchError::Exhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 4);
                assert!(last_error.contains("502"), "last error: {last_error}");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert!(client.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_grows_per_retry() {
        let transport = ScriptedTransport::new(vec![("http://slow", vec![Ok(payload(1))])])
            .with_delay(Duration::from_secs(30));
        let client = client(transport, &["http://slow"], Arc::new(ManualClock::new()));

        let started = Instant::now();
        let result = client.fetch_raw(LotteryId::MegaSena, None).await;
        let elapsed = started.elapsed();

        match result {
            Err(FetchError::Exhausted { last_error, .. }) => {
                assert!(last_error.contains("5250"), "last error: {last_error}");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        // 5000 ms timeout, 200 ms backoff, 5250 ms timeout
        assert!(elapsed >= Duration::from_millis(10450), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(10470), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_cache_serves_within_ttl_and_refetches_after() {
        let clock = Arc::new(ManualClock::new());
        let transport = ScriptedTransport::new(vec![("http://primary", vec![Ok(payload(2700))])]);
        let client = client(transport, &["http://primary"], clock.clone());

        client.fetch_raw(LotteryId::MegaSena, Some(2700)).await.unwrap();
        client.fetch_raw(LotteryId::MegaSena, Some(2700)).await.unwrap();
        assert_eq!(client.transport.total_calls(), 1);

        clock.advance(Duration::from_secs(61));
        client.fetch_raw(LotteryId::MegaSena, Some(2700)).await.unwrap();
        assert_eq!(client.transport.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_configuration_is_not_retried() {
        let transport = ScriptedTransport::new(vec![("http://primary", vec![Ok(payload(1))])]);
        let no_hosts = client(transport, &[" "], Arc::new(ManualClock::new()));
        let result = no_hosts.fetch_raw(LotteryId::MegaSena, None).await;
        assert!(matches!(result, Err(FetchError::Config(_))));
        assert_eq!(no_hosts.transport.total_calls(), 0);

        let no_token = ResultsApiClient::with_transport(
            ScriptedTransport::new(vec![("http://primary", vec![Ok(payload(1))])]),
            vec!["http://primary".to_string()],
            SecretString::new("".into()),
            RetryPolicy::default(),
            ResponseCache::new(Duration::from_secs(60), Arc::new(ManualClock::new())),
        );
        let result = no_token.fetch_raw(LotteryId::MegaSena, None).await;
        assert!(matches!(result, Err(FetchError::Config(_))));
        assert_eq!(no_token.transport.total_calls(), 0);
    }
}
