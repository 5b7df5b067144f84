//! Result service use case - fetch, normalize, and announce new contests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::model::{CanonicalResult, LotteryId, SiteInfo};
use crate::normalize::normalize;
use crate::ports::{FetchError, IndexNotifier, ResultSource};
use crate::usecases::aggregate::{AggregateReport, fetch_all};
use crate::usecases::seo::canonical_urls;

/// Retrieval entry point used by presentation code
pub struct ResultService<S>
where
    S: ResultSource + ?Sized,
{
    source: Arc<S>,
    site: SiteInfo,
    notifier: Option<Arc<dyn IndexNotifier>>,
    highest_seen: Mutex<HashMap<LotteryId, u32>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl<S> ResultService<S>
where
    S: ResultSource + ?Sized,
{
    pub fn new(source: Arc<S>, site: SiteInfo) -> Self {
        Self {
            source,
            site,
            notifier: None,
            highest_seen: Mutex::new(HashMap::new()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Announce newly seen contests through `notifier`
    pub fn with_notifier(mut self, notifier: Arc<dyn IndexNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// Latest result of one lottery
    pub async fn latest(&self, lottery: LotteryId) -> Result<CanonicalResult, FetchError> {
        let raw = self.source.fetch_raw(lottery, None).await?;
        let result = normalize(&raw, lottery);
        self.observe(&result);
        Ok(result)
    }

    /// A specific contest of one lottery
    pub async fn contest(
        &self,
        lottery: LotteryId,
        contest: u32,
    ) -> Result<CanonicalResult, FetchError> {
        let raw = self.source.fetch_raw(lottery, Some(contest)).await?;
        Ok(normalize(&raw, lottery))
    }

    /// Latest result of every lottery; failures are reported, not propagated
    pub async fn all_latest(&self) -> AggregateReport {
        let report = fetch_all(self.source.as_ref(), &LotteryId::ALL).await;
        for result in &report.results {
            self.observe(result);
        }
        report
    }

    /// Wait for indexing notifications spawned so far.
    ///
    /// Request paths never call this; short-lived processes use it before exit.
    pub async fn flush_notifications(&self) {
        let handles: Vec<JoinHandle<()>> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return,
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Indexing notification task failed");
            }
        }
    }

    /// Spawn a detached notification when `result` is newer than anything seen
    fn observe(&self, result: &CanonicalResult) {
        let Some(notifier) = self.notifier.as_ref() else {
            return;
        };
        if result.contest_number == 0 {
            return;
        }

        let is_new = match self.highest_seen.lock() {
            Ok(mut seen) => {
                let previous = seen.get(&result.lottery).copied().unwrap_or(0);
                if result.contest_number > previous {
                    seen.insert(result.lottery, result.contest_number);
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };
        if !is_new {
            return;
        }

        let urls = canonical_urls(&self.site, result);
        let notifier = Arc::clone(notifier);
        let lottery = result.lottery;
        let contest = result.contest_number;

        tracing::debug!(lottery = %lottery, contest = contest, "New contest, scheduling indexing");

        let handle = tokio::spawn(async move {
            match notifier.notify(&urls).await {
                Ok(()) => tracing::info!(
                    lottery = %lottery,
                    contest = contest,
                    notifier = notifier.name(),
                    "Submitted pages for indexing"
                ),
                Err(e) => tracing::warn!(
                    lottery = %lottery,
                    contest = contest,
                    notifier = notifier.name(),
                    error = %e,
                    "Indexing notification failed"
                ),
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NotifyError;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct FakeSource {
        contest: u32,
    }

    #[async_trait]
    impl ResultSource for FakeSource {
        async fn fetch_raw(
            &self,
            lottery: LotteryId,
            contest: Option<u32>,
        ) -> Result<Value, FetchError> {
            if lottery == LotteryId::Timemania {
                return Err(FetchError::Transport("connection reset".to_string()));
            }
            Ok(json!({
                "concurso": contest.unwrap_or(self.contest),
                "data": "09/03/2024",
                "dezenas": [1, 2, 3, 4, 5, 6],
            }))
        }
    }

    struct RecordingNotifier {
        calls: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(vec![]),
                fail,
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IndexNotifier for RecordingNotifier {
        async fn notify(&self, urls: &[String]) -> Result<(), NotifyError> {
            self.calls.lock().unwrap().push(urls.to_vec());
            if self.fail {
                return Err(NotifyError::Network("unreachable".to_string()));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn site() -> SiteInfo {
        SiteInfo::new("https://loterias.example.com")
    }

    #[tokio::test]
    async fn test_latest_notifies_once_per_new_contest() {
        let notifier = Arc::new(RecordingNotifier::new(false));
        let service = ResultService::new(Arc::new(FakeSource { contest: 2700 }), site())
            .with_notifier(notifier.clone());

        let first = service.latest(LotteryId::MegaSena).await.unwrap();
        let second = service.latest(LotteryId::MegaSena).await.unwrap();
        service.flush_notifications().await;

        assert_eq!(first, second);
        let calls = notifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "https://loterias.example.com/megasena/2700");
    }

    #[tokio::test]
    async fn test_specific_contest_does_not_notify() {
        let notifier = Arc::new(RecordingNotifier::new(false));
        let service = ResultService::new(Arc::new(FakeSource { contest: 2700 }), site())
            .with_notifier(notifier.clone());

        let result = service.contest(LotteryId::MegaSena, 2500).await.unwrap();
        service.flush_notifications().await;

        assert_eq!(result.contest_number, 2500);
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_request() {
        let notifier = Arc::new(RecordingNotifier::new(true));
        let service = ResultService::new(Arc::new(FakeSource { contest: 6400 }), site())
            .with_notifier(notifier.clone());

        let result = service.latest(LotteryId::Quina).await;
        service.flush_notifications().await;

        assert!(result.is_ok());
        assert_eq!(notifier.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_all_latest_reports_failures_and_notifies_successes() {
        let notifier = Arc::new(RecordingNotifier::new(false));
        let service = ResultService::new(Arc::new(FakeSource { contest: 10 }), site())
            .with_notifier(notifier.clone());

        let report = service.all_latest().await;
        service.flush_notifications().await;

        assert_eq!(report.results.len(), LotteryId::ALL.len() - 1);
        assert_eq!(report.failed[0].0, LotteryId::Timemania);
        assert_eq!(notifier.calls().len(), LotteryId::ALL.len() - 1);
    }

    #[tokio::test]
    async fn test_without_notifier() {
        let service = ResultService::new(Arc::new(FakeSource { contest: 1 }), site());
        let result = service.latest(LotteryId::Lotomania).await.unwrap();
        service.flush_notifications().await;
        assert_eq!(result.contest_number, 1);
    }
}
