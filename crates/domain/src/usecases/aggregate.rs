//! Aggregate use case - latest result for every lottery, tolerating failures

use futures::stream::{FuturesUnordered, StreamExt};

use crate::model::{CanonicalResult, LotteryId};
use crate::normalize::normalize;
use crate::ports::{FetchError, ResultSource};

/// Outcome of fetching a set of lotteries
#[derive(Debug, Default)]
pub struct AggregateReport {
    /// Normalized results, in canonical lottery order
    pub results: Vec<CanonicalResult>,
    /// Lotteries whose fetch failed, in canonical lottery order
    pub failed: Vec<(LotteryId, FetchError)>,
}

impl AggregateReport {
    pub fn get(&self, lottery: LotteryId) -> Option<&CanonicalResult> {
        self.results.iter().find(|r| r.lottery == lottery)
    }
}

/// Fetch and normalize the latest result of each lottery concurrently.
///
/// A failed lottery is logged and reported in `failed`; it never aborts the
/// others. Completion order is not preserved; results are sorted back into
/// canonical order.
pub async fn fetch_all<S>(source: &S, lotteries: &[LotteryId]) -> AggregateReport
where
    S: ResultSource + ?Sized,
{
    let mut tasks: FuturesUnordered<_> = lotteries
        .iter()
        .map(|&lottery| async move { (lottery, source.fetch_raw(lottery, None).await) })
        .collect();

    let mut report = AggregateReport::default();

    while let Some((lottery, outcome)) = tasks.next().await {
        match outcome {
            Ok(raw) => report.results.push(normalize(&raw, lottery)),
            Err(error) => {
                tracing::warn!(lottery = %lottery, error = %error, "Failed to fetch lottery result");
                report.failed.push((lottery, error));
            }
        }
    }

    report.results.sort_by_key(|r| r.lottery);
    report.failed.sort_by_key(|(lottery, _)| *lottery);

    tracing::info!(
        fetched = report.results.len(),
        failed = report.failed.len(),
        "Aggregated lottery results"
    );

    report
}
