//! Upstream results API adapters

mod cache;
mod client;
mod transport;

pub use cache::{CacheKey, ResponseCache};
pub use client::{ResultsApiClient, RetryPolicy};
pub use transport::{HttpTransport, ResultQuery, ResultTransport};

use async_trait::async_trait;
use loterias_domain::{FetchError, LotteryId, ResultSource};
use serde_json::{Value, json};

/// Offline result source that serves placeholder payloads.
///
/// Every payload is marked with `"stub": true`; it is meant for tests and for
/// exercising the pipeline without an API token.
pub struct StubResultSource {
    failing: Vec<LotteryId>,
}

impl StubResultSource {
    pub fn new() -> Self {
        Self { failing: vec![] }
    }

    /// Make fetches for `lottery` fail
    pub fn failing(mut self, lottery: LotteryId) -> Self {
        self.failing.push(lottery);
        self
    }

    /// The payload served for `lottery`
    pub fn payload(lottery: LotteryId, contest: Option<u32>) -> Value {
        let contest = contest.unwrap_or(1000);
        let numbers: Vec<u32> = (1..=lottery.expected_numbers() as u32).collect();
        let mut payload = json!({
            "stub": true,
            "loteria": lottery.slug(),
            "nome": lottery.display_name(),
            "concurso": contest,
            "data": "09/03/2024",
            "local": "Espaço da Sorte em São Paulo, SP",
            "dezenas": numbers,
            "premiacao": [
                {"descricao": format!("{} acertos", lottery.expected_numbers()), "ganhadores": 0, "valor_premio": 0},
            ],
            "acumulou": true,
            "proximo_concurso": contest + 1,
            "data_proximo_concurso": "12/03/2024",
            "valor_estimado_proximo_concurso": 1000000.0,
        });
        if lottery.has_second_draw() {
            payload["dezenas_2"] = json!(numbers);
        }
        payload
    }
}

impl Default for StubResultSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSource for StubResultSource {
    async fn fetch_raw(
        &self,
        lottery: LotteryId,
        contest: Option<u32>,
    ) -> Result<Value, FetchError> {
        if self.failing.contains(&lottery) {
            return Err(FetchError::Transport(format!(
                "Stub configured to fail for {}",
                lottery
            )));
        }
        Ok(Self::payload(lottery, contest))
    }
}
