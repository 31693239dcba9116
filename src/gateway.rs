//! Model gateway - failover across interchangeable candidate models.
//!
//! Every call permutes a copy of the configured candidates and tries them in
//! that order until one answers. The configured list itself is never reordered.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::error::{Result, ToolchatError};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, Usage};

/// Sends chat requests to the first candidate model that answers
pub struct ModelGateway {
    client: Arc<dyn LlmClient>,
    candidates: Vec<String>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    usage: Mutex<Usage>,
}

impl ModelGateway {
    /// Gateway with an OS-seeded random source
    pub fn new(client: Arc<dyn LlmClient>, candidates: Vec<String>) -> Self {
        Self::with_rng(client, candidates, StdRng::from_os_rng())
    }

    /// Gateway with an explicit random source, for reproducible ordering
    pub fn with_rng(
        client: Arc<dyn LlmClient>,
        candidates: Vec<String>,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            client,
            candidates,
            rng: Mutex::new(Box::new(rng)),
            usage: Mutex::new(Usage::default()),
        }
    }

    /// Tokens spent by every successful call so far
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().map(|u| u.clone()).unwrap_or_default()
    }

    /// A fresh uniformly random permutation of the candidates
    pub fn candidate_order(&self) -> Vec<String> {
        let mut order = self.candidates.clone();
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        order.shuffle(&mut **rng);
        order
    }

    /// Send `messages` and return the first non-empty answer.
    ///
    /// Fails with `AllModelsFailed` only when every candidate failed.
    pub async fn send(&self, messages: Vec<Message>, temperature: f32, max_tokens: u32) -> Result<String> {
        let order = self.candidate_order();
        let attempts = order.len();

        for model in order {
            let request = CompletionRequest::new(model.as_str(), messages.clone())
                .with_temperature(temperature)
                .with_max_tokens(max_tokens);

            let failure = match self.client.complete(request).await {
                Ok(response) if !response.content.trim().is_empty() => {
                    log::debug!("Model {} answered ({} tokens)", model, response.usage.total());
                    if let Ok(mut total) = self.usage.lock() {
                        total.add(&response.usage);
                    }
                    return Ok(response.content);
                }
                Ok(_) => ToolchatError::ModelCall {
                    model,
                    source: LlmError::EmptyResponse,
                },
                Err(source) => ToolchatError::ModelCall { model, source },
            };
            log::warn!("{}. Trying next model.", failure);
        }

        log::error!("All {} candidate model(s) failed", attempts);
        Err(ToolchatError::AllModelsFailed { attempts })
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use std::collections::HashSet;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|m| m.to_string()).collect()
    }

    fn seeded(client: Arc<MockLlmClient>, names: &[&str], seed: u64) -> ModelGateway {
        ModelGateway::with_rng(client, models(names), StdRng::seed_from_u64(seed))
    }

    #[tokio::test]
    async fn test_first_success_stops_iteration() {
        let mock = Arc::new(MockLlmClient::new().with_default_reply("answer"));
        let gateway = seeded(mock.clone(), &["a", "b", "c"], 7);

        let answer = gateway.send(vec![Message::user("hi")], 0.7, 100).await.unwrap();

        assert_eq!(answer, "answer");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_past_failing_models() {
        let mock = Arc::new(
            MockLlmClient::failing()
                .with_failure("a")
                .with_failure("b")
                .with_reply("c", "from c"),
        );
        let gateway = seeded(mock.clone(), &["a", "b", "c"], 1);

        let answer = gateway.send(vec![Message::user("hi")], 0.7, 100).await.unwrap();

        assert_eq!(answer, "from c");
        let tried: Vec<String> = mock.requests().into_iter().map(|r| r.model).collect();
        assert_eq!(tried.last().map(String::as_str), Some("c"));
        assert!(tried.len() <= 3);
    }

    #[tokio::test]
    async fn test_empty_answer_counts_as_failure() {
        let mock = Arc::new(MockLlmClient::failing().with_reply("a", "  ").with_reply("b", "real"));
        let gateway = seeded(mock, &["a", "b"], 3);

        let answer = gateway.send(vec![Message::user("hi")], 0.7, 100).await.unwrap();
        assert_eq!(answer, "real");
    }

    #[tokio::test]
    async fn test_all_models_failed() {
        let mock = Arc::new(MockLlmClient::failing());
        let gateway = seeded(mock.clone(), &["a", "b", "c"], 11);

        let result = gateway.send(vec![Message::user("hi")], 0.7, 100).await;

        assert!(matches!(result, Err(ToolchatError::AllModelsFailed { attempts: 3 })));
        let tried: HashSet<String> = mock.requests().into_iter().map(|r| r.model).collect();
        assert_eq!(tried, models(&["a", "b", "c"]).into_iter().collect());
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let mock = Arc::new(MockLlmClient::new());
        let gateway = seeded(mock.clone(), &[], 0);

        let result = gateway.send(vec![Message::user("hi")], 0.7, 100).await;

        assert!(matches!(result, Err(ToolchatError::AllModelsFailed { attempts: 0 })));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_carries_sampling_settings() {
        let mock = Arc::new(MockLlmClient::new());
        let gateway = seeded(mock.clone(), &["only"], 5);

        gateway
            .send(vec![Message::system("sys"), Message::user("hi")], 0.1, 2024)
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.model, "only");
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 2024);
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn test_order_is_a_permutation_and_config_untouched() {
        let gateway = seeded(Arc::new(MockLlmClient::new()), &["a", "b", "c", "d"], 42);

        for _ in 0..20 {
            let mut order = gateway.candidate_order();
            order.sort();
            assert_eq!(order, models(&["a", "b", "c", "d"]));
        }
        assert_eq!(format!("{:?}", gateway), r#"ModelGateway { candidates: ["a", "b", "c", "d"], .. }"#);
    }

    #[tokio::test]
    async fn test_usage_accumulates_across_calls() {
        let mock = Arc::new(MockLlmClient::new().with_usage(Usage::new(100, 50)));
        let gateway = seeded(mock, &["a"], 2);

        gateway.send(vec![Message::user("one")], 0.7, 100).await.unwrap();
        gateway.send(vec![Message::user("two")], 0.7, 100).await.unwrap();

        assert_eq!(gateway.total_usage(), Usage::new(200, 100));
        assert_eq!(gateway.total_usage().total(), 300);
    }

    #[tokio::test]
    async fn test_failed_calls_spend_nothing() {
        let mock = Arc::new(MockLlmClient::failing().with_usage(Usage::new(10, 10)));
        let gateway = seeded(mock, &["a", "b"], 2);

        let _ = gateway.send(vec![Message::user("hi")], 0.7, 100).await;

        assert_eq!(gateway.total_usage(), Usage::default());
    }

    #[test]
    fn test_same_seed_same_order() {
        let first = seeded(Arc::new(MockLlmClient::new()), &["a", "b", "c", "d", "e"], 9);
        let second = seeded(Arc::new(MockLlmClient::new()), &["a", "b", "c", "d", "e"], 9);
        assert_eq!(first.candidate_order(), second.candidate_order());
    }

    #[test]
    fn test_order_varies_across_calls() {
        let gateway = seeded(Arc::new(MockLlmClient::new()), &["a", "b", "c", "d", "e", "f"], 123);
        let orders: HashSet<Vec<String>> = (0..50).map(|_| gateway.candidate_order()).collect();
        assert!(orders.len() > 1);
    }
}
