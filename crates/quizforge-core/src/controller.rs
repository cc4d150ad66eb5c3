//! Quiz controller: the single owner of a session.
//!
//! The presentation layer talks only to the controller. Selecting a topic
//! starts the gateway in a background task; its result comes back through a
//! channel and is applied with the generation token captured at selection
//! time, so results for a session that was reset in the meantime are dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::SessionError;
use crate::gateway::{QuizGateway, QuizSource, Resolved};
use crate::session::{Outcome, SessionState};

/// A finished generation request.
#[derive(Debug)]
struct Delivery {
    generation: u64,
    resolved: Resolved,
}

/// What happened to a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The questions were accepted and the quiz started.
    Applied(QuizSource),
    /// The session moved on before the questions arrived.
    Stale,
}

pub struct QuizController {
    session: SessionState,
    gateway: Arc<QuizGateway>,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
    in_flight: usize,
}

impl QuizController {
    pub fn new(gateway: Arc<QuizGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: SessionState::new(),
            gateway,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Read-only view of the session.
    pub fn state(&self) -> &SessionState {
        &self.session
    }

    pub fn gateway(&self) -> &QuizGateway {
        &self.gateway
    }

    /// Select `topic` and start resolving its questions in the background.
    pub fn select_topic(&mut self, topic: impl Into<String>) -> Result<u64, SessionError> {
        let topic = topic.into();
        let generation = self.session.select_topic(topic.clone())?;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let resolved = gateway.resolve(&topic).await;
            // The controller may already be gone; nothing to deliver to then.
            let _ = tx.send(Delivery {
                generation,
                resolved,
            });
        });
        self.in_flight += 1;

        Ok(generation)
    }

    /// Whether a generation request is still outstanding.
    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Wait for the next finished request and apply it to the session.
    ///
    /// Returns `None` when nothing is in flight. Cancel-safe.
    pub async fn next_delivery(&mut self) -> Option<DeliveryOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let delivery = self.rx.recv().await?;
        self.in_flight -= 1;

        let Resolved { questions, source } = delivery.resolved;
        match self.session.questions_ready(delivery.generation, questions) {
            Ok(Outcome::QuizStarted { .. }) => Some(DeliveryOutcome::Applied(source)),
            _ => {
                debug!(
                    generation = delivery.generation,
                    current = self.session.generation(),
                    "discarding stale questions"
                );
                Some(DeliveryOutcome::Stale)
            }
        }
    }

    /// Wait until a delivery is applied, skipping stale ones.
    pub async fn wait_for_quiz(&mut self) -> Option<QuizSource> {
        loop {
            match self.next_delivery().await? {
                DeliveryOutcome::Applied(source) => return Some(source),
                DeliveryOutcome::Stale => continue,
            }
        }
    }

    pub fn submit_answer(&mut self, option: impl Into<String>) -> Result<Outcome, SessionError> {
        self.session.submit_answer(option)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::bank::QuestionBank;
    use crate::gateway::{GatewayConfig, GenerationFailure};
    use crate::scoring::ResultTier;
    use crate::session::Mode;
    use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider};

    /// Answers after a fixed delay.
    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl LlmProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            tokio::time::sleep(self.delay).await;
            Ok(GenerateResponse {
                content: r#"[{"question": "Slow?", "options": ["a", "b", "c", "d"], "answer": "a"}]"#
                    .to_string(),
                model: request.model.clone(),
                latency_ms: self.delay.as_millis() as u64,
            })
        }
    }

    fn offline() -> QuizController {
        let gateway =
            QuizGateway::offline(Arc::new(QuestionBank::builtin()), GatewayConfig::default());
        QuizController::new(Arc::new(gateway))
    }

    fn slow(delay: Duration) -> QuizController {
        let gateway = QuizGateway::new(
            Some(Arc::new(SlowProvider { delay })),
            Arc::new(QuestionBank::builtin()),
            GatewayConfig::default(),
        );
        QuizController::new(Arc::new(gateway))
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_flow_to_result() {
        let mut controller = offline();
        controller.select_topic("React").unwrap();
        assert_eq!(controller.state().mode(), Mode::Loading);

        let start = tokio::time::Instant::now();
        let outcome = controller.next_delivery().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(
            outcome,
            DeliveryOutcome::Applied(QuizSource::Fallback(GenerationFailure::Unavailable))
        );

        let state = controller.state();
        assert_eq!(state.mode(), Mode::Quiz);
        assert_eq!(state.questions().unwrap().len(), 2);
        assert_eq!(state.current_question().unwrap().text, "What is React?");

        controller
            .submit_answer("A JavaScript library for building user interfaces")
            .unwrap();
        assert_eq!(
            controller.state().current_question().unwrap().text,
            "Which hook is used for state management?"
        );
        controller.submit_answer("useState").unwrap();

        let result = controller.state().result().unwrap();
        assert_eq!((result.score, result.total), (2, 2));
        assert_eq!(result.tier, ResultTier::Perfect);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_loading_discards_late_response() {
        let mut controller = slow(Duration::from_secs(5));
        controller.select_topic("Movies").unwrap();
        controller.reset();

        assert_eq!(controller.next_delivery().await, Some(DeliveryOutcome::Stale));
        assert_eq!(controller.state().mode(), Mode::TopicSelect);
        assert_eq!(controller.state().topic(), "");
        assert!(controller.state().questions().is_none());
        assert!(!controller.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_does_not_replace_new_topic() {
        let mut controller = slow(Duration::from_secs(5));
        controller.select_topic("Movies").unwrap();
        controller.reset();

        tokio::time::sleep(Duration::from_secs(1)).await;
        controller.select_topic("History").unwrap();

        let source = controller.wait_for_quiz().await.unwrap();
        assert_eq!(
            source,
            QuizSource::Generated {
                provider: "slow".into()
            }
        );
        assert_eq!(controller.state().topic(), "History");
        assert_eq!(controller.state().mode(), Mode::Quiz);
        assert!(!controller.has_pending());
    }

    #[tokio::test]
    async fn nothing_in_flight() {
        let mut controller = offline();
        assert_eq!(controller.next_delivery().await, None);
    }

    #[tokio::test]
    async fn answers_rejected_while_loading() {
        let mut controller = offline();
        controller.select_topic("React").unwrap();
        assert!(controller.submit_answer("useState").is_err());
        assert!(controller.select_topic("JavaScript").is_err());
    }
}
