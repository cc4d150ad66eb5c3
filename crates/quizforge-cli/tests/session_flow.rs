//! End-to-end quiz flow through the controller, gateway and mock provider.
//!
//! Time is paused so fallback delays and slow providers run instantly.

use std::sync::Arc;
use std::time::Duration;

use quizforge_core::traits::LlmProvider;
use quizforge_core::{
    DeliveryOutcome, GatewayConfig, GenerationFailure, Mode, QuestionBank, QuizController,
    QuizGateway, QuizSource, ResultTier,
};
use quizforge_providers::mock::MockProvider;

const PYTHON_QUIZ: &str = r#"```json
[
  {"question": "Which keyword defines a function?", "options": ["func", "def", "fn", "lambda"], "answer": "def"},
  {"question": "Which type is immutable?", "options": ["list", "dict", "set", "tuple"], "answer": "tuple"},
  {"question": "What does len(\"abc\") return?", "options": ["2", "3", "4", "an error"], "answer": "3"}
]
```"#;

fn controller_with(mock: &Arc<MockProvider>) -> QuizController {
    let provider = Arc::clone(mock) as Arc<dyn LlmProvider>;
    let gateway = QuizGateway::new(
        Some(provider),
        Arc::new(QuestionBank::builtin()),
        GatewayConfig::default(),
    );
    QuizController::new(Arc::new(gateway))
}

#[tokio::test(start_paused = true)]
async fn network_failure_falls_back_to_bank_after_delay() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("React").unwrap();
    let start = tokio::time::Instant::now();
    let outcome = controller.next_delivery().await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(matches!(
        outcome,
        DeliveryOutcome::Applied(QuizSource::Fallback(GenerationFailure::Transport(_)))
    ));
    assert_eq!(mock.call_count(), 1);

    let state = controller.state();
    assert_eq!(state.mode(), Mode::Quiz);
    let texts: Vec<&str> = state
        .questions()
        .unwrap()
        .iter()
        .map(|q| q.text.as_str())
        .collect();
    assert_eq!(
        texts,
        ["What is React?", "Which hook is used for state management?"]
    );
}

#[tokio::test(start_paused = true)]
async fn fallback_quiz_all_correct_is_perfect() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("React").unwrap();
    controller.wait_for_quiz().await.unwrap();

    controller
        .submit_answer("A JavaScript library for building user interfaces")
        .unwrap();
    controller.submit_answer("useState").unwrap();

    let result = controller.state().result().unwrap();
    assert_eq!((result.score, result.total), (2, 2));
    assert_eq!(result.tier, ResultTier::Perfect);
    assert_eq!(
        result.tier.message(),
        "🎯 Genius! Did you eat the syllabus for breakfast?"
    );
}

#[tokio::test(start_paused = true)]
async fn fallback_quiz_half_correct_is_average() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("React").unwrap();
    controller.wait_for_quiz().await.unwrap();

    controller.submit_answer("A database").unwrap();
    controller.submit_answer("useState").unwrap();

    let result = controller.state().result().unwrap();
    assert_eq!((result.score, result.total), (1, 2));
    assert_eq!(result.tier, ResultTier::Average);
}

#[tokio::test(start_paused = true)]
async fn generated_quiz_is_used_without_delay() {
    let mock = Arc::new(MockProvider::with_fixed_response(PYTHON_QUIZ));
    let mut controller = controller_with(&mock);

    controller.select_topic("Python").unwrap();
    let start = tokio::time::Instant::now();
    let source = controller.wait_for_quiz().await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(
        source,
        QuizSource::Generated {
            provider: "mock".into()
        }
    );

    let request = mock.last_request().unwrap();
    assert!(request.prompt.contains("Python"));
    assert_eq!(request.model, "gpt-4o-mini");

    assert_eq!(
        controller.state().current_question().unwrap().text,
        "Which keyword defines a function?"
    );
    controller.submit_answer("def").unwrap();
    controller.submit_answer("tuple").unwrap();
    controller.submit_answer("4").unwrap();

    let result = controller.state().result().unwrap();
    assert_eq!((result.score, result.total), (2, 3));
    assert_eq!(result.tier, ResultTier::Average);
}

#[tokio::test(start_paused = true)]
async fn error_status_falls_back() {
    let mock = Arc::new(MockProvider::failing_with_status(503));
    let mut controller = controller_with(&mock);

    controller.select_topic("JavaScript").unwrap();
    let source = controller.wait_for_quiz().await.unwrap();

    assert_eq!(source, QuizSource::Fallback(GenerationFailure::Status(503)));
    assert_eq!(
        controller.state().current_question().unwrap().text,
        "What does JSON stand for?"
    );
}

#[tokio::test(start_paused = true)]
async fn unusable_response_falls_back() {
    let mock = Arc::new(MockProvider::with_fixed_response(
        "Sorry, I can't make a quiz about that.",
    ));
    let mut controller = controller_with(&mock);

    controller.select_topic("History").unwrap();
    let source = controller.wait_for_quiz().await.unwrap();

    assert!(matches!(
        source,
        QuizSource::Fallback(GenerationFailure::Malformed(_))
    ));
    assert_eq!(controller.state().topic(), "History");
}

#[tokio::test(start_paused = true)]
async fn unknown_topic_gets_default_set() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("Geography").unwrap();
    controller.wait_for_quiz().await.unwrap();

    let questions = controller.state().questions().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].text, "What is React?");
}

#[tokio::test(start_paused = true)]
async fn reset_while_loading_discards_late_delivery() {
    let mock = Arc::new(
        MockProvider::with_fixed_response(PYTHON_QUIZ).with_delay(Duration::from_secs(10)),
    );
    let mut controller = controller_with(&mock);

    controller.select_topic("Python").unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    controller.reset();

    assert_eq!(controller.next_delivery().await, Some(DeliveryOutcome::Stale));
    let state = controller.state();
    assert_eq!(state.mode(), Mode::TopicSelect);
    assert_eq!(state.topic(), "");
    assert!(state.questions().is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_twice_equals_reset_once() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("React").unwrap();
    controller.wait_for_quiz().await.unwrap();
    controller.submit_answer("useState").unwrap();

    controller.reset();
    let once = controller.state().clone();
    controller.reset();
    assert_eq!(controller.state(), &once);
    assert_eq!(once.score(), 0);
    assert_eq!(once.current_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn play_again_after_result() {
    let mock = Arc::new(MockProvider::unreachable());
    let mut controller = controller_with(&mock);

    controller.select_topic("React").unwrap();
    controller.wait_for_quiz().await.unwrap();
    controller.submit_answer("A CSS framework").unwrap();
    controller.submit_answer("useEffect").unwrap();
    assert_eq!(controller.state().result().unwrap().tier, ResultTier::Poor);

    controller.reset();
    controller.select_topic("JavaScript").unwrap();
    controller.wait_for_quiz().await.unwrap();

    assert_eq!(controller.state().topic(), "JavaScript");
    assert_eq!(controller.state().score(), 0);
    assert_eq!(mock.call_count(), 2);
}
