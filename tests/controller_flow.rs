//! End-to-end turns through the controller against a mock collaborator
//! server.

mod common;

use common::mock_backend::{MockBackend, MockResponse};
use common::{services_config, CHITCHAT, CLASSIFY, RETRIEVE, SAVE_LOG, SUMMARIZE};
use serde_json::json;
use std::sync::Arc;
use wikichat::controller::ChatController;
use wikichat::conversation::{Mode, Sender, FALLBACK_REPLY};
use wikichat::pipeline::SENTINEL_REPLY;
use wikichat::services::{HttpServiceClient, ServiceClient};

fn controller(backend: &MockBackend, mode: Mode) -> ChatController {
    let client = HttpServiceClient::new(services_config(backend)).unwrap();
    let services: Arc<dyn ServiceClient> = Arc::new(client);
    ChatController::new(services, mode)
}

async fn script_full_pipeline(backend: &MockBackend, summary: serde_json::Value) {
    backend
        .enqueue(
            CLASSIFY,
            MockResponse::value(json!({
                "topics": ["Economy"],
                "probability_values": [0.93],
                "time": 0.04
            })),
        )
        .await;
    backend
        .enqueue(
            RETRIEVE,
            MockResponse::value(json!({
                "Response": {
                    "results": [{"title": "Inflation", "topic": "Economy", "score": 4.2}],
                    "total_results": 1
                },
                "time_taken": "0.31"
            })),
        )
        .await;
    backend
        .enqueue(SUMMARIZE, MockResponse::value(summary))
        .await;
}

#[tokio::test]
async fn retrieval_turn_replies_with_summary_and_logs() {
    let backend = MockBackend::start().await;
    script_full_pipeline(
        &backend,
        json!({"summary": "Inflation is rising.", "time": 0.8}),
    )
    .await;
    backend
        .enqueue(SAVE_LOG, MockResponse::value(json!({"message": "saved"})))
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);

    chat.submit("What is inflation?");
    chat.settle().await;
    chat.flush_logs().await;

    let messages: Vec<_> = chat.conversation().messages().cloned().collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "What is inflation?");
    assert_eq!(messages[1].text, "Summary: Inflation is rising.");

    let summarize = backend.requests_to(SUMMARIZE).await;
    assert_eq!(
        summarize[0].json()["Response"]["results"][0]["title"],
        "Inflation"
    );

    let logs = backend.requests_to(SAVE_LOG).await;
    assert_eq!(logs.len(), 1);
    let record = logs[0].json();
    assert_eq!(record["classifier"]["query"], "What is inflation?");
    assert_eq!(record["retriever"]["time_taken"], json!(0.31));
    assert_eq!(record["summarizer"]["summary"], "Inflation is rising.");
}

#[tokio::test]
async fn chitchat_turn_makes_one_call() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(CHITCHAT, MockResponse::value(json!({"response": "Hello!"})))
        .await;
    let mut chat = controller(&backend, Mode::ChitChat);

    chat.submit("hello");
    chat.settle().await;
    chat.flush_logs().await;

    assert_eq!(backend.captured_requests().await.len(), 1);
    assert_eq!(
        chat.conversation().last_bot_message().unwrap().text,
        "Hello!"
    );
}

#[tokio::test]
async fn selected_topics_skip_classifier() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(
            RETRIEVE,
            MockResponse::value(json!({"Response": [], "time_taken": 0.2})),
        )
        .await;
    backend
        .enqueue(SUMMARIZE, MockResponse::value(json!({"summary": "Pack light."})))
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);
    chat.set_topics(vec!["Travel".to_string()]);

    chat.submit("tips for a trip");
    chat.settle().await;
    chat.flush_logs().await;

    assert!(backend.requests_to(CLASSIFY).await.is_empty());
    let body = backend.requests_to(RETRIEVE).await[0].json();
    assert_eq!(body["topics"], json!(["Travel"]));
    assert_eq!(body["probability_values"], json!([1.0]));
    assert_eq!(
        chat.conversation().last_bot_message().unwrap().text,
        "Summary: Pack light."
    );
}

#[tokio::test]
async fn sentinel_topic_skips_retrieval_and_logging() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(
            CLASSIFY,
            MockResponse::value(json!({
                "topics": ["Chitchat"],
                "probability_values": [0.99],
                "time": 0.01
            })),
        )
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);

    chat.submit("how are you?");
    chat.settle().await;
    chat.flush_logs().await;

    assert_eq!(
        chat.conversation().last_bot_message().unwrap().text,
        SENTINEL_REPLY
    );
    let paths: Vec<String> = backend
        .captured_requests()
        .await
        .into_iter()
        .map(|req| req.path)
        .collect();
    assert_eq!(paths, vec![CLASSIFY.to_string()]);
}

#[tokio::test]
async fn classifier_error_yields_fallback_without_log() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(CLASSIFY, MockResponse::error(500, "boom"))
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);

    chat.submit("What is inflation?");
    chat.settle().await;
    chat.flush_logs().await;

    let state = chat.conversation();
    assert_eq!(state.message_count(), 2);
    assert_eq!(state.pending_count(), 0);
    assert_eq!(state.last_bot_message().unwrap().text, FALLBACK_REPLY);
    assert!(backend.requests_to(RETRIEVE).await.is_empty());
    assert!(backend.requests_to(SAVE_LOG).await.is_empty());
}

#[tokio::test]
async fn retriever_error_yields_fallback_without_log() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(
            CLASSIFY,
            MockResponse::value(json!({
                "topics": ["Health"],
                "probability_values": [0.5],
                "time": 0.1
            })),
        )
        .await;
    backend
        .enqueue(RETRIEVE, MockResponse::error(502, "index offline"))
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);

    chat.submit("flu symptoms");
    chat.settle().await;
    chat.flush_logs().await;

    assert_eq!(
        chat.conversation().last_bot_message().unwrap().text,
        FALLBACK_REPLY
    );
    assert!(backend.requests_to(SUMMARIZE).await.is_empty());
    assert!(backend.requests_to(SAVE_LOG).await.is_empty());
}

#[tokio::test]
async fn log_sink_failure_does_not_change_reply() {
    let backend = MockBackend::start().await;
    script_full_pipeline(&backend, json!({"summary": "ok"})).await;
    backend
        .enqueue(SAVE_LOG, MockResponse::error(500, "disk full"))
        .await;
    let mut chat = controller(&backend, Mode::Retrieval);

    chat.submit("q");
    chat.settle().await;
    chat.flush_logs().await;

    assert_eq!(backend.requests_to(SAVE_LOG).await.len(), 1);
    assert_eq!(chat.conversation().message_count(), 2);
    assert_eq!(
        chat.conversation().last_bot_message().unwrap().text,
        "Summary: ok"
    );
}

#[tokio::test]
async fn slow_turn_does_not_block_later_turn() {
    let backend = MockBackend::start().await;
    backend
        .enqueue(
            CHITCHAT,
            MockResponse::value(json!({"response": "slow"})).with_delay(300),
        )
        .await;
    backend
        .enqueue(CHITCHAT, MockResponse::value(json!({"response": "fast"})))
        .await;
    let mut chat = controller(&backend, Mode::ChitChat);

    let first = chat.submit("first").unwrap();
    // Let the first request reach the server before the second is sent.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let second = chat.submit("second").unwrap();

    let event = chat.next_event().await.unwrap();
    chat.apply(event);
    assert!(chat.conversation().is_pending(first));
    assert!(!chat.conversation().is_pending(second));

    chat.settle().await;
    let replies: Vec<String> = chat
        .conversation()
        .messages()
        .filter(|m| m.sender == Sender::Bot)
        .map(|m| m.text.clone())
        .collect();
    // Replies stay in the slot of the turn that asked.
    assert_eq!(replies, vec!["slow".to_string(), "fast".to_string()]);
}
