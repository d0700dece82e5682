//! Sequencing of the remote calls behind one chat turn.
//!
//! ```text
//! ChitChat:   chitchat ──→ reply
//! Retrieval:  classify* ──→ retrieve ──→ summarize ──→ reply (+ log record)
//!                 └── top topic is the sentinel ──→ fixed reply
//! ```
//!
//! `*` skipped when the user picked topics. Stages run strictly in order and
//! the first failure ends the turn.

use thiserror::Error;

use crate::conversation::{Mode, TurnId};
use crate::services::{Classification, LogRecord, Service, ServiceClient, ServiceError};

/// Classifier label that sends a Retrieval turn to the small-talk reply.
pub const SENTINEL_TOPIC: &str = "Chitchat";

/// Reply for a Retrieval turn the classifier judged to be small talk.
pub const SENTINEL_REPLY: &str =
    "That sounds like small talk. Switch to ChitChat mode to have a conversation.";

/// Reply when the summarizer answered without a `summary` field.
pub const NO_SUMMARY_REPLY: &str = "No summary available";

/// Everything a turn needs, captured when the user submits.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub turn: TurnId,
    pub input: String,
    pub mode: Mode,
    pub topics: Vec<String>,
}

/// Result of a successful turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub text: String,
    /// Present only when the full retrieval pipeline ran.
    pub record: Option<LogRecord>,
}

impl TurnReply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            record: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {0}", stage = .0.service())]
    Service(#[from] ServiceError),
}

impl PipelineError {
    /// The collaborator whose call ended the turn.
    pub fn stage(&self) -> Service {
        match self {
            PipelineError::Service(err) => err.service(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::Service(err) => err.error_type(),
        }
    }
}

/// Run one turn to completion.
pub async fn run_turn(
    services: &dyn ServiceClient,
    request: &TurnRequest,
) -> Result<TurnReply, PipelineError> {
    tracing::debug!(turn = %request.turn, mode = %request.mode, "Starting turn");

    match request.mode {
        Mode::ChitChat => {
            let reply = services.chitchat(&request.input).await?;
            Ok(TurnReply::text(reply.response))
        }
        Mode::Retrieval => retrieval_turn(services, request).await,
    }
}

async fn retrieval_turn(
    services: &dyn ServiceClient,
    request: &TurnRequest,
) -> Result<TurnReply, PipelineError> {
    let classification = if request.topics.is_empty() {
        let mut classification = services.classify(&request.input).await?;
        if classification.query.is_empty() {
            classification.query = request.input.clone();
        }
        classification
    } else {
        Classification::from_selection(&request.topics, &request.input)
    };

    if classification.top_topic() == Some(SENTINEL_TOPIC) {
        tracing::debug!(turn = %request.turn, "Classifier flagged small talk");
        return Ok(TurnReply::text(SENTINEL_REPLY));
    }

    let retrieval = services.retrieve(&classification).await?;
    tracing::debug!(
        turn = %request.turn,
        documents = retrieval.raw_documents().len(),
        time_taken = retrieval.time_taken,
        "Retrieved documents"
    );

    let summary = services.summarize(&retrieval.response).await?;
    let text = match summary.summary.as_deref() {
        Some(summary) => format!("Summary: {}", summary),
        None => NO_SUMMARY_REPLY.to_string(),
    };

    Ok(TurnReply {
        text,
        record: Some(LogRecord {
            classifier: classification,
            retriever: retrieval,
            summarizer: summary,
        }),
    })
}


#[cfg(test)]
mod tests {
    use super::fake::{economy_classification, two_documents, Call, FakeServices};
    use super::*;
    use serde_json::json;

    fn request(input: &str, mode: Mode, topics: &[&str]) -> TurnRequest {
        TurnRequest {
            turn: TurnId::new(),
            input: input.to_string(),
            mode,
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn full_pipeline_replies_with_summary() {
        let services = FakeServices::new()
            .reply(economy_classification())
            .reply(two_documents())
            .reply(json!({"summary": "Inflation is rising."}));

        let reply = run_turn(&services, &request("What is inflation?", Mode::Retrieval, &[]))
            .await
            .unwrap();

        assert_eq!(reply.text, "Summary: Inflation is rising.");
        let calls = services.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::Classify("What is inflation?".to_string()));
    }

    #[tokio::test]
    async fn retriever_receives_full_classifier_output() {
        let services = FakeServices::new()
            .reply(json!({
                "topics": ["Economy"],
                "probability_values": [0.9],
                "time": 0.1,
                "model_version": "v2"
            }))
            .reply(two_documents())
            .reply(json!({"summary": "ok"}));

        run_turn(&services, &request("prices", Mode::Retrieval, &[]))
            .await
            .unwrap();

        match &services.calls()[1] {
            Call::Retrieve(body) => {
                assert_eq!(body["model_version"], "v2");
                assert_eq!(body["query"], "prices");
                assert_eq!(body["topics"], json!(["Economy"]));
            }
            other => panic!("expected retrieve call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn summarizer_receives_retriever_response() {
        let services = FakeServices::new()
            .reply(economy_classification())
            .reply(two_documents())
            .reply(json!({"summary": "ok"}));

        run_turn(&services, &request("prices", Mode::Retrieval, &[]))
            .await
            .unwrap();

        assert_eq!(
            services.calls()[2],
            Call::Summarize(two_documents()["Response"].clone())
        );
    }

    #[tokio::test]
    async fn selected_topics_skip_classifier() {
        let services = FakeServices::new()
            .reply(two_documents())
            .reply(json!({"summary": "Travel is fun."}));

        let reply = run_turn(
            &services,
            &request("where to go", Mode::Retrieval, &["Travel", "Food"]),
        )
        .await
        .unwrap();

        assert_eq!(reply.text, "Summary: Travel is fun.");
        let calls = services.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::Classify(_))));
        match &calls[0] {
            Call::Retrieve(body) => {
                assert_eq!(body["topics"], json!(["Travel", "Food"]));
                assert_eq!(body["probability_values"], json!([1.0, 1.0]));
                assert_eq!(body["time"], json!(0.0));
                assert_eq!(body["query"], "where to go");
            }
            other => panic!("expected retrieve call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sentinel_topic_short_circuits() {
        let services = FakeServices::new().reply(json!({
            "topics": ["Chitchat", "Health"],
            "probability_values": [0.7, 0.3],
            "time": 0.02
        }));

        let reply = run_turn(&services, &request("how are you", Mode::Retrieval, &[]))
            .await
            .unwrap();

        assert_eq!(reply.text, SENTINEL_REPLY);
        assert!(reply.record.is_none());
        assert_eq!(services.calls().len(), 1);
    }

    #[tokio::test]
    async fn selected_sentinel_topic_also_short_circuits() {
        let services = FakeServices::new();
        let reply = run_turn(&services, &request("hey", Mode::Retrieval, &["Chitchat"]))
            .await
            .unwrap();
        assert_eq!(reply.text, SENTINEL_REPLY);
        assert!(services.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_summary_uses_fallback_text() {
        let services = FakeServices::new()
            .reply(economy_classification())
            .reply(two_documents())
            .reply(json!({"detail": "empty corpus"}));

        let reply = run_turn(&services, &request("q", Mode::Retrieval, &[]))
            .await
            .unwrap();

        assert_eq!(reply.text, NO_SUMMARY_REPLY);
        assert!(reply.record.is_some());
    }

    #[tokio::test]
    async fn record_carries_all_three_stages() {
        let services = FakeServices::new()
            .reply(economy_classification())
            .reply(two_documents())
            .reply(json!({"summary": "s", "time": 1.25}));

        let reply = run_turn(&services, &request("q", Mode::Retrieval, &[]))
            .await
            .unwrap();
        let record = reply.record.unwrap();

        assert_eq!(record.classifier.topics, vec!["Economy"]);
        assert_eq!(record.retriever.time_taken, 0.31);
        assert_eq!(record.summarizer.time, Some(1.25));
    }

    #[tokio::test]
    async fn chitchat_makes_exactly_one_call() {
        let services = FakeServices::new().reply(json!({"response": "Hi there!"}));

        let reply = run_turn(&services, &request("hello", Mode::ChitChat, &["Travel"]))
            .await
            .unwrap();

        assert_eq!(reply.text, "Hi there!");
        assert!(reply.record.is_none());
        assert_eq!(services.calls(), vec![Call::ChitChat("hello".to_string())]);
    }

    #[tokio::test]
    async fn classifier_failure_stops_pipeline() {
        let services = FakeServices::new().fail(Service::Classifier);

        let err = run_turn(&services, &request("q", Mode::Retrieval, &[]))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Service::Classifier);
        assert_eq!(err.error_type(), "status_error");
        assert_eq!(services.calls().len(), 1);
    }

    #[tokio::test]
    async fn retriever_failure_skips_summarizer() {
        let services = FakeServices::new()
            .reply(economy_classification())
            .fail(Service::Retriever);

        let err = run_turn(&services, &request("q", Mode::Retrieval, &[]))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Service::Retriever);
        assert!(!services
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Summarize(_))));
    }

    #[tokio::test]
    async fn malformed_classifier_output_is_an_error() {
        let services = FakeServices::new().reply(json!({"labels": ["Economy"]}));

        let err = run_turn(&services, &request("q", Mode::Retrieval, &[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Service(ServiceError::Decode { .. })
        ));
        assert_eq!(err.error_type(), "decode_error");
    }

    #[test]
    fn error_message_names_failing_stage() {
        let err = PipelineError::from(ServiceError::Status {
            service: Service::Summarizer,
            status: 503,
            message: "busy".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "summarizer stage failed: summarizer returned 503: busy"
        );
    }
}
