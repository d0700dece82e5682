//! Clients for the remote collaborators.
//!
//! The pipeline only talks to the [`ServiceClient`] trait, so turns can be
//! driven against a scripted fake in tests and against
//! [`HttpServiceClient`] in the application.

mod error;
mod http;
mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::analytics::AnalyticsLog;

pub use error::{Service, ServiceError};
pub use http::HttpServiceClient;
pub use types::{
    ChitChatReply, Classification, LogRecord, RetrievedDocument, Retrieval, Summary,
};

/// The set of collaborators a chat turn can reach.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Map free text to topic labels and confidences.
    async fn classify(&self, query: &str) -> Result<Classification, ServiceError>;

    /// Fetch topic-scored documents. The classification is sent as-is.
    async fn retrieve(&self, classification: &Classification) -> Result<Retrieval, ServiceError>;

    /// Condense the retriever's `Response` value.
    async fn summarize(&self, documents: &Value) -> Result<Summary, ServiceError>;

    /// Free-form small talk.
    async fn chitchat(&self, message: &str) -> Result<ChitChatReply, ServiceError>;

    /// Store one completed pipeline. The response body is ignored.
    async fn submit_log(&self, record: &LogRecord) -> Result<(), ServiceError>;

    /// Load the accumulated usage log.
    async fn fetch_analytics(&self) -> Result<AnalyticsLog, ServiceError>;
}
