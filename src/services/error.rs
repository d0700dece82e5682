//! Error types for collaborator calls.

use std::fmt;
use thiserror::Error;

/// The remote collaborator a call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Classifier,
    Retriever,
    Summarizer,
    ChitChat,
    LogSink,
    Analytics,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Classifier => "classifier",
            Service::Retriever => "retriever",
            Service::Summarizer => "summarizer",
            Service::ChitChat => "chitchat",
            Service::LogSink => "log_sink",
            Service::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to a collaborator.
///
/// The three variants mirror the failure taxonomy the chat surfaces as a
/// single fallback reply: transport, non-2xx status, malformed body.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("{service} request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// Collaborator answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
    },

    /// Body was not the JSON shape we expected.
    #[error("{service} response could not be decoded: {message}")]
    Decode { service: Service, message: String },
}

impl ServiceError {
    pub fn service(&self) -> Service {
        match self {
            ServiceError::Transport { service, .. }
            | ServiceError::Status { service, .. }
            | ServiceError::Decode { service, .. } => *service,
        }
    }

    /// Short machine-readable kind, used as a tracing field.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Transport { source, .. } if source.is_timeout() => "timeout",
            ServiceError::Transport { .. } => "transport_error",
            ServiceError::Status { .. } => "status_error",
            ServiceError::Decode { .. } => "decode_error",
        }
    }
}
