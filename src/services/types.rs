//! Wire types for the collaborator services.
//!
//! Responses keep every field they were sent with (`extra`), because the
//! classifier output is forwarded verbatim to the retriever and the whole
//! chain ends up in the log record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classifier output, also the retriever's request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub topics: Vec<String>,
    #[serde(default)]
    pub probability_values: Vec<f64>,
    #[serde(default, deserialize_with = "seconds::deserialize")]
    pub time: f64,
    #[serde(default)]
    pub query: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Classification {
    /// Classification built from a user's own topic choice: every topic at
    /// probability 1, no classifier time spent.
    pub fn from_selection(topics: &[String], query: &str) -> Self {
        Self {
            topics: topics.to_vec(),
            probability_values: vec![1.0; topics.len()],
            time: 0.0,
            query: query.to_string(),
            extra: Map::new(),
        }
    }

    pub fn top_topic(&self) -> Option<&str> {
        self.topics.first().map(String::as_str)
    }
}

/// Retriever output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    /// Retrieved documents, kept as sent. Either a bare array or an object
    /// wrapping a `results` array.
    #[serde(rename = "Response")]
    pub response: Value,
    #[serde(default, deserialize_with = "seconds::deserialize")]
    pub time_taken: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Retrieval {
    /// Raw document objects, whichever shape the retriever used.
    pub fn raw_documents(&self) -> &[Value] {
        let list = match &self.response {
            Value::Object(map) => map.get("results"),
            other => Some(other),
        };
        match list {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Documents that carry at least a topic or a score.
    pub fn documents(&self) -> Vec<RetrievedDocument> {
        self.raw_documents()
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .collect()
    }
}

/// One scored document as reported by the retriever.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedDocument {
    #[serde(default)]
    pub topic: String,
    #[serde(default, deserialize_with = "seconds::deserialize")]
    pub score: f64,
}

/// Summarizer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(
        default,
        deserialize_with = "seconds::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Chit-chat reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChitChatReply {
    pub response: String,
}

/// Aggregate record sent to the log sink after a full pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub classifier: Classification,
    pub retriever: Retrieval,
    pub summarizer: Summary,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    #[serde(rename = "Response")]
    pub response: &'a Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChitChatRequest<'a> {
    pub message: &'a str,
}

/// Timing and score fields arrive either as JSON numbers or as numeric
/// strings (`"time_taken": "0.412"`).
mod seconds {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null(()),
    }

    fn parse<E: Error>(raw: Raw) -> Result<Option<f64>, E> {
        match raw {
            Raw::Number(value) => Ok(Some(value)),
            Raw::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got \"{}\"", text))),
            Raw::Null(()) => Ok(None),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(parse(Raw::deserialize(deserializer)?)?.unwrap_or_default())
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        parse(Raw::deserialize(deserializer)?)
    }
}
