use serde::{Deserialize, Serialize};

use crate::conversation::Mode;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Endpoints of the remote collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Topic classifier (`POST {query}`).
    #[serde(default = "default_classifier_url")]
    pub classifier_url: String,
    /// Document retriever (`POST` classifier output).
    #[serde(default = "default_retriever_url")]
    pub retriever_url: String,
    /// Summarizer (`POST {Response}`).
    #[serde(default = "default_summarizer_url")]
    pub summarizer_url: String,
    /// Chit-chat endpoint (`POST {message}`).
    #[serde(default = "default_chitchat_url")]
    pub chitchat_url: String,
    /// Log sink receiving one record per completed pipeline.
    #[serde(default = "default_log_url")]
    pub log_url: String,
    /// Source of the aggregated usage log shown in the analytics tab.
    #[serde(default = "default_analytics_url")]
    pub analytics_url: String,
    /// Keep cookies across retriever calls (credentialed requests).
    #[serde(default)]
    pub retriever_credentials: bool,
    /// Optional whole-request timeout. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

/// Chat behaviour defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Mode the session starts in.
    #[serde(default)]
    pub default_mode: Mode,
    /// Topics offered by the topic picker.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

fn default_classifier_url() -> String {
    "http://127.0.0.1:9998/classify".to_string()
}

fn default_retriever_url() -> String {
    "http://127.0.0.1:9999/retriever_docs".to_string()
}

fn default_summarizer_url() -> String {
    "http://127.0.0.1:9997/summarize".to_string()
}

fn default_chitchat_url() -> String {
    "http://127.0.0.1:5000/chitchat".to_string()
}

fn default_log_url() -> String {
    "http://127.0.0.1:5000/saveLog".to_string()
}

fn default_analytics_url() -> String {
    "http://127.0.0.1:5000/getLog".to_string()
}

fn default_topics() -> Vec<String> {
    [
        "Health",
        "Environment",
        "Technology",
        "Economy",
        "Entertainment",
        "Sports",
        "Politics",
        "Education",
        "Travel",
        "Food",
    ]
    .iter()
    .map(|topic| topic.to_string())
    .collect()
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            classifier_url: default_classifier_url(),
            retriever_url: default_retriever_url(),
            summarizer_url: default_summarizer_url(),
            chitchat_url: default_chitchat_url(),
            log_url: default_log_url(),
            analytics_url: default_analytics_url(),
            retriever_credentials: false,
            request_timeout_seconds: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default(),
            topics: default_topics(),
        }
    }
}

impl ServicesConfig {
    /// All endpoints with their field names, for validation and display.
    pub fn endpoints(&self) -> [(&'static str, &str); 6] {
        [
            ("classifier_url", &self.classifier_url),
            ("retriever_url", &self.retriever_url),
            ("summarizer_url", &self.summarizer_url),
            ("chitchat_url", &self.chitchat_url),
            ("log_url", &self.log_url),
            ("analytics_url", &self.analytics_url),
        ]
    }
}
