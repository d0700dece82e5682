//! `reqwest` implementation of [`ServiceClient`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::analytics::AnalyticsLog;
use crate::config::ServicesConfig;

use super::error::{Service, ServiceError};
use super::types::{
    ChitChatReply, ChitChatRequest, Classification, ClassifyRequest, LogRecord, Retrieval,
    SummarizeRequest, Summary,
};
use super::ServiceClient;

/// Error bodies are truncated to this many characters in error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// JSON-over-HTTP client for every collaborator.
pub struct HttpServiceClient {
    client: Client,
    /// Separate client so only retriever calls carry cookies.
    retriever: Client,
    endpoints: ServicesConfig,
}

impl HttpServiceClient {
    pub fn new(endpoints: ServicesConfig) -> Result<Self, reqwest::Error> {
        let timeout = endpoints.request_timeout_seconds.map(Duration::from_secs);
        let client = build_client(timeout, false)?;
        let retriever = if endpoints.retriever_credentials {
            build_client(timeout, true)?
        } else {
            client.clone()
        };

        Ok(Self {
            client,
            retriever,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &ServicesConfig {
        &self.endpoints
    }

    async fn post_json<B, R>(
        &self,
        client: &Client,
        service: Service,
        url: &str,
        body: &B,
    ) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(service = %service, url = %url, "Sending request");

        let start = Instant::now();
        let response = client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { service, source })?;

        let text = read_success_body(service, response).await?;
        tracing::debug!(
            service = %service,
            latency_ms = start.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Received response"
        );

        decode(service, &text)
    }
}

fn build_client(timeout: Option<Duration>, cookies: bool) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().cookie_store(cookies);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Read the body, turning non-2xx statuses into [`ServiceError::Status`].
async fn read_success_body(service: Service, response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| ServiceError::Transport { service, source })?;

    if !status.is_success() {
        return Err(ServiceError::Status {
            service,
            status: status.as_u16(),
            message: text.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }

    Ok(text)
}

fn decode<R: DeserializeOwned>(service: Service, text: &str) -> Result<R, ServiceError> {
    serde_json::from_str(text).map_err(|e| ServiceError::Decode {
        service,
        message: e.to_string(),
    })
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn classify(&self, query: &str) -> Result<Classification, ServiceError> {
        self.post_json(
            &self.client,
            Service::Classifier,
            &self.endpoints.classifier_url,
            &ClassifyRequest { query },
        )
        .await
    }

    async fn retrieve(&self, classification: &Classification) -> Result<Retrieval, ServiceError> {
        self.post_json(
            &self.retriever,
            Service::Retriever,
            &self.endpoints.retriever_url,
            classification,
        )
        .await
    }

    async fn summarize(&self, documents: &Value) -> Result<Summary, ServiceError> {
        self.post_json(
            &self.client,
            Service::Summarizer,
            &self.endpoints.summarizer_url,
            &SummarizeRequest {
                response: documents,
            },
        )
        .await
    }

    async fn chitchat(&self, message: &str) -> Result<ChitChatReply, ServiceError> {
        self.post_json(
            &self.client,
            Service::ChitChat,
            &self.endpoints.chitchat_url,
            &ChitChatRequest { message },
        )
        .await
    }

    async fn submit_log(&self, record: &LogRecord) -> Result<(), ServiceError> {
        let service = Service::LogSink;
        let response = self
            .client
            .post(&self.endpoints.log_url)
            .json(record)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { service, source })?;
        read_success_body(service, response).await?;
        Ok(())
    }

    async fn fetch_analytics(&self) -> Result<AnalyticsLog, ServiceError> {
        let service = Service::Analytics;
        let response = self
            .client
            .get(&self.endpoints.analytics_url)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { service, source })?;
        let text = read_success_body(service, response).await?;

        AnalyticsLog::parse(&text).map_err(|e| ServiceError::Decode {
            service,
            message: e.to_string(),
        })
    }
}
