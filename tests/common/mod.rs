//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use mock_backend::MockBackend;
use std::path::PathBuf;
use tempfile::TempDir;
use wikichat::config::ServicesConfig;

pub const CLASSIFY: &str = "/classify";
pub const RETRIEVE: &str = "/retriever_docs";
pub const SUMMARIZE: &str = "/summarize";
pub const CHITCHAT: &str = "/chitchat";
pub const SAVE_LOG: &str = "/saveLog";
pub const GET_LOG: &str = "/getLog";

/// Endpoints pointing every collaborator at `backend`.
pub fn services_config(backend: &MockBackend) -> ServicesConfig {
    ServicesConfig {
        classifier_url: backend.url(CLASSIFY),
        retriever_url: backend.url(RETRIEVE),
        summarizer_url: backend.url(SUMMARIZE),
        chitchat_url: backend.url(CHITCHAT),
        log_url: backend.url(SAVE_LOG),
        analytics_url: backend.url(GET_LOG),
        ..ServicesConfig::default()
    }
}

/// Write `content` to a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Config file text pointing every collaborator at `backend`.
pub fn config_toml(backend: &MockBackend) -> String {
    let services = services_config(backend);
    format!(
        r#"[services]
classifier_url = "{}"
retriever_url = "{}"
summarizer_url = "{}"
chitchat_url = "{}"
log_url = "{}"
analytics_url = "{}"
request_timeout_seconds = 5
"#,
        services.classifier_url,
        services.retriever_url,
        services.summarizer_url,
        services.chitchat_url,
        services.log_url,
        services.analytics_url,
    )
}
