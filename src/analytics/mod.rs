//! Usage analytics computed from the log sink's records.

mod intent;
mod reducer;
mod state;

use serde::Deserialize;
use std::collections::HashMap;

use crate::services::LogRecord;

pub use intent::AnalyticsIntent;
pub use reducer::AnalyticsReducer;
pub use state::AnalyticsState;

/// Accumulated pipeline records as served by the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AnalyticsLog {
    #[serde(default)]
    pub results: Vec<LogRecord>,
}

impl AnalyticsLog {
    /// Parse an analytics body.
    ///
    /// Accepts the `{"results": [...]}` object, the same object wrapped in a
    /// JSON string, or one record per line as the log sink writes them.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::String(inner)) => Self::parse(&inner),
            Ok(value) if value.get("classifier").is_some() => Ok(Self {
                results: vec![serde_json::from_value(value)?],
            }),
            Ok(value) => serde_json::from_value(value),
            Err(whole_err) => {
                let mut results = Vec::new();
                for line in trimmed.lines().filter(|line| !line.trim().is_empty()) {
                    match serde_json::from_str::<LogRecord>(line) {
                        Ok(record) => results.push(record),
                        Err(_) => return Err(whole_err),
                    }
                }
                Ok(Self { results })
            }
        }
    }
}

/// Seconds spent in each remote stage of one query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageTimings {
    pub classifier: f64,
    pub retriever: f64,
    pub summarizer: f64,
}

impl StageTimings {
    fn of(record: &LogRecord) -> Self {
        Self {
            classifier: record.classifier.time,
            retriever: record.retriever.time_taken,
            summarizer: record.summarizer.time.unwrap_or_default(),
        }
    }
}

/// Breakdown of the latest query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecentQuery {
    pub query: String,
    pub timings: StageTimings,
    /// Classifier topics with their probabilities, in classifier order.
    pub topics: Vec<(String, f64)>,
    /// Summed retrieval score per topic.
    pub scores: Vec<(String, f64)>,
}

/// Aggregates shown on the analytics tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsReport {
    pub queries: usize,
    /// One entry per query, oldest first.
    pub timings: Vec<StageTimings>,
    /// Mean classifier probability per topic.
    pub average_probability: Vec<(String, f64)>,
    /// Retrieved documents per topic.
    pub document_counts: Vec<(String, usize)>,
    /// `ln(1 + mean score)` per topic.
    pub score_contribution: Vec<(String, f64)>,
    pub recent: Option<RecentQuery>,
}

impl AnalyticsReport {
    /// Build the report. Topic series keep first-seen order.
    pub fn from_log(log: &AnalyticsLog) -> Self {
        let timings = log.results.iter().map(StageTimings::of).collect();

        let mut probabilities = Tally::default();
        let mut documents = Tally::default();
        for record in &log.results {
            let classifier = &record.classifier;
            for (topic, probability) in classifier
                .topics
                .iter()
                .zip(classifier.probability_values.iter())
            {
                probabilities.add(topic, *probability);
            }
            for doc in record.retriever.documents() {
                documents.add(&doc.topic, doc.score);
            }
        }

        Self {
            queries: log.results.len(),
            timings,
            average_probability: probabilities.means(),
            document_counts: documents.counts(),
            score_contribution: documents
                .means()
                .into_iter()
                .map(|(topic, mean)| (topic, (1.0 + mean).ln()))
                .collect(),
            recent: log.results.last().map(recent_query),
        }
    }
}

fn recent_query(record: &LogRecord) -> RecentQuery {
    let classifier = &record.classifier;
    let mut scores = Tally::default();
    for doc in record.retriever.documents() {
        scores.add(&doc.topic, doc.score);
    }

    RecentQuery {
        query: classifier.query.clone(),
        timings: StageTimings::of(record),
        topics: classifier
            .topics
            .iter()
            .cloned()
            .zip(classifier.probability_values.iter().copied())
            .collect(),
        scores: scores.sums(),
    }
}

/// Per-topic sum and count, remembering insertion order.
#[derive(Default)]
struct Tally {
    order: Vec<String>,
    totals: HashMap<String, (f64, usize)>,
}

impl Tally {
    fn add(&mut self, topic: &str, value: f64) {
        if !self.totals.contains_key(topic) {
            self.order.push(topic.to_string());
        }
        let entry = self.totals.entry(topic.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    fn collect<T>(&self, f: impl Fn(f64, usize) -> T) -> Vec<(String, T)> {
        self.order
            .iter()
            .filter_map(|topic| {
                self.totals
                    .get(topic)
                    .map(|(total, count)| (topic.clone(), f(*total, *count)))
            })
            .collect()
    }

    fn means(&self) -> Vec<(String, f64)> {
        self.collect(|total, count| total / count as f64)
    }

    fn sums(&self) -> Vec<(String, f64)> {
        self.collect(|total, _| total)
    }

    fn counts(&self) -> Vec<(String, usize)> {
        self.collect(|_, count| count)
    }
}
