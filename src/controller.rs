//! Owner of the chat session: conversation, analytics and the tasks that
//! feed them.
//!
//! Remote work runs on tokio tasks. Tasks never touch state directly; they
//! report back through a channel and the controller folds each event in via
//! the reducers. Several turns can be in flight at once.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::analytics::{AnalyticsIntent, AnalyticsLog, AnalyticsReducer, AnalyticsReport, AnalyticsState};
use crate::conversation::{ConversationIntent, ConversationReducer, ConversationState, Mode, TurnId};
use crate::pipeline::{run_turn, PipelineError, TurnReply, TurnRequest};
use crate::services::{LogRecord, ServiceClient, ServiceError};
use crate::ui::mvi::Reducer;

/// Completion reported by a background task.
#[derive(Debug)]
pub enum ControllerEvent {
    TurnFinished {
        turn: TurnId,
        result: Result<TurnReply, PipelineError>,
    },
    AnalyticsFetched(Result<AnalyticsLog, ServiceError>),
}

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    };
}

pub struct ChatController {
    conversation: ConversationState,
    analytics: AnalyticsState,
    services: Arc<dyn ServiceClient>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    /// Log submissions. Never awaited on the reply path.
    log_tasks: JoinSet<()>,
}

impl ChatController {
    pub fn new(services: Arc<dyn ServiceClient>, mode: Mode) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            conversation: ConversationState::with_mode(mode),
            analytics: AnalyticsState::default(),
            services,
            events_tx,
            events_rx,
            log_tasks: JoinSet::new(),
        }
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn analytics(&self) -> &AnalyticsState {
        &self.analytics
    }

    pub fn mode(&self) -> Mode {
        self.conversation.mode
    }

    pub fn toggle_mode(&mut self) {
        self.dispatch(ConversationIntent::ToggleMode);
    }

    pub fn set_topics(&mut self, topics: Vec<String>) {
        self.dispatch(ConversationIntent::SetTopics(topics));
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        self.dispatch(ConversationIntent::ToggleTopic(topic.to_string()));
    }

    /// Start a turn for `text`.
    ///
    /// Returns `None` for blank input. Must be called inside a tokio runtime.
    pub fn submit(&mut self, text: &str) -> Option<TurnId> {
        if text.trim().is_empty() {
            return None;
        }

        let request = TurnRequest {
            turn: TurnId::new(),
            input: text.to_string(),
            mode: self.conversation.mode,
            topics: self.conversation.selected_topics.clone(),
        };
        let turn = request.turn;
        self.dispatch(ConversationIntent::Submit {
            turn,
            text: request.input.clone(),
        });

        tracing::info!(
            turn = %turn,
            mode = %request.mode,
            topics = request.topics.len(),
            "Turn submitted"
        );

        let services = Arc::clone(&self.services);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = run_turn(services.as_ref(), &request).await;
            let _ = events.send(ControllerEvent::TurnFinished { turn, result });
        });

        Some(turn)
    }

    /// Start fetching the usage log. Must be called inside a tokio runtime.
    pub fn refresh_analytics(&mut self) {
        self.dispatch_analytics(AnalyticsIntent::Start);
        let services = Arc::clone(&self.services);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = services.fetch_analytics().await;
            let _ = events.send(ControllerEvent::AnalyticsFetched(result));
        });
    }

    /// Fold one task completion into the state.
    pub fn apply(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::TurnFinished { turn, result } => match result {
                Ok(reply) => {
                    tracing::info!(turn = %turn, "Turn completed");
                    self.dispatch(ConversationIntent::Resolve {
                        turn,
                        text: reply.text,
                    });
                    if let Some(record) = reply.record {
                        self.submit_log(record);
                    }
                }
                Err(err) => {
                    tracing::error!(
                        turn = %turn,
                        stage = %err.stage(),
                        error_type = err.error_type(),
                        error = %err,
                        "Turn failed"
                    );
                    self.dispatch(ConversationIntent::Fail { turn });
                }
            },
            ControllerEvent::AnalyticsFetched(result) => match result {
                Ok(log) => {
                    let report = AnalyticsReport::from_log(&log);
                    tracing::debug!(queries = report.queries, "Analytics loaded");
                    self.dispatch_analytics(AnalyticsIntent::Loaded { report });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Analytics fetch failed");
                    self.dispatch_analytics(AnalyticsIntent::Failed {
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    /// Apply every event already delivered without waiting. Returns how many
    /// were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        self.reap_log_tasks();
        applied
    }

    /// Wait for the next task completion.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Wait until no turn is pending.
    pub async fn settle(&mut self) {
        while self.conversation.pending_count() > 0 {
            match self.next_event().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    /// Wait for outstanding log submissions. Used on shutdown.
    pub async fn flush_logs(&mut self) {
        while let Some(result) = self.log_tasks.join_next().await {
            if let Err(err) = result {
                tracing::warn!(error = %err, "Log task aborted");
            }
        }
    }

    fn submit_log(&mut self, record: LogRecord) {
        let services = Arc::clone(&self.services);
        self.log_tasks.spawn(async move {
            match services.submit_log(&record).await {
                Ok(()) => tracing::debug!("Pipeline record logged"),
                Err(err) => tracing::warn!(error = %err, "Log submission failed"),
            }
        });
    }

    fn reap_log_tasks(&mut self) {
        while let Some(result) = self.log_tasks.try_join_next() {
            if let Err(err) = result {
                tracing::warn!(error = %err, "Log task aborted");
            }
        }
    }

    fn dispatch(&mut self, intent: ConversationIntent) {
        dispatch_mvi!(self, conversation, ConversationReducer, intent);
    }

    fn dispatch_analytics(&mut self, intent: AnalyticsIntent) {
        dispatch_mvi!(self, analytics, AnalyticsReducer, intent);
    }
}
