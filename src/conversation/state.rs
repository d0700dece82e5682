use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ui::mvi::UiState;

/// Bot reply shown whenever a turn fails at any stage.
pub const FALLBACK_REPLY: &str = "Something went wrong. Please try again.";

/// Text rendered for a turn that is still waiting on its reply.
pub const PLACEHOLDER_TEXT: &str = "Processing...";

/// Which request path a turn takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Retrieval,
    ChitChat,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Retrieval => Mode::ChitChat,
            Mode::ChitChat => Mode::Retrieval,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Retrieval => "Retrieval",
            Mode::ChitChat => "ChitChat",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One settled line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Identifies one turn from submission until its reply lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(ChatMessage),
    /// Reply slot of a turn still in flight.
    Pending(TurnId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversationState {
    pub entries: Vec<Entry>,
    pub mode: Mode,
    /// Topics chosen by the user, in selection order.
    pub selected_topics: Vec<String>,
}

impl UiState for ConversationState {}

impl ConversationState {
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Settled messages in display order, placeholders skipped.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Pending(_) => None,
        })
    }

    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Pending(_)))
            .count()
    }

    pub fn is_pending(&self, turn: TurnId) -> bool {
        self.entries.contains(&Entry::Pending(turn))
    }

    pub fn last_bot_message(&self) -> Option<&ChatMessage> {
        self.messages()
            .filter(|message| message.sender == Sender::Bot)
            .last()
    }
}
