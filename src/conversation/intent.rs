use crate::conversation::state::TurnId;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ConversationIntent {
    /// User sent `text`; opens a placeholder for `turn`.
    Submit { turn: TurnId, text: String },
    /// Turn finished; its placeholder becomes the reply in place.
    Resolve { turn: TurnId, text: String },
    /// Turn failed; placeholder is dropped and the fallback reply appended.
    Fail { turn: TurnId },
    ToggleMode,
    /// Replace the topic selection. Blank and repeated labels are dropped.
    SetTopics(Vec<String>),
    /// Add the topic if absent, remove it otherwise.
    ToggleTopic(String),
}

impl Intent for ConversationIntent {}
