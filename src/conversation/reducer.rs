use crate::conversation::intent::ConversationIntent;
use crate::conversation::state::{ChatMessage, ConversationState, Entry, TurnId, FALLBACK_REPLY};
use crate::ui::mvi::Reducer;

pub struct ConversationReducer;

impl Reducer for ConversationReducer {
    type State = ConversationState;
    type Intent = ConversationIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ConversationIntent::Submit { turn, text } => {
                if text.trim().is_empty() {
                    return state;
                }
                state.entries.push(Entry::Message(ChatMessage::user(text)));
                state.entries.push(Entry::Pending(turn));
                state
            }
            ConversationIntent::Resolve { turn, text } => {
                let reply = Entry::Message(ChatMessage::bot(text));
                match position_of(&state, turn) {
                    Some(index) => state.entries[index] = reply,
                    // Unknown turn: nothing to replace, keep the reply anyway
                    None => state.entries.push(reply),
                }
                state
            }
            ConversationIntent::Fail { turn } => {
                if let Some(index) = position_of(&state, turn) {
                    state.entries.remove(index);
                }
                state
                    .entries
                    .push(Entry::Message(ChatMessage::bot(FALLBACK_REPLY)));
                state
            }
            ConversationIntent::ToggleMode => {
                state.mode = state.mode.toggled();
                state
            }
            ConversationIntent::SetTopics(topics) => {
                let mut selected: Vec<String> = Vec::with_capacity(topics.len());
                for topic in topics {
                    let topic = topic.trim();
                    if !topic.is_empty() && !selected.iter().any(|t| t == topic) {
                        selected.push(topic.to_string());
                    }
                }
                state.selected_topics = selected;
                state
            }
            ConversationIntent::ToggleTopic(topic) => {
                let topic = topic.trim();
                if topic.is_empty() {
                    return state;
                }
                match state.selected_topics.iter().position(|t| t == topic) {
                    Some(index) => {
                        state.selected_topics.remove(index);
                    }
                    None => state.selected_topics.push(topic.to_string()),
                }
                state
            }
        }
    }
}

fn position_of(state: &ConversationState, turn: TurnId) -> Option<usize> {
    state
        .entries
        .iter()
        .position(|entry| *entry == Entry::Pending(turn))
}
