//! Conversation state for one chat session.
//!
//! The state is owned by the controller and only changes through
//! [`ConversationReducer`], so every transition can be tested without a
//! terminal or a network.

mod intent;
mod reducer;
mod state;

pub use intent::ConversationIntent;
pub use reducer::ConversationReducer;
pub use state::{
    ChatMessage, ConversationState, Entry, Mode, Sender, TurnId, FALLBACK_REPLY,
    PLACEHOLDER_TEXT,
};
