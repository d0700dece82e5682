use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum TopicPickerIntent {
    /// Show the picker over `topics`, pre-checking `selected`.
    Open {
        topics: Vec<String>,
        selected: Vec<String>,
    },
    Close,
    MoveUp,
    MoveDown,
    /// Check or uncheck the focused topic.
    Toggle,
    /// Uncheck everything so the classifier decides again.
    ClearAll,
}

impl Intent for TopicPickerIntent {}
