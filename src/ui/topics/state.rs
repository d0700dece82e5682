use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOption {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TopicPickerState {
    #[default]
    Hidden,
    Visible {
        options: Vec<TopicOption>,
        focused: usize,
        /// Checked labels in the order the user checked them.
        selection: Vec<String>,
    },
}

impl UiState for TopicPickerState {}

impl TopicPickerState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Topics to apply when the user confirms. Empty while hidden.
    pub fn selection(&self) -> &[String] {
        match self {
            Self::Visible { selection, .. } => selection,
            Self::Hidden => &[],
        }
    }
}
