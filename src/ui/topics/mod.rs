mod dialog;
mod intent;
mod reducer;
mod state;

pub use dialog::render_topic_picker;
pub use intent::TopicPickerIntent;
pub use reducer::TopicPickerReducer;
pub use state::{TopicOption, TopicPickerState};
