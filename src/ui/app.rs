use crate::analytics::AnalyticsState;
use crate::controller::ChatController;
use crate::conversation::{ConversationState, TurnId};
use crate::ui::mvi::Reducer;
use crate::ui::topics::{TopicPickerIntent, TopicPickerReducer, TopicPickerState};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tab {
    Chat,
    Analytics,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Chat => "Chatbot",
            Tab::Analytics => "Analytics",
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Chat => Tab::Analytics,
            Tab::Analytics => Tab::Chat,
        }
    }
}

pub struct App {
    should_quit: bool,
    tab: Tab,
    pane_open: bool,
    input: String,
    /// Topics offered by the picker, from config.
    topics: Vec<String>,
    /// State of the topic picker (MVI pattern).
    topic_picker: TopicPickerState,
    controller: ChatController,
}

impl App {
    pub fn new(controller: ChatController, topics: Vec<String>) -> Self {
        Self {
            should_quit: false,
            tab: Tab::Chat,
            pane_open: true,
            input: String::new(),
            topics,
            topic_picker: TopicPickerState::default(),
            controller,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switch tabs. Entering Analytics for the first time starts a fetch.
    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        let idle = matches!(self.controller.analytics(), AnalyticsState::Idle);
        if self.tab == Tab::Analytics && idle {
            self.controller.refresh_analytics();
        }
    }

    pub fn pane_open(&self) -> bool {
        self.pane_open
    }

    pub fn toggle_pane(&mut self) {
        self.pane_open = !self.pane_open;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Pasted text joins the single-line input with newlines flattened.
    pub fn on_paste(&mut self, text: &str) {
        let flattened: String = text
            .chars()
            .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
            .collect();
        self.input.push_str(&flattened);
    }

    /// Submit the input line. Blank input stays in the box untouched.
    pub fn submit_input(&mut self) -> Option<TurnId> {
        let turn = self.controller.submit(&self.input)?;
        self.input.clear();
        Some(turn)
    }

    pub fn toggle_mode(&mut self) {
        self.controller.toggle_mode();
    }

    pub fn refresh_analytics(&mut self) {
        self.controller.refresh_analytics();
    }

    pub fn conversation(&self) -> &ConversationState {
        self.controller.conversation()
    }

    pub fn analytics(&self) -> &AnalyticsState {
        self.controller.analytics()
    }

    pub fn controller_mut(&mut self) -> &mut ChatController {
        &mut self.controller
    }

    pub fn topic_picker(&self) -> &TopicPickerState {
        &self.topic_picker
    }

    pub fn open_topic_picker(&mut self) {
        let intent = TopicPickerIntent::Open {
            topics: self.topics.clone(),
            selected: self.controller.conversation().selected_topics.clone(),
        };
        self.dispatch_topics(intent);
    }

    /// Apply the picker's selection to the conversation and close it.
    pub fn apply_topic_picker(&mut self) {
        let selection = self.topic_picker.selection().to_vec();
        self.controller.set_topics(selection);
        self.dispatch_topics(TopicPickerIntent::Close);
    }

    pub fn dispatch_topics(&mut self, intent: TopicPickerIntent) {
        self.topic_picker =
            TopicPickerReducer::reduce(std::mem::take(&mut self.topic_picker), intent);
    }

    /// Fold finished background work into the view.
    pub fn on_tick(&mut self) {
        let applied = self.controller.drain_events();
        if applied > 0 {
            tracing::trace!(applied, "Applied controller events");
        }
    }
}
