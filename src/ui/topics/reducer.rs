use crate::ui::mvi::Reducer;
use crate::ui::topics::intent::TopicPickerIntent;
use crate::ui::topics::state::{TopicOption, TopicPickerState};

pub struct TopicPickerReducer;

impl Reducer for TopicPickerReducer {
    type State = TopicPickerState;
    type Intent = TopicPickerIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TopicPickerIntent::Open { topics, selected } => {
                let mut options: Vec<TopicOption> = topics
                    .into_iter()
                    .map(|label| TopicOption {
                        checked: selected.contains(&label),
                        label,
                    })
                    .collect();
                // Keep selections that are no longer in the configured list.
                for label in &selected {
                    if !options.iter().any(|option| &option.label == label) {
                        options.push(TopicOption {
                            label: label.clone(),
                            checked: true,
                        });
                    }
                }
                TopicPickerState::Visible {
                    options,
                    focused: 0,
                    selection: selected,
                }
            }
            TopicPickerIntent::Close => TopicPickerState::Hidden,
            TopicPickerIntent::MoveUp => match state {
                TopicPickerState::Visible {
                    options,
                    focused,
                    selection,
                } => {
                    let focused = if focused == 0 {
                        options.len().saturating_sub(1)
                    } else {
                        focused - 1
                    };
                    TopicPickerState::Visible {
                        options,
                        focused,
                        selection,
                    }
                }
                other => other,
            },
            TopicPickerIntent::MoveDown => match state {
                TopicPickerState::Visible {
                    options,
                    focused,
                    selection,
                } => {
                    let focused = if focused + 1 >= options.len() {
                        0
                    } else {
                        focused + 1
                    };
                    TopicPickerState::Visible {
                        options,
                        focused,
                        selection,
                    }
                }
                other => other,
            },
            TopicPickerIntent::Toggle => match state {
                TopicPickerState::Visible {
                    mut options,
                    focused,
                    mut selection,
                } => {
                    if let Some(option) = options.get_mut(focused) {
                        option.checked = !option.checked;
                        if option.checked {
                            selection.push(option.label.clone());
                        } else {
                            selection.retain(|label| label != &option.label);
                        }
                    }
                    TopicPickerState::Visible {
                        options,
                        focused,
                        selection,
                    }
                }
                other => other,
            },
            TopicPickerIntent::ClearAll => match state {
                TopicPickerState::Visible {
                    mut options,
                    focused,
                    ..
                } => {
                    for option in &mut options {
                        option.checked = false;
                    }
                    TopicPickerState::Visible {
                        options,
                        focused,
                        selection: Vec::new(),
                    }
                }
                other => other,
            },
        }
    }
}
