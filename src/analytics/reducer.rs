use crate::analytics::intent::AnalyticsIntent;
use crate::analytics::state::AnalyticsState;
use crate::ui::mvi::Reducer;

pub struct AnalyticsReducer;

impl Reducer for AnalyticsReducer {
    type State = AnalyticsState;
    type Intent = AnalyticsIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AnalyticsIntent::Start => match state {
                AnalyticsState::Loaded { report } => AnalyticsState::Loading {
                    previous: Some(report),
                },
                AnalyticsState::Loading { previous } => AnalyticsState::Loading { previous },
                AnalyticsState::Idle | AnalyticsState::Failed { .. } => {
                    AnalyticsState::Loading { previous: None }
                }
            },
            AnalyticsIntent::Loaded { report } => AnalyticsState::Loaded { report },
            AnalyticsIntent::Failed { error } => AnalyticsState::Failed { error },
        }
    }
}
