use crate::analytics::AnalyticsReport;
use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalyticsState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// Fetch in flight. The last report stays visible meanwhile.
    Loading { previous: Option<AnalyticsReport> },
    Loaded { report: AnalyticsReport },
    Failed { error: String },
}

impl UiState for AnalyticsState {}

impl AnalyticsState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Report to draw, if any.
    pub fn report(&self) -> Option<&AnalyticsReport> {
        match self {
            Self::Loading { previous } => previous.as_ref(),
            Self::Loaded { report } => Some(report),
            Self::Idle | Self::Failed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
