use crate::analytics::AnalyticsReport;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum AnalyticsIntent {
    /// A fetch was started.
    Start,
    Loaded { report: AnalyticsReport },
    Failed { error: String },
}

impl Intent for AnalyticsIntent {}
