use crate::{CloneMetrics, Notice, Phase};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub input: String,
    pub progress_percent: u8,
    pub ready: Option<ReadyView>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyView {
    pub metrics: CloneMetrics,
    pub preview_url: String,
    pub asset_count: usize,
}
