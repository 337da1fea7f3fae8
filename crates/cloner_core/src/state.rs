use std::time::Instant;

use crate::progress::ProgressEstimate;
use crate::view_model::{AppViewModel, ReadyView};
use crate::{CloneError, CloneMetrics, CloneRequest, CloneResult, ResolvedDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Resolving,
    Ready,
    Failed,
}

impl Phase {
    /// A clone operation is in flight; new submissions are refused.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Resolving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// User-visible notification produced by the last transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }
}

/// Everything a finished clone operation exposes to the export actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyClone {
    pub document: ResolvedDocument,
    pub metrics: CloneMetrics,
    pub preview_url: String,
    pub asset_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    input: String,
    phase: Phase,
    progress: ProgressEstimate,
    started_at: Option<Instant>,
    response: Option<CloneResult>,
    ready: Option<ReadyClone>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn progress(&self) -> ProgressEstimate {
        self.progress
    }

    pub fn ready(&self) -> Option<&ReadyClone> {
        self.ready.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            input: self.input.clone(),
            progress_percent: self.progress.percent(),
            ready: self.ready.as_ref().map(|ready| ReadyView {
                metrics: ready.metrics.clone(),
                preview_url: ready.preview_url.clone(),
                asset_count: ready.asset_paths.len(),
            }),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    /// Enter `Submitting` from a clean slate; prior results are dropped wholesale.
    pub(crate) fn begin_submission(&mut self, request: &CloneRequest, at: Instant) {
        self.phase = Phase::Submitting;
        self.progress.reset();
        self.started_at = Some(at);
        self.response = None;
        self.ready = None;
        self.notice = Some(Notice::info(format!("Cloning {}", request.target_url())));
        self.mark_dirty();
    }

    pub(crate) fn advance_progress(&mut self, jitter: f32) {
        if self.phase != Phase::Submitting {
            return;
        }
        let before = self.progress.percent();
        self.progress.advance(jitter);
        if self.progress.percent() != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn accept_response(&mut self, result: CloneResult) {
        self.phase = Phase::Resolving;
        self.progress.complete();
        self.response = Some(result);
        self.mark_dirty();
    }

    /// Move to `Ready`. Returns `false` when no clone response is pending.
    pub(crate) fn finish_resolution(
        &mut self,
        document: ResolvedDocument,
        document_url: String,
        at: Instant,
    ) -> bool {
        let Some(response) = self.response.take() else {
            return false;
        };
        let elapsed = self
            .started_at
            .map(|start| at.saturating_duration_since(start))
            .unwrap_or_default();

        self.ready = Some(ReadyClone {
            document,
            metrics: CloneMetrics::from_result(&response, elapsed),
            preview_url: document_url,
            asset_paths: response.asset_paths,
        });
        self.phase = Phase::Ready;
        self.notice = Some(Notice::success("Website cloned successfully!"));
        self.mark_dirty();
        true
    }

    pub(crate) fn fail(&mut self, error: &CloneError) {
        self.phase = Phase::Failed;
        self.response = None;
        self.notice = Some(Notice::error(error.to_string()));
        self.mark_dirty();
    }

    pub(crate) fn return_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.progress.reset();
        self.started_at = None;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
