use std::time::Instant;

use crate::{CloneError, CloneResult, ExportKind, ResolvedDocument};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted the current URL input.
    CloneSubmitted { at: Instant },
    /// Fixed-interval ticker; `jitter` in `[0, 1)` drives the progress estimate.
    Tick { jitter: f32 },
    /// Remote cloning service answered.
    CloneResponded(Result<CloneResult, CloneError>),
    /// Stylesheet resolution of the cloned document finished.
    ResolutionFinished {
        at: Instant,
        document_url: String,
        result: Result<ResolvedDocument, CloneError>,
    },
    /// The failure summary has been shown.
    FailureAcknowledged,
    /// User asked for the single-file HTML export.
    ExportHtmlClicked,
    /// User asked for the archive with all assets.
    ExportArchiveClicked,
    /// User asked to copy the composed document.
    CopyCodeClicked,
    /// An export finished; `Ok` carries where the result went.
    ExportFinished {
        kind: ExportKind,
        result: Result<String, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
