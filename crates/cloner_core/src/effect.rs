use std::time::Duration;

use crate::{CloneRequest, ResolvedDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the request to the remote cloning service.
    SubmitClone { request: CloneRequest },
    /// Wait `settle`, then resolve the cloned document at `clone_location`.
    ResolveDocument {
        clone_location: String,
        settle: Duration,
    },
    /// Deliver the composed document as a single HTML file.
    ExportHtml { document: ResolvedDocument },
    /// Package the composed document and the cloned assets into one archive.
    ExportArchive {
        document: ResolvedDocument,
        asset_paths: Vec<String>,
    },
    /// Hand the composed document text to the caller.
    CopyCode { document: ResolvedDocument },
    /// Surface a fatal error summary; answered with `Msg::FailureAcknowledged`.
    ReportFailure { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Html,
    Archive,
    Copy,
}
