use std::fmt;
use std::path::PathBuf;

use cloner_core::{CloneError, CloneResult, ResolvedDocument};

use crate::package::PackagedArchive;
use crate::service::ServiceHealth;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Outcome reports produced by the background engine.
#[derive(Debug)]
pub enum EngineEvent {
    CloneResponded(Result<CloneResult, CloneError>),
    Resolved {
        document_url: String,
        result: Result<ResolvedDocument, CloneError>,
    },
    HtmlExported(Result<PathBuf, String>),
    ArchiveExported(Result<ArchiveExport, String>),
    HealthChecked(Result<ServiceHealth, CloneError>),
}

/// Where an archive was written and what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveExport {
    pub path: PathBuf,
    pub included: Vec<String>,
    pub omitted: Vec<String>,
}

impl ArchiveExport {
    pub(crate) fn new(path: PathBuf, archive: &PackagedArchive) -> Self {
        Self {
            path,
            included: archive.included.clone(),
            omitted: archive
                .omitted
                .iter()
                .map(|omitted| omitted.path.clone())
                .collect(),
        }
    }
}
