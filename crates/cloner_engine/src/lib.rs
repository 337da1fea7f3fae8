//! Cloner engine: IO pipeline and effect execution.
mod compose;
mod decode;
mod engine;
mod fetch;
mod package;
mod parse;
mod persist;
mod resolve;
mod service;
mod types;

pub use compose::{compose, compose_document, DEFAULT_TITLE};
pub use decode::{decode_text, DecodedText};
pub use engine::{
    EngineConfig, EngineError, EngineHandle, DEFAULT_ARCHIVE_FILENAME, DEFAULT_HTML_FILENAME,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use package::{
    ArchivePackager, OmissionReason, OmittedAsset, PackageError, PackageSettings, PackagedArchive,
    DOCUMENT_ENTRY,
};
pub use parse::{ParsedDocument, ScraperParser, StructuralParser};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{ResolutionError, StylesheetResolver};
pub use service::{CloneService, HttpCloneService, ServiceHealth};
pub use types::{ArchiveExport, EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
