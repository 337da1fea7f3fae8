use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cloner_core::{CloneError, CloneRequest, ResolvedDocument};
use engine_logging::{engine_error, engine_info};
use url::Url;

use crate::compose::{compose_document, DEFAULT_TITLE};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::package::{ArchivePackager, PackageSettings};
use crate::parse::{ScraperParser, StructuralParser};
use crate::persist::AtomicFileWriter;
use crate::resolve::StylesheetResolver;
use crate::service::{CloneService, HttpCloneService};
use crate::{ArchiveExport, EngineEvent, FetchError};

pub const DEFAULT_HTML_FILENAME: &str = "cloned-website.html";
pub const DEFAULT_ARCHIVE_FILENAME: &str = "cloned-website.zip";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Origin of the cloning service; cloned documents and assets live under it.
    pub service_origin: Url,
    pub fetch: FetchSettings,
    pub package: PackageSettings,
    pub output_dir: PathBuf,
    pub document_title: String,
    pub html_filename: String,
    pub archive_filename: String,
}

impl EngineConfig {
    pub fn new(service_origin: Url, output_dir: PathBuf) -> Self {
        Self {
            service_origin,
            fetch: FetchSettings::default(),
            package: PackageSettings::default(),
            output_dir,
            document_title: DEFAULT_TITLE.to_string(),
            html_filename: DEFAULT_HTML_FILENAME.to_string(),
            archive_filename: DEFAULT_ARCHIVE_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to build clone service client: {0}")]
    Service(#[from] CloneError),
}

enum EngineCommand {
    Submit {
        request: CloneRequest,
    },
    Resolve {
        clone_location: String,
        settle: Duration,
    },
    ExportHtml {
        document: ResolvedDocument,
    },
    ExportArchive {
        document: ResolvedDocument,
        asset_paths: Vec<String>,
    },
    Health,
}

struct EngineContext {
    config: EngineConfig,
    service: Arc<dyn CloneService>,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn StructuralParser>,
}

/// Runs clone-pipeline commands on a background tokio runtime.
///
/// Commands are independent tasks; each reports exactly one [`EngineEvent`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone())?);
        let service = Arc::new(HttpCloneService::new(
            config.service_origin.clone(),
            &config.fetch,
        )?);
        Self::with_components(config, service, fetcher, Arc::new(ScraperParser))
    }

    pub fn with_components(
        config: EngineConfig,
        service: Arc<dyn CloneService>,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn StructuralParser>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let context = Arc::new(EngineContext {
            config,
            service,
            fetcher,
            parser,
        });

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let context = context.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(context.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request: CloneRequest) {
        self.send(EngineCommand::Submit { request });
    }

    pub fn resolve(&self, clone_location: impl Into<String>, settle: Duration) {
        self.send(EngineCommand::Resolve {
            clone_location: clone_location.into(),
            settle,
        });
    }

    pub fn export_html(&self, document: ResolvedDocument) {
        self.send(EngineCommand::ExportHtml { document });
    }

    pub fn export_archive(&self, document: ResolvedDocument, asset_paths: Vec<String>) {
        self.send(EngineCommand::ExportArchive {
            document,
            asset_paths,
        });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::Health);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(context: &EngineContext, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Submit { request } => {
            EngineEvent::CloneResponded(context.service.clone_site(&request).await)
        }
        EngineCommand::Resolve {
            clone_location,
            settle,
        } => {
            tokio::time::sleep(settle).await;
            resolve_document(context, &clone_location).await
        }
        EngineCommand::ExportHtml { document } => {
            let composed = compose_document(&document, &context.config.document_title);
            let writer = AtomicFileWriter::new(context.config.output_dir.clone());
            let result = writer
                .write(&context.config.html_filename, composed.as_bytes())
                .map_err(|err| err.to_string());
            if let Ok(path) = &result {
                engine_info!("Wrote {} ({} bytes)", path.display(), composed.len());
            }
            EngineEvent::HtmlExported(result)
        }
        EngineCommand::ExportArchive {
            document,
            asset_paths,
        } => EngineEvent::ArchiveExported(export_archive(context, &document, &asset_paths).await),
        EngineCommand::Health => EngineEvent::HealthChecked(context.service.health().await),
    }
}

async fn resolve_document(context: &EngineContext, clone_location: &str) -> EngineEvent {
    let document_url = match context.config.service_origin.join(clone_location) {
        Ok(url) => url,
        Err(err) => {
            return EngineEvent::Resolved {
                document_url: clone_location.to_string(),
                result: Err(CloneError::RootFetchFailed(format!(
                    "invalid clone location {clone_location:?}: {err}"
                ))),
            }
        }
    };

    let resolver = StylesheetResolver::new(
        context.fetcher.as_ref(),
        context.parser.as_ref(),
        context.config.service_origin.clone(),
    );
    let result = resolver
        .resolve(document_url.as_str())
        .await
        .map_err(CloneError::from);
    EngineEvent::Resolved {
        document_url: document_url.to_string(),
        result,
    }
}

async fn export_archive(
    context: &EngineContext,
    document: &ResolvedDocument,
    asset_paths: &[String],
) -> Result<ArchiveExport, String> {
    let composed = compose_document(document, &context.config.document_title);
    let packager = ArchivePackager::new(context.fetcher.as_ref(), context.config.package.clone());
    let archive = packager
        .pack(&composed, &context.config.service_origin, asset_paths)
        .await
        .map_err(|err| err.to_string())?;

    let writer = AtomicFileWriter::new(context.config.output_dir.clone());
    let path = writer
        .write(&context.config.archive_filename, &archive.bytes)
        .map_err(|err| err.to_string())?;
    engine_info!(
        "Wrote {} ({} entries, {} bytes)",
        path.display(),
        archive.included.len(),
        archive.bytes.len()
    );
    Ok(ArchiveExport::new(path, &archive))
}
