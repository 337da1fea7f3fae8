use std::io::{self, Write};
use std::sync::mpsc;
use std::time::Instant;

use cloner_core::{Effect, ExportKind, Msg, ResolvedDocument};
use cloner_engine::{compose_document, EngineEvent, EngineHandle};
use engine_logging::{engine_info, engine_warn};

/// Executes effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
    document_title: String,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>, document_title: String) -> Self {
        Self {
            engine,
            msg_tx,
            document_title,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitClone { request } => {
                    engine_info!("SubmitClone url={}", request.target_url());
                    self.engine.submit(request);
                }
                Effect::ResolveDocument {
                    clone_location,
                    settle,
                } => {
                    engine_info!(
                        "ResolveDocument location={} settle={:?}",
                        clone_location,
                        settle
                    );
                    self.engine.resolve(clone_location, settle);
                }
                Effect::ExportHtml { document } => self.engine.export_html(document),
                Effect::ExportArchive {
                    document,
                    asset_paths,
                } => self.engine.export_archive(document, asset_paths),
                Effect::CopyCode { document } => {
                    let result = self.copy_code(&document);
                    self.send(Msg::ExportFinished {
                        kind: ExportKind::Copy,
                        result,
                    });
                }
                Effect::ReportFailure { message } => {
                    engine_warn!("Clone failed: {}", message);
                    self.send(Msg::FailureAcknowledged);
                }
            }
        }
    }

    /// Forward every engine event received so far as a message.
    pub fn forward_events(&self) {
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = map_event(event, Instant::now()) {
                self.send(msg);
            }
        }
    }

    fn copy_code(&self, document: &ResolvedDocument) -> Result<String, String> {
        let composed = compose_document(document, &self.document_title);
        write_document(&mut io::stdout().lock(), &composed)
            .map(|()| "stdout".to_string())
            .map_err(|err| err.to_string())
    }

    fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }
}

fn write_document(out: &mut impl Write, composed: &str) -> io::Result<()> {
    out.write_all(composed.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

fn map_event(event: EngineEvent, at: Instant) -> Option<Msg> {
    match event {
        EngineEvent::CloneResponded(result) => Some(Msg::CloneResponded(result)),
        EngineEvent::Resolved {
            document_url,
            result,
        } => Some(Msg::ResolutionFinished {
            at,
            document_url,
            result,
        }),
        EngineEvent::HtmlExported(result) => Some(Msg::ExportFinished {
            kind: ExportKind::Html,
            result: result.map(|path| path.display().to_string()),
        }),
        EngineEvent::ArchiveExported(result) => {
            if let Ok(export) = &result {
                if !export.omitted.is_empty() {
                    engine_warn!(
                        "Archive omits {} assets: {}",
                        export.omitted.len(),
                        export.omitted.join(", ")
                    );
                }
            }
            Some(Msg::ExportFinished {
                kind: ExportKind::Archive,
                result: result.map(|export| export.path.display().to_string()),
            })
        }
        EngineEvent::HealthChecked(result) => {
            engine_info!("Unsolicited health result: {:?}", result);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Instant;

    use cloner_core::{CloneError, ExportKind, Msg, ResolvedDocument};
    use cloner_engine::{EngineEvent, ServiceHealth};
    use pretty_assertions::assert_eq;

    use super::{map_event, write_document};

    #[test]
    fn resolution_event_becomes_timestamped_message() {
        let at = Instant::now();
        let document = ResolvedDocument::new("<p>x</p>", "");
        let msg = map_event(
            EngineEvent::Resolved {
                document_url: "http://localhost:8000/c/index.html".into(),
                result: Ok(document.clone()),
            },
            at,
        );
        assert_eq!(
            msg,
            Some(Msg::ResolutionFinished {
                at,
                document_url: "http://localhost:8000/c/index.html".into(),
                result: Ok(document),
            })
        );
    }

    #[test]
    fn export_events_report_their_location() {
        let at = Instant::now();
        let msg = map_event(
            EngineEvent::HtmlExported(Ok(PathBuf::from("out/cloned-website.html"))),
            at,
        );
        assert_eq!(
            msg,
            Some(Msg::ExportFinished {
                kind: ExportKind::Html,
                result: Ok("out/cloned-website.html".into()),
            })
        );

        let msg = map_event(EngineEvent::ArchiveExported(Err("disk full".into())), at);
        assert_eq!(
            msg,
            Some(Msg::ExportFinished {
                kind: ExportKind::Archive,
                result: Err("disk full".into()),
            })
        );
    }

    #[test]
    fn service_failures_pass_through() {
        let err = CloneError::RemoteService("upstream timeout".into());
        let msg = map_event(EngineEvent::CloneResponded(Err(err.clone())), Instant::now());
        assert_eq!(msg, Some(Msg::CloneResponded(Err(err))));
    }

    #[test]
    fn health_results_are_not_messages() {
        let event = EngineEvent::HealthChecked(Ok(ServiceHealth {
            status: "healthy".into(),
        }));
        assert_eq!(map_event(event, Instant::now()), None);
    }

    #[test]
    fn copied_document_ends_with_newline() {
        let mut out = Vec::new();
        write_document(&mut out, "<!DOCTYPE html>").unwrap();
        assert_eq!(out, b"<!DOCTYPE html>\n");
    }
}
