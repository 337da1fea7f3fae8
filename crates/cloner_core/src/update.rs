use std::time::Duration;

use crate::{
    AppState, CloneError, CloneRequest, Effect, ExportKind, Msg, Notice, Phase,
};

/// Pause between a successful clone response and resolving its document.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(input) => {
            state.set_input(input);
            Vec::new()
        }
        Msg::CloneSubmitted { at } => {
            if state.phase().is_busy() {
                return (state, Vec::new());
            }
            match CloneRequest::from_input(state.input()) {
                Ok(request) => {
                    state.begin_submission(&request, at);
                    vec![Effect::SubmitClone { request }]
                }
                Err(err) => {
                    let message = err.to_string();
                    state.set_notice(Notice::error(message.clone()));
                    vec![Effect::ReportFailure { message }]
                }
            }
        }
        Msg::Tick { jitter } => {
            state.advance_progress(jitter);
            Vec::new()
        }
        Msg::CloneResponded(result) => {
            if state.phase() != Phase::Submitting {
                return (state, Vec::new());
            }
            match result {
                Ok(response) => {
                    let clone_location = response.clone_location.clone();
                    state.accept_response(response);
                    vec![Effect::ResolveDocument {
                        clone_location,
                        settle: SETTLE_DELAY,
                    }]
                }
                Err(err) => fail(&mut state, err),
            }
        }
        Msg::ResolutionFinished {
            at,
            document_url,
            result,
        } => {
            if state.phase() != Phase::Resolving {
                return (state, Vec::new());
            }
            match result {
                Ok(document) => {
                    if state.finish_resolution(document, document_url, at) {
                        Vec::new()
                    } else {
                        fail(
                            &mut state,
                            CloneError::RootFetchFailed("no pending clone response".to_string()),
                        )
                    }
                }
                Err(err) => fail(&mut state, err),
            }
        }
        Msg::FailureAcknowledged => {
            if state.phase() == Phase::Failed {
                state.return_to_idle();
            }
            Vec::new()
        }
        Msg::ExportHtmlClicked => match state.ready() {
            Some(ready) => vec![Effect::ExportHtml {
                document: ready.document.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ExportArchiveClicked => match state.ready() {
            Some(ready) => vec![Effect::ExportArchive {
                document: ready.document.clone(),
                asset_paths: ready.asset_paths.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CopyCodeClicked => match state.ready() {
            Some(ready) => vec![Effect::CopyCode {
                document: ready.document.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ExportFinished { kind, result } => {
            state.set_notice(export_notice(kind, result));
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fail(state: &mut AppState, err: CloneError) -> Vec<Effect> {
    state.fail(&err);
    vec![Effect::ReportFailure {
        message: err.to_string(),
    }]
}

fn export_notice(kind: ExportKind, result: Result<String, String>) -> Notice {
    match (kind, result) {
        (ExportKind::Archive, Ok(location)) => Notice::success(format!(
            "Downloaded complete website with assets to {location}"
        )),
        (ExportKind::Html, Ok(location)) => Notice::success(format!(
            "Downloaded HTML file with embedded styles to {location}"
        )),
        (ExportKind::Copy, Ok(_)) => Notice::success("Complete code copied"),
        (ExportKind::Archive | ExportKind::Html, Err(reason)) => {
            Notice::error(format!("Failed to download website: {reason}"))
        }
        (ExportKind::Copy, Err(reason)) => Notice::error(format!("Failed to copy code: {reason}")),
    }
}
