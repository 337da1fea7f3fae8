use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use cloner_core::{update, AppState, AppViewModel, Effect, Msg, Phase};
use cloner_engine::{EngineEvent, EngineHandle};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(20);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(15);

/// Exports to perform once the clone is ready, in this order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportRequest {
    pub html: bool,
    pub archive: bool,
    pub print: bool,
}

impl ExportRequest {
    fn clicks(self) -> Vec<Msg> {
        let mut clicks = Vec::new();
        if self.html {
            clicks.push(Msg::ExportHtmlClicked);
        }
        if self.archive {
            clicks.push(Msg::ExportArchiveClicked);
        }
        if self.print {
            clicks.push(Msg::CopyCodeClicked);
        }
        clicks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Run one clone operation to completion, then the requested exports.
pub fn run_clone(config: &AppConfig, url: &str, exports: ExportRequest) -> Result<Outcome> {
    let engine =
        EngineHandle::new(config.engine_config()?).context("failed to start clone engine")?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(engine, msg_tx.clone(), config.document_title.clone());

    // Drives the progress estimate while the service works.
    thread::spawn(move || loop {
        thread::sleep(TICK_INTERVAL);
        let jitter = rand::random::<f32>();
        if msg_tx.send(Msg::Tick { jitter }).is_err() {
            break;
        }
    });

    let mut session = Session::new(runner, exports);
    session.dispatch(Msg::InputChanged(url.to_string()));
    session.dispatch(Msg::CloneSubmitted { at: Instant::now() });

    loop {
        session.runner.forward_events();
        if let Some(outcome) = session.outcome() {
            return Ok(outcome);
        }
        match msg_rx.recv_timeout(POLL_INTERVAL) {
            Ok(msg) => session.dispatch(msg),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("message channel closed"),
        }
    }
}

pub fn run_health(config: &AppConfig) -> Result<Outcome> {
    let engine =
        EngineHandle::new(config.engine_config()?).context("failed to start clone engine")?;
    engine.check_health();
    match engine.recv_timeout(HEALTH_TIMEOUT) {
        Some(EngineEvent::HealthChecked(Ok(health))) => {
            println!("{}: {}", config.service_url, health.status);
            Ok(Outcome::Succeeded)
        }
        Some(EngineEvent::HealthChecked(Err(err))) => {
            eprintln!("{}: {}", config.service_url, err);
            Ok(Outcome::Failed)
        }
        _ => bail!(
            "no health response from {} within {:?}",
            config.service_url,
            HEALTH_TIMEOUT
        ),
    }
}

struct Session {
    state: AppState,
    last_view: AppViewModel,
    runner: EffectRunner,
    exports: ExportRequest,
    exports_started: bool,
    exports_pending: usize,
    failed: bool,
    export_failed: bool,
}

impl Session {
    fn new(runner: EffectRunner, exports: ExportRequest) -> Self {
        Self {
            state: AppState::new(),
            last_view: AppViewModel::default(),
            runner,
            exports,
            exports_started: false,
            exports_pending: 0,
            failed: false,
            export_failed: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Msg::ExportFinished { result, .. } = &msg {
            self.exports_pending = self.exports_pending.saturating_sub(1);
            self.export_failed |= result.is_err();
        }

        let (mut state, effects) = update(std::mem::take(&mut self.state), msg);
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::ReportFailure { .. }))
        {
            self.failed = true;
        }
        if state.consume_dirty() {
            let view = state.view();
            for line in render(&self.last_view, &view) {
                eprintln!("{line}");
            }
            self.last_view = view;
        }
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.phase() == Phase::Ready && !self.exports_started {
            self.exports_started = true;
            for click in self.exports.clicks() {
                self.exports_pending += 1;
                self.dispatch(click);
            }
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.failed && self.state.phase() == Phase::Idle {
            return Some(Outcome::Failed);
        }
        if self.exports_started && self.exports_pending == 0 {
            return Some(if self.export_failed {
                Outcome::Failed
            } else {
                Outcome::Succeeded
            });
        }
        None
    }
}
