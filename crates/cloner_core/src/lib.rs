//! Cloner core: pure clone-operation state machine, data model and view-model helpers.
mod effect;
mod error;
mod format;
mod model;
mod msg;
mod progress;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, ExportKind};
pub use error::{CloneError, ValidationError};
pub use format::{format_bytes, format_bytes_with, format_elapsed};
pub use model::{CloneMetrics, CloneResult, ResolvedDocument, ACCURACY_LABEL};
pub use msg::Msg;
pub use progress::{ProgressEstimate, MAX_TICK_FRACTION, WAIT_CEILING};
pub use request::{normalize_target_url, CloneRequest};
pub use state::{AppState, Notice, Phase, ReadyClone, Severity};
pub use update::{update, SETTLE_DELAY};
pub use view_model::{AppViewModel, ReadyView};
