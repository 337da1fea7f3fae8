mod app;
pub(crate) mod config;
mod effects;
mod logging;
mod render;

pub use app::{run_clone, run_health, ExportRequest, Outcome};
pub use logging::init_logging;
