mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::platform::config::Overrides;
use crate::platform::{ExportRequest, Outcome};

#[derive(Parser)]
#[command(name = "cloner_app")]
#[command(about = "Clone a website through the cloning service and export the result")]
struct Cli {
    /// Config file (defaults to <config dir>/site-cloner/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Origin of the cloning service, e.g. http://localhost:8000
    #[arg(long, global = true)]
    service: Option<String>,
    /// Also write logs to ./cloner.log
    #[arg(long, global = true)]
    log_file: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clone one website and export it
    Clone {
        /// Website URL; https:// is assumed when no scheme is given
        url: String,
        /// Save a single HTML file with the stylesheets embedded
        #[arg(long)]
        html: bool,
        /// Save a zip archive with the document and every cloned asset
        #[arg(long)]
        archive: bool,
        /// Print the composed document to stdout
        #[arg(long)]
        print: bool,
        /// Directory the exports are written to
        #[arg(long)]
        out: Option<PathBuf>,
        /// Title of the composed document
        #[arg(long)]
        title: Option<String>,
    },
    /// Check that the cloning service is up
    Health,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    platform::init_logging(cli.log_file);

    match run(cli) {
        Ok(Outcome::Succeeded) => ExitCode::SUCCESS,
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let mut config = platform::config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Clone {
            url,
            html,
            archive,
            print,
            out,
            title,
        } => {
            config.apply(Overrides {
                service_url: cli.service,
                output_dir: out,
                document_title: title,
            });
            let exports = ExportRequest {
                html,
                archive,
                print,
            };
            platform::run_clone(&config, &url, exports)
        }
        Command::Health => {
            config.apply(Overrides {
                service_url: cli.service,
                ..Overrides::default()
            });
            platform::run_health(&config)
        }
    }
}
