#![forbid(unsafe_code)]

//! `dtop` binary entry point.

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dtop_app::app::{AppModel, NavRequest};
use dtop_app::cli;
use dtop_app::client::{DeploymentClient, FileClient, StaticClient};
use dtop_tui::runtime::Program;
use dtop_tui::terminal::{CrosstermEventSource, TerminalPresenter, TerminalSession};

fn init_logging(opts: &cli::Opts) -> std::io::Result<()> {
    // The terminal belongs to the UI; diagnostics go to a file.
    let file = File::create(&opts.log_file)?;
    let filter = EnvFilter::try_from_env("DTOP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() {
    let opts = cli::Opts::parse();

    if let Err(err) = init_logging(&opts) {
        eprintln!("Failed to open log file {}: {err}", opts.log_file.display());
        std::process::exit(1);
    }

    let latency = Duration::from_millis(opts.fetch_delay_ms);
    let client: Arc<dyn DeploymentClient + Send + Sync> = match &opts.file {
        Some(path) => Arc::new(FileClient::new(path.clone(), latency)),
        None => Arc::new(StaticClient::demo(latency)),
    };

    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    let model = AppModel::new(client, opts.deployment.clone(), opts.direction, exit_after);

    let session = match TerminalSession::new(opts.mouse) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Failed to initialize terminal: {err}");
            std::process::exit(1);
        }
    };

    let mut program = Program::new(model, CrosstermEventSource, TerminalPresenter::new());
    let result = program.run();
    let navigation = program.model().navigation().cloned();
    drop(session);

    if let Err(err) = result {
        eprintln!("Runtime error: {err}");
        std::process::exit(1);
    }

    if let Some(NavRequest::DestroyDeployment(id)) = navigation {
        info!(deployment = %id, "handing off to destroy flow");
        println!("Destroy requested for deployment {id}.");
        println!("Continue with: deployctl destroy {id}");
    }
}
