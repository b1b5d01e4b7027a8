//! Virtual kettle binary.
//!
//! Wires the kettle core to one of two drivers: an interactive console
//! session (`console`, the default) or the web control surface (`serve`).
//!
//! # Startup Sequence
//!
//! 1. Parse the command line (clap)
//! 2. Load configuration from `kettle-config.yaml` (defaults if missing)
//! 3. Initialize structured logging (tracing) to stderr and a daily file
//! 4. Open the `SQLite` message log (best effort)
//! 5. Start the journal writer
//! 6. Run the selected driver
//! 7. Flush the journal and close the message log

mod console;
mod error;
mod journal;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kettle_core::KettleModel;
use kettle_core::config::KettleConfig;
use kettle_observer::{AppState, ServerConfig};
use tracing::info;

use crate::console::Prompter;
use crate::error::EngineError;
use crate::journal::{Echo, Journal};

#[derive(Parser)]
#[command(name = "kettle-engine")]
#[command(about = "Control a simulated kettle from the terminal or the browser")]
struct Cli {
    /// Path of the YAML configuration file.
    #[arg(long, short, default_value = "kettle-config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one interactive kettle session (default).
    Console,

    /// Serve the web control surface.
    Serve {
        /// Override the configured bind host.
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the selected driver
/// fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let cli = Cli::parse();

    let (config, found) = load_config(&cli.config)?;
    logging::init(&config.logging);

    info!("kettle-engine starting");
    if found {
        info!(path = %cli.config.display(), "Configuration loaded");
    } else {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    let pool = journal::open_message_log(&config.storage).await;
    let model = Arc::new(KettleModel::from_config(&config));

    let result = match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => {
            let (journal, writer) = Journal::spawn(pool.clone(), Echo::Console);
            let mut prompter = Prompter::new(
                tokio::io::BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            );
            let result = console::run(&mut prompter, model, Arc::new(journal)).await;
            writer.close().await;
            result
        }
        Commands::Serve { host, port } => {
            let mut server = ServerConfig::from(&config.server);
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let (journal, writer) = Journal::spawn(pool.clone(), Echo::Silent);
            let result = serve(&server, model, Arc::new(journal)).await;
            writer.close().await;
            result
        }
    };

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("kettle-engine stopped");
    result
}

async fn serve(
    server: &ServerConfig,
    model: Arc<KettleModel>,
    journal: Arc<Journal>,
) -> Result<(), EngineError> {
    let state = Arc::new(AppState::new(model, journal)?);
    kettle_observer::start_server(server, state).await?;
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was found.
fn load_config(path: &Path) -> Result<(KettleConfig, bool), EngineError> {
    if path.exists() {
        Ok((KettleConfig::from_file(path)?, true))
    } else {
        Ok((KettleConfig::parse("")?, false))
    }
}
