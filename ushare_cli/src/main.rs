use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ushare_core::config::PORT_ENV;
use ushare_core::http_share::{self, ServerControl};
use ushare_core::{DEFAULT_PORT, ServeConfig, ShareLink, TransferState, net};

#[derive(Parser)]
#[command(name = "ushare")]
#[command(about = "Share files with devices on your local network")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a file for download
    Send {
        #[arg(help = "Path to file to send")]
        file: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_PORT, env = PORT_ENV, help = "Port to use")]
        port: u16,

        #[arg(long, help = "Log every request")]
        debug: bool,
    },
    /// Receive uploaded files
    Receive {
        #[arg(short, long, help = "Folder for uploaded files to be saved")]
        directory: Option<PathBuf>,

        #[arg(short, long, default_value_t = DEFAULT_PORT, env = PORT_ENV, help = "Port to use")]
        port: u16,

        #[arg(long, help = "Log every request")]
        debug: bool,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug {
        "ushare=debug,ushare_core=debug,tower_http=debug"
    } else {
        "ushare=info,ushare_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(state: TransferState, config: ServeConfig) -> Result<()> {
    // Bind first so a busy port is reported before the link is shown
    let listener = http_share::bind_listener(&config).await?;

    let host = net::resolve_lan_address();
    let link = ShareLink::new(host, config.port, state.mode());
    link.publish(&mut std::io::stdout())
        .context("Failed to print share link")?;

    let control = ServerControl::new();
    let ctrl_c = control.clone();
    tokio::spawn(async move {
        let mut interrupted = false;
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupted {
                eprintln!("Interrupted again, exiting");
                std::process::exit(130);
            }
            interrupted = true;
            tracing::info!("Interrupted, stopping");
            ctrl_c.shutdown();
        }
    });

    http_share::run(listener, &state, &config, control).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Optional .env with USHARE_PORT / RUST_LOG
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (state, config) = match cli.command {
        Commands::Send { file, port, debug } => {
            init_logging(debug);
            println!("{}", file.display());
            (TransferState::bind_for_send(&file), ServeConfig::new(port, debug))
        }
        Commands::Receive {
            directory,
            port,
            debug,
        } => {
            init_logging(debug);
            if let Some(dir) = &directory {
                println!("{}", dir.display());
            }
            (
                TransferState::bind_for_receive(directory.as_deref()),
                ServeConfig::new(port, debug),
            )
        }
    };

    // Fail fast on a bad path before anything is served
    let state = match state {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(state, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
