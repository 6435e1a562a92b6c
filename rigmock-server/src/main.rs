//! rigmockd - rigctl NET protocol emulator daemon
//!
//! Listens for rigctld-style TCP clients and serves them an emulated
//! transceiver, so CAT control software (fldigi, WSJT-X, logging
//! programs) can be exercised without real hardware. The process named
//! on the command line receives SIGTERM whenever a client drops PTT
//! from transmit back to receive.

mod release;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use rigmock_sim::{RadioConfig, RadioState, RigServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use release::SignalTxRelease;

#[derive(Parser)]
#[command(name = "rigmockd", version, about = "Emulated rigctld-compatible radio server")]
struct Cli {
    /// Process to SIGTERM whenever PTT drops from transmit to receive
    pid: i32,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// TCP port (rigctld's own default is 4532; a different port lets
    /// both run side by side)
    #[arg(long, default_value_t = 4575)]
    port: u16,

    /// JSON file with the radio's initial state
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "rigmock_server=debug,rigmock_protocol=debug,rigmock_sim=debug"
    } else {
        "rigmock_server=info,rigmock_protocol=info,rigmock_sim=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<RadioConfig> {
    match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(RadioConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let radio = RadioState::from_config(load_config(&cli)?);
    info!(radio = %radio.summary(), "initial state");

    ctrlc::set_handler(|| {
        info!("interrupted, shutting down");
        process::exit(0);
    })
    .context("installing interrupt handler")?;

    let addr = format!("{}:{}", cli.bind, cli.port);
    let hook = Box::new(SignalTxRelease::new(cli.pid));
    let mut server = RigServer::bind(&addr, radio, hook)?;
    info!(addr = %server.local_addr()?, pid = cli.pid, "rigmockd ready");

    server.run();
    Ok(())
}
