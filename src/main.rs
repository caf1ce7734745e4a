use anyhow::{Context, Result};
use clap::Parser;
use clipnote::cli::{Cli, Commands};
use clipnote::{debug, watch};
use clipnote_bridge::{BridgeClient, request_from_args, socket_path};
use clipnote_config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    debug::init(debug::resolve_level(cli.log_level.as_deref(), config.log_level));
    log::info!("Starting clipnote {}", env!("CARGO_PKG_VERSION"));

    let socket = socket_path(cli.socket.as_deref(), config.socket_path.as_deref());

    match cli.command {
        Commands::Watch { pane } => watch::run(pane, &config, socket),
        Commands::Ipc { command, lines } => {
            let request = request_from_args(&command, &lines);
            let mut client = BridgeClient::connect(&socket)?;
            let response = client.send_raw(&request)?;
            println!("{response}");
            Ok(())
        }
    }
}
