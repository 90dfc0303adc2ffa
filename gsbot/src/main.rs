use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use args::Args;
use clap::Parser;
use server::ServeConfig;

mod args;
mod logger;

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A `.env` in the working directory feeds the `env` fallbacks of the CLI.
    // Variables already present in the environment are left alone.
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    // Must run before the configuration is loaded, which warns about dropped API keys.
    logger::init(&args)?;

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => (),
        Err(e) => log::warn!("Failed to read .env file: {e}"),
    }

    let config = args.config()?;
    let listen_address = args
        .listen_address
        .or(config.server.listen_address)
        .unwrap_or(DEFAULT_LISTEN_ADDRESS);

    log::info!("GSBot {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = server::serve(ServeConfig { listen_address, config }).await {
        log::error!("Server failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
