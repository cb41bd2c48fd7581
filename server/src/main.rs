// server/src/main.rs

use anyhow::Result;
use clap::Parser;

use rx_server::cli::{start_cli, CliArgs};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let code = start_cli(CliArgs::parse()).await?;
    std::process::exit(code);
}
