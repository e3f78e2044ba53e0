//! Campo CLI - Command line tool for exporting agricultural campaign data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "campo-cli",
    version,
    about = "Agricultural campaign data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: campo_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("campo-cli {}", env!("CARGO_PKG_VERSION"));
    campo_cmd::run(cli.command).await
}
