//! WQR CLI - Command line tool for outorga water quality compliance reports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wqr-cli",
    version,
    about = "Water quality outorga compliance reporting toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wqr_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wqr_cmd::run(cli.command)
}
