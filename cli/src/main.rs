mod commands;
mod terminal;

use std::process::ExitCode;

use tracing::error;

use commands::{CommandLine, discover};
use hostsweep_common::network::target::TargetSet;
use terminal::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet, commands.verbose);

    match run(&commands).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: &CommandLine) -> anyhow::Result<()> {
    let cfg = commands.to_config()?;
    let targets = TargetSet::select(commands.range.as_deref(), commands.input.as_deref())?;
    discover::discover(&targets, &cfg).await
}
