use clap::Parser;
use edmbuilder::cli::{run_cli, Cli};
use edmbuilder::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::from_env()
    };
    init_logging_with_config(&log_config)?;
    run_cli(cli)
}
