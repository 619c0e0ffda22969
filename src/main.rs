use anyhow::Result;
use clap::Parser;
use smart_building_sim::{cli, config, telemetry};
use cli::Cli;
use config::Config;
use telemetry::init_tracing;
use tracing::debug;

fn main() -> Result<()> {
    // A missing .env is fine; configuration falls back to file and defaults.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let cfg = Config::load(cli.config.as_deref())?;
    debug!(?cfg, "configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&cli, cfg, &mut out)
}
