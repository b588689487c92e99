use anyhow::Result;
use clap::Parser;
use promptstash::cli::Cli;
use promptstash::config::Config;
use promptstash::utils::output::print_error;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.config.is_none() {
        Config::ensure_config_exists()?;
    }

    let config = match &cli.config {
        Some(config_path) => Config::load_custom(config_path)?,
        None => Config::load()?,
    };

    cli.command.execute(config)?;
    Ok(())
}
