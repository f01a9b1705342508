mod award;
mod cli;
mod config;
mod error;
mod export;
mod generator;
mod ledger;
mod prompt;
mod render;
mod sorter;

use clap::Parser;
use colored::*;

use cli::commands::{Context, generate, sort};
use cli::{Cli, Commands};
use config::Config;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context {
        config,
        base_dir: cli.dir,
    };

    match cli.command {
        Commands::Sort(args) => sort::handle_sort_command(args, &ctx),
        Commands::Generate(args) => generate::handle_generate_command(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        log::debug!("Run failed: {:?}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
