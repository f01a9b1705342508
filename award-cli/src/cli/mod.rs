//! Command-line surface

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "award-cli",
    version,
    about = "Sort the award ledger and generate award certificates"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory holding the ledger and the Bronze/Silver/Gold template folders
    #[arg(long, short = 'C', global = true, default_value = ".")]
    pub dir: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sort the ledger by Color, Type and Number and report the highest Number per combination
    Sort(SortCommands),
    /// Interactively generate a certificate and record it in the ledger
    Generate(GenerateCommands),
}

#[derive(Args, Debug)]
pub struct SortCommands {
    /// Ledger file (overrides the config)
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Print the report without rewriting the ledger
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct GenerateCommands {
    /// Ledger file (overrides the config)
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sort_flags() {
        let cli = Cli::parse_from([
            "award-cli",
            "-vv",
            "--dir",
            "/srv/awards",
            "sort",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.dir, PathBuf::from("/srv/awards"));
        match cli.command {
            Commands::Sort(args) => {
                assert!(args.dry_run);
                assert!(args.ledger.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_generate_with_ledger() {
        let cli = Cli::parse_from(["award-cli", "generate", "--ledger", "other.xlsx"]);
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.ledger, Some(PathBuf::from("other.xlsx"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
