//! `sort` command handler

use anyhow::Result;
use colored::*;

use super::Context;
use crate::cli::SortCommands;
use crate::sorter::{format_report, sort_ledger_file};

pub fn handle_sort_command(args: SortCommands, ctx: &Context) -> Result<()> {
    let path = ctx.ledger_path(args.ledger.as_ref());
    log::info!("Sorting ledger {}", path.display());

    let outcome = sort_ledger_file(&path, ctx.config.number_ordering, args.dry_run)?;

    println!("Highest numbers for each Color/Type combination:");
    println!();
    for line in format_report(&outcome.groups) {
        println!("    {}", line.bold());
    }
    println!();

    if outcome.blank_rows_dropped > 0 {
        println!("> Removed {} empty rows.", outcome.blank_rows_dropped);
    }
    if outcome.written {
        println!(
            "> Sorted {} rows and saved to '{}'.",
            outcome.rows,
            path.display().to_string().bright_green()
        );
    } else {
        println!("> Dry run: '{}' was not modified.", path.display().to_string().cyan());
    }

    Ok(())
}
