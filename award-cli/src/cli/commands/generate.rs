//! `generate` command handler

use std::path::PathBuf;

use anyhow::Result;
use colored::*;

use super::Context;
use crate::cli::GenerateCommands;
use crate::error::AwardError;
use crate::generator::{Generator, Stage};
use crate::prompt::{ConsolePrompter, Prompter};
use crate::render::FontSet;

pub fn handle_generate_command(args: GenerateCommands, ctx: &Context) -> Result<()> {
    let ledger_path = ctx.ledger_path(args.ledger.as_ref());
    let fonts = FontSet::load(&ctx.config.fonts, &ctx.base_dir);

    let mut prompter = ConsolePrompter;
    run_generator(&mut prompter, ctx, ledger_path, fonts)
}

fn run_generator(
    prompter: &mut dyn Prompter,
    ctx: &Context,
    ledger_path: PathBuf,
    fonts: FontSet,
) -> Result<()> {
    let mut generator = Generator::new(&ctx.config, &ctx.base_dir, ledger_path.clone(), fonts);

    match generator.run(prompter) {
        Ok(generated) => {
            println!();
            println!(
                "> The certificate has been saved as '{}'.",
                generated.document.display().to_string().bright_green()
            );
            println!(
                "> {} {} #{} has been added to '{}'.",
                generated.record.category,
                generated.record.kind,
                generated.record.serial_number,
                ledger_path.display().to_string().bright_green()
            );
            Ok(())
        }
        Err(e) => {
            // The document already exists when only the ledger step failed.
            if generator.stage() == Stage::RecordingLedger {
                if let Some(AwardError::LedgerWrite { .. }) = e.downcast_ref::<AwardError>() {
                    println!("> The certificate was exported, but the ledger was not updated.");
                }
            }
            Err(e)
        }
    }
}
