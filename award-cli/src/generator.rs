//! Certificate generation: input, template, render, export, ledger
//!
//! A run moves through [`Stage`]s in order. Only a missing template ends it
//! early without side effects; a ledger failure after export leaves the
//! exported document in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::award::{AwardRecord, Category, CertificateRequest, Kind};
use crate::config::Config;
use crate::error::AwardError;
use crate::export::export_pdf;
use crate::ledger::{self, LedgerLock};
use crate::prompt::{Prompter, prompt_choice, prompt_text};
use crate::render::{FontSet, normalize_for_export, render_certificate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectingInput,
    ResolvingTemplate,
    Rendering,
    Exporting,
    RecordingLedger,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CollectingInput => "collecting input",
            Stage::ResolvingTemplate => "resolving template",
            Stage::Rendering => "rendering",
            Stage::Exporting => "exporting",
            Stage::RecordingLedger => "recording ledger",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub document: PathBuf,
    pub record: AwardRecord,
}

/// Everything a run needs besides the operator
pub struct Generator<'a> {
    config: &'a Config,
    base_dir: &'a Path,
    ledger_path: PathBuf,
    fonts: FontSet,
    stage: Stage,
}

impl<'a> Generator<'a> {
    pub fn new(
        config: &'a Config,
        base_dir: &'a Path,
        ledger_path: PathBuf,
        fonts: FontSet,
    ) -> Self {
        Self {
            config,
            base_dir,
            ledger_path,
            fonts,
            stage: Stage::CollectingInput,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        log::info!("Certificate run: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Prompt for the request; the date is today's
    pub fn collect_request(&mut self, prompter: &mut dyn Prompter) -> Result<CertificateRequest> {
        self.stage = Stage::CollectingInput;
        let category: Category = prompt_choice(
            prompter,
            "Enter the color (options: b for Bronze, s for Silver, g for Gold)",
        )?;
        let kind: Kind = prompt_choice(
            prompter,
            "Is it an activator (a) or a hunter (h)? (options: a, h)",
        )?;
        let name = prompt_text(prompter, "Enter the name to be added (e.g., 'Erwin - PA3EFR')")?;
        let serial_number = prompt_text(prompter, "Enter the serial number")?;

        Ok(CertificateRequest {
            category,
            kind,
            name,
            serial_number,
            date: chrono::Local::now().date_naive(),
        })
    }

    /// Render, export and record one certificate
    pub fn generate(&mut self, request: CertificateRequest) -> Result<Generated> {
        self.enter(Stage::ResolvingTemplate);
        let template_path =
            resolve_template(self.base_dir, &request, &self.config.template_extensions)?;
        log::info!("Using template {}", template_path.display());

        self.enter(Stage::Rendering);
        let template = image::open(&template_path)
            .map_err(|e| AwardError::Render(format!("{}: {}", template_path.display(), e)))?;
        let template_color = template.color();
        let canvas = render_certificate(template, &request, &self.fonts, &self.config.layout);
        let image = normalize_for_export(canvas, template_color);

        self.enter(Stage::Exporting);
        let document = output_path(self.base_dir, &request);
        export_pdf(&image, &document)?;

        self.enter(Stage::RecordingLedger);
        let record = request.into_record();
        append_to_ledger(&self.ledger_path, &record).map_err(|e| AwardError::LedgerWrite {
            path: self.ledger_path.clone(),
            reason: format!("{:#}", e),
        })?;

        self.enter(Stage::Done);
        Ok(Generated { document, record })
    }

    /// Collect input then generate
    pub fn run(&mut self, prompter: &mut dyn Prompter) -> Result<Generated> {
        let request = self.collect_request(prompter)?;
        self.generate(request)
    }
}

/// `{base}/{Category}/{Category}{Kind}.{ext}`, first extension that exists
pub fn resolve_template(
    base_dir: &Path,
    request: &CertificateRequest,
    extensions: &[String],
) -> Result<PathBuf, AwardError> {
    let dir = base_dir.join(request.category.name());
    let stem = request.template_stem();

    let candidates: Vec<PathBuf> = if extensions.is_empty() {
        vec![dir.join(format!("{}.jpg", stem))]
    } else {
        extensions
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext.trim_start_matches('.'))))
            .collect()
    };

    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(AwardError::TemplateNotFound {
            path: candidates[0].clone(),
        }),
    }
}

/// Output document path, in the category's template directory
pub fn output_path(base_dir: &Path, request: &CertificateRequest) -> PathBuf {
    base_dir
        .join(request.category.name())
        .join(request.certificate_file_name())
}

/// Lock the ledger, append one row to its first sheet and persist
pub fn append_to_ledger(path: &Path, record: &AwardRecord) -> Result<()> {
    let lock = LedgerLock::acquire(path)?;
    let mut book = ledger::read_ledger(path)?;
    book.ledger_mut()?.append_record(record);
    ledger::write_ledger(&book, path).context("Failed to persist ledger")?;
    lock.release()?;
    log::info!("Appended {} {} #{} to ledger", record.category, record.kind, record.serial_number);
    Ok(())
}
