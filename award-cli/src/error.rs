use std::path::PathBuf;

use thiserror::Error;

/// Failures the operator needs to tell apart.
///
/// Command handlers wrap these in `anyhow::Error`; callers that care about the
/// kind use `downcast_ref::<AwardError>()`.
#[derive(Error, Debug)]
pub enum AwardError {
    #[error("Ledger is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Template '{}' does not exist", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to render certificate: {0}")]
    Render(String),

    #[error("Failed to export certificate to '{}': {reason}", .path.display())]
    Export {
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to update ledger '{}': {reason}", .path.display())]
    LedgerWrite {
        path: PathBuf,
        reason: String,
    },

    #[error(
        "Ledger is locked by another run (remove '{}' if no other run is active)",
        .path.display()
    )]
    LedgerLocked { path: PathBuf },
}
