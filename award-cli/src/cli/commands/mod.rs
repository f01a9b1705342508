pub mod generate;
pub mod sort;

use std::path::PathBuf;

use crate::config::Config;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub base_dir: PathBuf,
}

impl Context {
    /// Ledger path: command-line override, else the configured one.
    /// Relative paths resolve against the base directory.
    pub fn ledger_path(&self, override_path: Option<&PathBuf>) -> PathBuf {
        match override_path {
            Some(path) => self.base_dir.join(path),
            None => self.config.ledger_path(&self.base_dir),
        }
    }
}
