//! The award ledger spreadsheet (read, rewrite, lock)

mod cell;
mod lock;
mod reader;
mod writer;

pub use cell::{Cell, NumberOrdering};
pub use lock::LedgerLock;
pub use reader::read_ledger;
pub use writer::write_ledger;

use anyhow::{Context, Result};

use crate::award::AwardRecord;
use crate::error::AwardError;

/// Header used when the generator appends to an empty ledger sheet
pub const DEFAULT_HEADER: [&str; 5] = ["Color", "Type", "Name", "Number", "Certificate"];

/// Column names the sorter needs
pub mod columns {
    pub const COLOR: &str = "Color";
    pub const TYPE: &str = "Type";
    pub const NUMBER: &str = "Number";

    pub const REQUIRED: [&str; 3] = [COLOR, TYPE, NUMBER];
}

/// One worksheet's values
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Zero-based (row, column) of the top-left used cell
    pub origin: (u32, u32),
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Header names from the first row
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }

    /// Indices of the required columns, or a schema error naming all missing ones
    pub fn required_columns(&self, required: &[&str]) -> Result<Vec<usize>, AwardError> {
        let header = self.header();
        let mut indices = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for name in required {
            match header.iter().position(|h| h == name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(AwardError::Schema { missing })
        }
    }

    /// Rows below the header
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn data_rows_mut(&mut self) -> &mut [Vec<Cell>] {
        self.rows.get_mut(1..).unwrap_or(&mut [])
    }

    /// Drop data rows with no values at all
    pub fn drop_blank_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut index = 0;
        self.rows.retain(|row| {
            let keep = index == 0 || row.iter().any(|c| !c.is_empty());
            index += 1;
            keep
        });
        before - self.rows.len()
    }

    /// Append a generator record, writing the default header first if the sheet is empty
    pub fn append_record(&mut self, record: &AwardRecord) {
        if self.rows.is_empty() {
            self.rows.push(
                DEFAULT_HEADER
                    .iter()
                    .map(|h| Cell::Text(h.to_string()))
                    .collect(),
            );
        }
        self.rows.push(record.to_row());
    }
}

/// All sheets of a ledger workbook; the first one is the ledger itself
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerBook {
    pub sheets: Vec<Sheet>,
}

impl LedgerBook {
    #[cfg(test)]
    pub fn ledger(&self) -> Result<&Sheet> {
        self.sheets.first().context("Ledger workbook has no sheets")
    }

    pub fn ledger_mut(&mut self) -> Result<&mut Sheet> {
        self.sheets.first_mut().context("Ledger workbook has no sheets")
    }
}
