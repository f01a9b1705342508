//! Write the ledger workbook with rust_xlsxwriter
//!
//! The workbook is rendered in memory, written to a temporary file next to
//! the ledger and renamed over it, so an interrupted run leaves either the old
//! or the new ledger on disk.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};

use super::{Cell, LedgerBook, Sheet};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Replace the ledger at `path` with the contents of `book`
pub fn write_ledger(book: &LedgerBook, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for sheet in &book.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .with_context(|| format!("Invalid sheet name: {}", sheet.name))?;
        write_sheet(worksheet, sheet, &datetime_format)?;
    }

    let buffer = workbook
        .save_to_buffer()
        .context("Failed to render Excel workbook")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".ledger-")
        .suffix(".xlsx.tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp.write_all(&buffer)
        .context("Failed to write temporary ledger file")?;
    temp.as_file()
        .sync_all()
        .context("Failed to flush temporary ledger file")?;
    temp.persist(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Ledger written to {} ({} bytes)", path.display(), buffer.len());
    Ok(())
}

fn write_sheet(ws: &mut Worksheet, sheet: &Sheet, datetime_format: &Format) -> Result<()> {
    let (row0, col0) = sheet.origin;
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = row0 + row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col0 as usize + col_idx)
                .with_context(|| format!("Column out of range in sheet {}", sheet.name))?;
            write_cell(ws, row_num, col_num, cell, datetime_format)?;
        }
    }
    Ok(())
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    datetime_format: &Format,
) -> Result<()> {
    match cell {
        // Leave cell empty
        Cell::Empty => {}
        Cell::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        Cell::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) => {
            ws.write_number(row, col, *f)?;
        }
        Cell::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(serial) => {
            ws.write_number_with_format(row, col, *serial, datetime_format)?;
        }
        Cell::Error(e) => {
            ws.write_string(row, col, e)?;
        }
        Cell::Formula { text, cached } => {
            let formula = Formula::new(format!("={}", text)).set_result(cached.to_string());
            ws.write_formula(row, col, formula)?;
        }
    }
    Ok(())
}
