//! Read the ledger workbook with calamine

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Range, Reader, Xlsx, open_workbook};

use super::{Cell, LedgerBook, Sheet};

/// Read every sheet of the ledger, keeping cell types and formulas
pub fn read_ledger(path: &Path) -> Result<LedgerBook> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        anyhow::bail!("Excel file has no sheets: {}", path.display());
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let formulas = workbook
            .worksheet_formula(&sheet_name)
            .with_context(|| format!("Failed to read formulas of sheet: {}", sheet_name))?;

        let mut origin = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(Cell::from_data).collect())
            .collect();
        let formula_count = overlay_formulas(&mut rows, &mut origin, &formulas);
        if formula_count > 0 {
            log::debug!("Sheet '{}' has {} formulas", sheet_name, formula_count);
        }

        log::debug!(
            "Read sheet '{}' with {} rows starting at {:?}",
            sheet_name,
            rows.len(),
            origin
        );

        sheets.push(Sheet {
            name: sheet_name,
            origin,
            rows,
        });
    }

    Ok(LedgerBook { sheets })
}

/// Attach formula text to the cached values it produced
fn overlay_formulas(
    rows: &mut Vec<Vec<Cell>>,
    origin: &mut (u32, u32),
    formulas: &Range<String>,
) -> usize {
    let Some((start_row, start_col)) = formulas.start() else {
        return 0;
    };

    let mut count = 0;
    for (row, col, text) in formulas.used_cells() {
        if text.is_empty() {
            continue;
        }
        let at = (start_row + row as u32, start_col + col as u32);
        let cell = cell_at_mut(rows, origin, at);
        let cached = std::mem::replace(cell, Cell::Empty);
        *cell = cached.with_formula(text.as_str());
        count += 1;
    }
    count
}

/// Cell at an absolute position, growing the grid (and moving its origin) to reach it
fn cell_at_mut<'a>(
    rows: &'a mut Vec<Vec<Cell>>,
    origin: &mut (u32, u32),
    at: (u32, u32),
) -> &'a mut Cell {
    if rows.is_empty() {
        *origin = at;
    }
    if at.0 < origin.0 {
        let missing = (origin.0 - at.0) as usize;
        let mut grown = vec![Vec::new(); missing];
        grown.append(rows);
        *rows = grown;
        origin.0 = at.0;
    }
    if at.1 < origin.1 {
        let missing = (origin.1 - at.1) as usize;
        for row in rows.iter_mut() {
            let mut grown = vec![Cell::Empty; missing];
            grown.append(row);
            *row = grown;
        }
        origin.1 = at.1;
    }

    let (r, c) = ((at.0 - origin.0) as usize, (at.1 - origin.1) as usize);
    if rows.len() <= r {
        rows.resize_with(r + 1, Vec::new);
    }
    let row = &mut rows[r];
    if row.len() <= c {
        row.resize(c + 1, Cell::Empty);
    }
    &mut row[c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Formula, Workbook};

    #[test]
    fn test_reads_all_sheets_with_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Awards").unwrap();
        sheet.write_string(0, 0, "Color").unwrap();
        sheet.write_string(0, 1, "Number").unwrap();
        sheet.write_string(1, 0, "Gold").unwrap();
        sheet.write_number(1, 1, 12.0).unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(2, 1, "kept").unwrap();
        workbook.save(&path).unwrap();

        let book = read_ledger(&path).unwrap();
        assert_eq!(book.sheets.len(), 2);

        let ledger = book.ledger().unwrap();
        assert_eq!(ledger.name, "Awards");
        assert_eq!(ledger.header(), vec!["Color", "Number"]);
        assert_eq!(ledger.data_rows()[0][1], Cell::Float(12.0));

        let notes = &book.sheets[1];
        assert_eq!(notes.origin, (2, 1));
        assert_eq!(notes.rows[0][0], Cell::Text("kept".to_string()));
    }

    #[test]
    fn test_reads_formulas_with_cached_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Number").unwrap();
        sheet.write_string(0, 1, "Double").unwrap();
        sheet.write_number(1, 0, 12.0).unwrap();
        sheet
            .write_formula(1, 1, Formula::new("=A2*2").set_result("24"))
            .unwrap();
        workbook.save(&path).unwrap();

        let book = read_ledger(&path).unwrap();
        match &book.sheets[0].rows[1][1] {
            Cell::Formula { text, cached } => {
                assert_eq!(text, "A2*2");
                assert_eq!(cached.to_string(), "24");
            }
            other => panic!("expected a formula, got {other:?}"),
        }
    }

    #[test]
    fn test_formula_outside_value_range_grows_grid() {
        let mut rows = vec![vec![Cell::Text("a".to_string())]];
        let mut origin = (1, 1);
        let cell = cell_at_mut(&mut rows, &mut origin, (0, 3));
        *cell = Cell::Int(1);

        assert_eq!(origin, (0, 1));
        assert_eq!(rows[0], vec![Cell::Empty, Cell::Empty, Cell::Int(1)]);
        assert_eq!(rows[1][0], Cell::Text("a".to_string()));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_ledger(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Failed to open Excel file"));
    }
}
