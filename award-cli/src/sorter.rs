//! Ledger sorting and the highest-number report

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::error::AwardError;
use crate::ledger::{self, Cell, LedgerLock, NumberOrdering, Sheet, columns};

static EMPTY: Cell = Cell::Empty;

/// Highest Number seen for one (Color, Type) combination
#[derive(Debug, Clone, PartialEq)]
pub struct GroupHighest {
    pub color: String,
    pub kind: String,
    /// None when every Number in the group is empty
    pub highest: Option<Cell>,
}

/// Result of a sort run
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome {
    pub groups: Vec<GroupHighest>,
    pub rows: usize,
    pub blank_rows_dropped: usize,
    pub written: bool,
}

#[derive(Debug, Clone, Copy)]
struct KeyColumns {
    color: usize,
    kind: usize,
    number: usize,
}

impl KeyColumns {
    fn resolve(sheet: &Sheet) -> Result<Self, AwardError> {
        let idx = sheet.required_columns(&columns::REQUIRED)?;
        Ok(Self {
            color: idx[0],
            kind: idx[1],
            number: idx[2],
        })
    }
}

fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY)
}

/// Stable sort of the data rows by (Color, Type, Number), all ascending
pub fn sort_rows(sheet: &mut Sheet, ordering: NumberOrdering) -> Result<(), AwardError> {
    let keys = KeyColumns::resolve(sheet)?;
    sheet.data_rows_mut().sort_by(|a, b| compare_rows(a, b, keys, ordering));
    Ok(())
}

fn compare_rows(a: &[Cell], b: &[Cell], keys: KeyColumns, ordering: NumberOrdering) -> Ordering {
    cell_at(a, keys.color)
        .native_cmp(cell_at(b, keys.color))
        .then_with(|| cell_at(a, keys.kind).native_cmp(cell_at(b, keys.kind)))
        .then_with(|| ordering.compare(cell_at(a, keys.number), cell_at(b, keys.number)))
}

/// Maximum Number per (Color, Type), in ascending key order
///
/// Rows with an empty Color or Type are left out, as are empty Numbers.
pub fn highest_numbers(
    sheet: &Sheet,
    ordering: NumberOrdering,
) -> Result<Vec<GroupHighest>, AwardError> {
    let keys = KeyColumns::resolve(sheet)?;
    let mut groups: BTreeMap<(String, String), Option<Cell>> = BTreeMap::new();

    for row in sheet.data_rows() {
        let color = cell_at(row, keys.color);
        let kind = cell_at(row, keys.kind);
        if color.value().is_empty() || kind.value().is_empty() {
            continue;
        }

        let number = cell_at(row, keys.number);
        let entry = groups
            .entry((color.to_string(), kind.to_string()))
            .or_insert(None);
        if number.value().is_empty() {
            continue;
        }
        let replace = match entry {
            Some(current) => ordering.compare(number, current) == Ordering::Greater,
            None => true,
        };
        if replace {
            *entry = Some(number.clone());
        }
    }

    Ok(groups
        .into_iter()
        .map(|((color, kind), highest)| GroupHighest { color, kind, highest })
        .collect())
}

/// Report lines, one per group: "Gold/Hunter → 12"
pub fn format_report(groups: &[GroupHighest]) -> Vec<String> {
    groups
        .iter()
        .map(|g| {
            let highest = g
                .highest
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            format!("{}/{} → {}", g.color, g.kind, highest)
        })
        .collect()
}

/// Sort the ledger file in place and compute the report
///
/// The schema is checked before anything is written; with `dry_run` the file
/// is only read.
pub fn sort_ledger_file(
    path: &Path,
    ordering: NumberOrdering,
    dry_run: bool,
) -> Result<SortOutcome> {
    let lock = if dry_run {
        None
    } else {
        let lock = LedgerLock::acquire(path)?;
        log::debug!("Holding {}", lock.path().display());
        Some(lock)
    };

    let mut book = ledger::read_ledger(path)?;
    let sheet = book.ledger_mut()?;
    KeyColumns::resolve(sheet)?;

    let blank_rows_dropped = sheet.drop_blank_rows();
    if blank_rows_dropped > 0 {
        log::info!("Dropping {} blank rows from '{}'", blank_rows_dropped, sheet.name);
    }

    sort_rows(sheet, ordering)?;
    let groups = highest_numbers(sheet, ordering)?;
    let rows = sheet.data_rows().len();
    log::info!("Sorted {} rows into {} groups", rows, groups.len());

    if let Some(lock) = lock {
        ledger::write_ledger(&book, path)?;
        lock.release()?;
    }

    Ok(SortOutcome {
        groups,
        rows,
        blank_rows_dropped,
        written: !dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerBook, read_ledger, write_ledger};

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn row(color: &str, kind: &str, number: Cell) -> Vec<Cell> {
        vec![text(color), text(kind), number]
    }

    fn header() -> Vec<Cell> {
        vec![text("Color"), text("Type"), text("Number")]
    }

    fn sheet(rows: Vec<Vec<Cell>>) -> Sheet {
        let mut all = vec![header()];
        all.extend(rows);
        Sheet {
            name: "Sheet1".to_string(),
            origin: (0, 0),
            rows: all,
        }
    }

    fn example() -> Sheet {
        sheet(vec![
            row("Gold", "Hunter", Cell::Float(5.0)),
            row("Gold", "Hunter", Cell::Float(12.0)),
            row("Bronze", "Activator", Cell::Float(3.0)),
        ])
    }

    #[test]
    fn test_sort_example() {
        let mut s = example();
        sort_rows(&mut s, NumberOrdering::Numeric).unwrap();
        assert_eq!(
            s.data_rows(),
            &[
                row("Bronze", "Activator", Cell::Float(3.0)),
                row("Gold", "Hunter", Cell::Float(5.0)),
                row("Gold", "Hunter", Cell::Float(12.0)),
            ]
        );
    }

    #[test]
    fn test_report_example() {
        let groups = highest_numbers(&example(), NumberOrdering::Numeric).unwrap();
        assert_eq!(
            format_report(&groups),
            vec!["Bronze/Activator → 3", "Gold/Hunter → 12"]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut once = example();
        sort_rows(&mut once, NumberOrdering::Numeric).unwrap();
        let mut twice = once.clone();
        sort_rows(&mut twice, NumberOrdering::Numeric).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut s = sheet(vec![
            vec![text("Gold"), text("Hunter"), Cell::Float(1.0), text("first")],
            vec![text("Gold"), text("Hunter"), Cell::Float(1.0), text("second")],
        ]);
        sort_rows(&mut s, NumberOrdering::Numeric).unwrap();
        assert_eq!(s.data_rows()[0][3], text("first"));
        assert_eq!(s.data_rows()[1][3], text("second"));
    }

    #[test]
    fn test_text_numbers_by_ordering() {
        let base = sheet(vec![
            row("Gold", "Hunter", text("5")),
            row("Gold", "Hunter", text("12")),
        ]);

        let mut numeric = base.clone();
        sort_rows(&mut numeric, NumberOrdering::Numeric).unwrap();
        assert_eq!(numeric.data_rows()[0][2], text("5"));
        let groups = highest_numbers(&numeric, NumberOrdering::Numeric).unwrap();
        assert_eq!(groups[0].highest, Some(text("12")));

        let mut native = base;
        sort_rows(&mut native, NumberOrdering::Native).unwrap();
        assert_eq!(native.data_rows()[0][2], text("12"));
        let groups = highest_numbers(&native, NumberOrdering::Native).unwrap();
        assert_eq!(groups[0].highest, Some(text("5")));
    }

    #[test]
    fn test_highest_is_true_maximum_per_group() {
        let s = sheet(vec![
            row("Silver", "Hunter", Cell::Float(9.0)),
            row("Silver", "Activator", Cell::Float(2.0)),
            row("Silver", "Hunter", Cell::Float(31.0)),
            row("Silver", "Hunter", Cell::Empty),
            row("Silver", "Activator", Cell::Float(17.0)),
            row("Gold", "Activator", Cell::Empty),
        ]);
        let groups = highest_numbers(&s, NumberOrdering::Numeric).unwrap();
        assert_eq!(
            format_report(&groups),
            vec![
                "Gold/Activator → none",
                "Silver/Activator → 17",
                "Silver/Hunter → 31",
            ]
        );
    }

    #[test]
    fn test_missing_columns_fail_sort() {
        let mut s = Sheet {
            name: "Sheet1".to_string(),
            origin: (0, 0),
            rows: vec![vec![text("Color"), text("Name")]],
        };
        let err = sort_rows(&mut s, NumberOrdering::Numeric).unwrap_err();
        assert!(matches!(err, AwardError::Schema { ref missing } if missing.len() == 2));
    }

    fn write_book(path: &Path, rows: Vec<Vec<Cell>>) {
        let book = LedgerBook {
            sheets: vec![Sheet {
                name: "Sheet1".to_string(),
                origin: (0, 0),
                rows,
            }],
        };
        write_ledger(&book, path).unwrap();
    }

    #[test]
    fn test_sort_file_rewrites_and_preserves_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AwardGrantsOverview.xlsx");
        write_book(
            &path,
            vec![
                vec![
                    text("Color"),
                    text("Type"),
                    text("Name"),
                    text("Number"),
                    text("Certificate"),
                ],
                vec![text("Gold"), text("Hunter"), text("Jan"), text("12"), text("12_gold.pdf")],
                vec![text("Gold"), text("Hunter"), text("Piet"), text("5"), Cell::Empty],
                vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
                vec![
                    text("Bronze"),
                    text("Activator"),
                    text("Kees"),
                    text("3"),
                    text("3_bronze.pdf"),
                ],
            ],
        );

        let outcome = sort_ledger_file(&path, NumberOrdering::Numeric, false).unwrap();
        assert!(outcome.written);
        assert_eq!(outcome.rows, 3);
        assert_eq!(
            format_report(&outcome.groups),
            vec!["Bronze/Activator → 3", "Gold/Hunter → 12"]
        );

        let book = read_ledger(&path).unwrap();
        let sheet = book.ledger().unwrap();
        assert_eq!(sheet.header()[2], "Name");
        let names: Vec<String> = sheet.data_rows().iter().map(|r| r[2].to_string()).collect();
        assert_eq!(names, vec!["Kees", "Piet", "Jan"]);
        assert_eq!(sheet.data_rows()[2][4], text("12_gold.pdf"));
        assert!(!LedgerLock::lock_path(&path).exists());
    }

    #[test]
    fn test_schema_error_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        write_book(
            &path,
            vec![
                vec![text("Color"), text("Kind"), text("Number")],
                vec![text("Gold"), text("Hunter"), text("1")],
            ],
        );
        let before = std::fs::read(&path).unwrap();

        let err = sort_ledger_file(&path, NumberOrdering::Numeric, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AwardError>(),
            Some(AwardError::Schema { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert!(!LedgerLock::lock_path(&path).exists());
    }

    #[test]
    fn test_locked_ledger_is_not_touched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        write_book(
            &path,
            vec![
                header(),
                row("Gold", "Hunter", text("2")),
                row("Bronze", "Hunter", text("1")),
            ],
        );
        let before = std::fs::read(&path).unwrap();

        let _held = LedgerLock::acquire(&path).unwrap();
        let err = sort_ledger_file(&path, NumberOrdering::Numeric, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AwardError>(),
            Some(AwardError::LedgerLocked { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");
        write_book(
            &path,
            vec![
                header(),
                row("Gold", "Hunter", text("2")),
                row("Bronze", "Hunter", text("1")),
            ],
        );
        let before = std::fs::read(&path).unwrap();

        let outcome = sort_ledger_file(&path, NumberOrdering::Numeric, true).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.groups.len(), 2);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
