use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{ExpenseError, Result};
use crate::model::{CellValue, Workbook, Worksheet};

/// Loads every worksheet of an `.xlsx` file, keeping the workbook order.
/// Formula cells keep their text alongside the cached result.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut source: Xlsx<_> = open_workbook(path)?;
    let names = source.sheet_names().to_vec();

    let mut workbook = Workbook::new();
    for name in names {
        let missing = || ExpenseError::InvalidWorkbook(format!("missing sheet '{name}'"));
        let values = source.worksheet_range(&name).ok_or_else(missing)??;
        let formulas = source.worksheet_formula(&name).ok_or_else(missing)??;

        let sheet = workbook.add_sheet(name.clone());
        ingest_values(&values, sheet)?;
        let formula_count = ingest_formulas(&formulas, sheet)?;
        debug!(sheet = %name, formula_count, "worksheet loaded");
    }

    Ok(workbook)
}

/// Converts a position inside a calamine range to a 1-based sheet address.
fn absolute_address(origin: (u32, u32), row: usize, column: usize) -> (u32, u32) {
    (origin.0 + row as u32 + 1, origin.1 + column as u32 + 1)
}

fn ingest_values(range: &Range<DataType>, sheet: &mut Worksheet) -> Result<()> {
    let Some(origin) = range.start() else {
        return Ok(());
    };

    for (row, column, cell) in range.cells() {
        if let Some(value) = to_cell_value(cell) {
            let (row, column) = absolute_address(origin, row, column);
            sheet.set(row, column, value)?;
        }
    }

    Ok(())
}

/// Wraps cells that carry a formula, keeping their value as the cached result.
fn ingest_formulas(range: &Range<String>, sheet: &mut Worksheet) -> Result<usize> {
    let Some(origin) = range.start() else {
        return Ok(0);
    };

    let mut count = 0;
    for (row, column, text) in range.cells() {
        if text.is_empty() {
            continue;
        }
        let (row, column) = absolute_address(origin, row, column);
        let cached = sheet.cell(row, column).cloned().map(Box::new);
        sheet.set(
            row,
            column,
            CellValue::Formula {
                text: text.clone(),
                cached,
            },
        )?;
        count += 1;
    }

    Ok(count)
}

fn to_cell_value(cell: &DataType) -> Option<CellValue> {
    match cell {
        DataType::Empty => None,
        DataType::String(value) => Some(CellValue::Text(value.clone())),
        DataType::Float(value) => Some(CellValue::Number(*value)),
        DataType::Int(value) => Some(CellValue::Number(*value as f64)),
        DataType::Bool(value) => Some(CellValue::Bool(*value)),
        DataType::DateTime(value) => Some(CellValue::DateTime(*value)),
        DataType::Error(error) => Some(CellValue::Error(error.to_string())),
        other => Some(CellValue::Text(other.to_string())),
    }
}
