use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::Result;
use crate::model::{CellValue, Workbook};

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes every worksheet of `workbook` to the given path. Formulas keep
/// their cached result.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let mut workbook_writer = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row, column, value) in sheet.cells() {
            // Worksheet addresses are 1-based, the writer's are 0-based.
            let row = row - 1;
            let column = (column - 1) as u16;
            match value {
                CellValue::Text(text) | CellValue::Error(text) => {
                    worksheet.write_string(row, column, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row, column, *number)?;
                }
                CellValue::Bool(flag) => {
                    worksheet.write_boolean(row, column, *flag)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(row, column, *serial, &date_format)?;
                }
                CellValue::Formula { text, cached } => {
                    worksheet.write_formula(row, column, text.as_str())?;
                    if let Some(cached) = cached {
                        worksheet.set_formula_result(row, column, formula_result(cached));
                    }
                }
            }
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn formula_result(cached: &CellValue) -> String {
    match cached {
        CellValue::Number(value) | CellValue::DateTime(value) => value.to_string(),
        other => other.to_text(),
    }
}
