use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{ExpenseError, Result};

/// Last addressable row of a worksheet (1-based).
pub const MAX_ROW: u32 = 1_048_576;
/// Last addressable column of a worksheet (1-based).
pub const MAX_COLUMN: u32 = 16_384;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Value stored in a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date-time.
    DateTime(f64),
    /// Error literal such as `#DIV/0!`.
    Error(String),
    /// Formula text without the leading `=`, with the last computed value.
    Formula {
        text: String,
        cached: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Renders the value the way it prints in a cell. Whole numbers carry no
    /// fractional part, date-times print as `yyyy-mm-dd[ hh:mm:ss]` and
    /// formulas print their cached result.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(value) | CellValue::Error(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::DateTime(serial) => serial_to_datetime(*serial)
                .map(|datetime| {
                    if datetime.num_seconds_from_midnight() == 0 {
                        datetime.format("%Y-%m-%d").to_string()
                    } else {
                        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
                    }
                })
                .unwrap_or_else(|| serial.to_string()),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Formula { cached, .. } => cached
                .as_deref()
                .map(CellValue::to_text)
                .unwrap_or_default(),
        }
    }
}

/// Converts an Excel serial number (days since 1899-12-30) to a date-time.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// A named sheet holding sparse cells addressed by 1-based (row, column).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    pub name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Returns the raw value at the given address, if any.
    pub fn cell(&self, row: u32, column: u32) -> Option<&CellValue> {
        self.cells.get(&(row, column))
    }

    /// Returns the cell rendered as text. Missing cells read as `None`.
    pub fn cell_text(&self, row: u32, column: u32) -> Option<String> {
        self.cell(row, column).map(CellValue::to_text)
    }

    /// Stores `value` at the given address, replacing any previous content.
    pub fn set(&mut self, row: u32, column: u32, value: CellValue) -> Result<()> {
        check_address(row, column)?;
        self.cells.insert((row, column), value);
        Ok(())
    }

    pub fn set_text(&mut self, row: u32, column: u32, value: impl Into<String>) -> Result<()> {
        self.set(row, column, CellValue::Text(value.into()))
    }

    pub fn set_number(&mut self, row: u32, column: u32, value: f64) -> Result<()> {
        self.set(row, column, CellValue::Number(value))
    }

    /// Iterates over the populated cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells
            .iter()
            .map(|((row, column), value)| (*row, *column, value))
    }
}

/// Ordered collection of worksheets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a worksheet and returns a handle to it.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut Worksheet {
        self.sheets.push(Worksheet::new(name));
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    /// Returns the worksheet at the given 1-based index.
    pub fn sheet(&self, index: usize) -> Result<&Worksheet> {
        let available = self.sheets.len();
        index
            .checked_sub(1)
            .and_then(|position| self.sheets.get(position))
            .ok_or(ExpenseError::MissingSheet { index, available })
    }

    /// Returns the worksheet at the given 1-based index for writing.
    pub fn sheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        let available = self.sheets.len();
        index
            .checked_sub(1)
            .and_then(|position| self.sheets.get_mut(position))
            .ok_or(ExpenseError::MissingSheet { index, available })
    }
}

fn check_address(row: u32, column: u32) -> Result<()> {
    if row == 0 || column == 0 || row > MAX_ROW || column > MAX_COLUMN {
        return Err(ExpenseError::InvalidAddress { row, column });
    }
    Ok(())
}
