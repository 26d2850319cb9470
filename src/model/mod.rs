//! Data carried through a pipeline run.

mod sheet;

pub use sheet::{CellValue, MAX_COLUMN, MAX_ROW, Workbook, Worksheet};

/// Identifier of a billing record as it appears in the worksheet and in the
/// line-item store.
pub type RecordId = i64;

/// One raw expense entry fetched from the line-item store.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Identifier of the record the entry belongs to.
    pub id: RecordId,
    /// Free-form category label, possibly absent.
    pub category: Option<String>,
    /// Amount charged, possibly absent.
    pub amount: Option<f64>,
    /// Date of the entry as stored. Not used for aggregation.
    pub date: Option<String>,
}

impl LineItem {
    /// Creates a line item without a date.
    pub fn new(id: RecordId, category: Option<&str>, amount: Option<f64>) -> Self {
        Self {
            id,
            category: category.map(str::to_string),
            amount,
            date: None,
        }
    }
}

/// Order in which a record's expenses are written back to the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseOrder {
    /// Order in which categories were first seen during aggregation.
    #[default]
    Insertion,
    /// Case-insensitive alphabetical order of the category names.
    Category,
}

/// Category → amount totals for a record, preserving first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expenses {
    entries: Vec<(String, f64)>,
}

impl Expenses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `category`, appending the category when it is new.
    pub fn add(&mut self, category: impl Into<String>, amount: f64) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category, amount)),
        }
    }

    /// Returns the accumulated amount for `category`.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Returns the entries arranged in the requested order.
    pub fn ordered(&self, order: ExpenseOrder) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        if order == ExpenseOrder::Category {
            entries.sort_by(|lhs, rhs| {
                lhs.0
                    .to_lowercase()
                    .cmp(&rhs.0.to_lowercase())
                    .then_with(|| lhs.0.cmp(rhs.0))
            });
        }
        entries
    }
}

/// A billing record found in the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Identifier parsed from the identifier column.
    pub id: RecordId,
    /// 1-based row the identifier was read from.
    pub row: u32,
    /// Totals per canonical category, filled in by aggregation.
    pub expenses: Expenses,
}

impl Record {
    /// Creates a record without any expenses.
    pub fn new(id: RecordId, row: u32) -> Self {
        Self {
            id,
            row,
            expenses: Expenses::new(),
        }
    }
}
