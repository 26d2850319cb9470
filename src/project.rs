//! Writes aggregated expenses back onto the records' rows.

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{ExpenseOrder, Record, Worksheet};

/// Places each record's expenses on its row as category/amount cell pairs.
#[derive(Debug, Clone, Copy)]
pub struct SheetProjector {
    start_column: u32,
    order: ExpenseOrder,
}

impl SheetProjector {
    pub fn new(start_column: u32) -> Self {
        Self {
            start_column,
            order: ExpenseOrder::Insertion,
        }
    }

    pub fn with_order(mut self, order: ExpenseOrder) -> Self {
        self.order = order;
        self
    }

    /// Writes the category name into `start_column + 2k` and its amount into
    /// the column after it. Cells beyond the last pair are left as they were.
    ///
    /// Returns the number of category pairs written.
    #[instrument(level = "info", skip_all, fields(sheet = %sheet.name, start_column = self.start_column))]
    pub fn project(&self, sheet: &mut Worksheet, records: &[Record]) -> Result<usize> {
        let mut written = 0;
        for record in records {
            let mut column = self.start_column;
            for (category, amount) in record.expenses.ordered(self.order) {
                sheet.set_text(record.row, column, category)?;
                sheet.set_number(record.row, column + 1, amount)?;
                column += 2;
                written += 1;
            }
        }

        info!(category_count = written, "expenses written");
        Ok(written)
    }
}

/// Projects `records` onto `sheet` in insertion order starting at `start_column`.
pub fn project(sheet: &mut Worksheet, records: &[Record], start_column: u32) -> Result<()> {
    SheetProjector::new(start_column).project(sheet, records)?;
    Ok(())
}
