//! Sums each record's line items per canonical category.

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::store::LineItemSource;
use crate::model::{LineItem, Record, RecordId};
use crate::normalize::NameNormalizer;

/// Fetches line items for scanned records and folds them into `expenses`.
pub struct ExpenseAggregator<'a, S> {
    source: &'a mut S,
    normalizer: &'a NameNormalizer,
}

impl<'a, S: LineItemSource> ExpenseAggregator<'a, S> {
    pub fn new(source: &'a mut S, normalizer: &'a NameNormalizer) -> Self {
        Self { source, normalizer }
    }

    /// Fetches the line items of every record in one request and adds them to
    /// the records. A failed fetch leaves the records untouched.
    ///
    /// Returns the number of line items that were applied.
    #[instrument(level = "info", skip_all, fields(record_count = records.len()))]
    pub fn aggregate(&mut self, records: &mut [Record]) -> Result<usize> {
        let ids: Vec<RecordId> = records.iter().map(|record| record.id).collect();
        let items = self.source.fetch_line_items(&ids)?;
        let applied = apply_line_items(records, &items, self.normalizer);
        info!(fetched = items.len(), applied, "line items aggregated");
        Ok(applied)
    }
}

/// Adds `items` to the matching records, summing amounts per canonical
/// category. Items with a blank category, a missing or non-positive amount,
/// or an unknown record identifier are skipped.
///
/// Returns the number of items that were applied.
pub fn apply_line_items(
    records: &mut [Record],
    items: &[LineItem],
    normalizer: &NameNormalizer,
) -> usize {
    let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        positions.entry(record.id).or_insert(position);
    }

    let mut applied = 0;
    for item in items {
        let category = item.category.as_deref().filter(|label| !label.trim().is_empty());
        let Some(category) = category else {
            continue;
        };
        let Some(amount) = item.amount.filter(|amount| *amount > 0.0) else {
            continue;
        };
        let Some(&position) = positions.get(&item.id) else {
            debug!(id = item.id, "line item for unknown record dropped");
            continue;
        };

        let canonical = normalizer.normalize(category);
        records[position].expenses.add(canonical, amount);
        applied += 1;
    }

    applied
}
