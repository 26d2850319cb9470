use misc_expense::aggregate::{ExpenseAggregator, apply_line_items};
use misc_expense::io::store::{LineItemSource, MemoryStore};
use misc_expense::model::{LineItem, Record, RecordId};
use misc_expense::normalize::{EquivalenceTable, NameNormalizer};
use misc_expense::{ExpenseError, Result};

fn normalizer(entries: &[&str]) -> NameNormalizer {
    NameNormalizer::new(EquivalenceTable::from_entries(entries))
}

fn item(id: RecordId, category: &str, amount: f64) -> LineItem {
    LineItem::new(id, Some(category), Some(amount))
}

#[test]
fn sums_equivalent_categories_in_insertion_order() {
    let mut records = vec![Record::new(101, 2)];
    let mut store = MemoryStore::new(vec![
        item(101, "Parking", 50.0),
        item(101, "parking", 25.0),
        item(101, "Toll", 10.0),
    ]);
    let normalizer = normalizer(&["parking;Parking"]);

    let applied = ExpenseAggregator::new(&mut store, &normalizer)
        .aggregate(&mut records)
        .expect("aggregation succeeds");

    assert_eq!(applied, 3);
    let expenses: Vec<(&str, f64)> = records[0].expenses.iter().collect();
    assert_eq!(expenses, vec![("Parking", 75.0), ("Toll", 10.0)]);
}

#[test]
fn drops_irrelevant_line_items() {
    let mut records = vec![Record::new(1, 2)];
    let items = vec![
        item(1, "Meal", 0.0),
        item(1, "Meal", -5.0),
        LineItem::new(1, None, Some(10.0)),
        LineItem::new(1, Some(""), Some(10.0)),
        LineItem::new(1, Some("   "), Some(10.0)),
        LineItem::new(1, Some("Meal"), None),
        item(2, "Meal", 10.0),
        item(1, "Meal", 4.5),
    ];

    let applied = apply_line_items(&mut records, &items, &normalizer(&[]));

    assert_eq!(applied, 1);
    assert_eq!(records[0].expenses.len(), 1);
    assert_eq!(records[0].expenses.get("Meal"), Some(4.5));
}

#[test]
fn totals_do_not_depend_on_line_item_order() {
    let items = vec![
        item(1, "Fuel", 1.5),
        item(2, "fuel", 2.0),
        item(1, " FUEL ", 3.0),
        item(1, "Toll", 7.0),
        item(2, "Toll", 0.5),
    ];
    let normalizer = normalizer(&["fuel;Fuel"]);

    let mut forward = vec![Record::new(1, 2), Record::new(2, 3)];
    apply_line_items(&mut forward, &items, &normalizer);

    let reversed_items: Vec<LineItem> = items.iter().rev().cloned().collect();
    let mut reversed = vec![Record::new(1, 2), Record::new(2, 3)];
    apply_line_items(&mut reversed, &reversed_items, &normalizer);

    for (lhs, rhs) in forward.iter().zip(&reversed) {
        for (category, amount) in lhs.expenses.iter() {
            assert_eq!(rhs.expenses.get(category), Some(amount));
        }
        assert_eq!(lhs.expenses.len(), rhs.expenses.len());
    }
    assert_eq!(forward[0].expenses.get("Fuel"), Some(4.5));
}

#[test]
fn repeated_runs_from_empty_records_agree() {
    let items = vec![item(1, "Fee", 3.0), item(1, "fee", 2.0), item(1, "Tip", 1.0)];
    let normalizer = normalizer(&["fee;Fee"]);

    let mut first = vec![Record::new(1, 2)];
    apply_line_items(&mut first, &items, &normalizer);
    let mut second = vec![Record::new(1, 2)];
    apply_line_items(&mut second, &items, &normalizer);

    assert_eq!(first, second);
}

#[test]
fn partially_populated_records_are_summed_not_overwritten() {
    let mut records = vec![Record::new(1, 2)];
    records[0].expenses.add("Fee", 10.0);

    apply_line_items(&mut records, &[item(1, "Fee", 5.0)], &normalizer(&[]));

    assert_eq!(records[0].expenses.get("Fee"), Some(15.0));
}

#[test]
fn normalization_is_first_match_wins() {
    let normalizer = normalizer(&["A;X", "A;Y"]);

    assert_eq!(normalizer.normalize("a"), "X");
    assert_eq!(normalizer.normalize("  a  "), "X");
    assert_eq!(normalizer.normalize("  b "), "b");
}

#[test]
fn malformed_equivalences_are_skipped() {
    let table = EquivalenceTable::from_entries(["no separator", "toll;Toll;extra", ""]);

    assert_eq!(table.len(), 1);
    assert_eq!(table.entries()[0].canonical, "Toll");
    assert_eq!(NameNormalizer::new(table).normalize("TOLL"), "Toll");
}

struct FailingSource;

impl LineItemSource for FailingSource {
    fn fetch_line_items(&mut self, _ids: &[RecordId]) -> Result<Vec<LineItem>> {
        Err(ExpenseError::InvalidConfig("connection refused".into()))
    }
}

#[test]
fn source_failure_leaves_records_untouched() {
    let mut records = vec![Record::new(1, 2)];
    records[0].expenses.add("Fee", 1.0);
    let before = records.clone();
    let normalizer = normalizer(&[]);

    let result = ExpenseAggregator::new(&mut FailingSource, &normalizer).aggregate(&mut records);

    assert!(result.is_err());
    assert_eq!(records, before);
}
