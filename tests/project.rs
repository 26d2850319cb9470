use misc_expense::model::{CellValue, ExpenseOrder, Record, Worksheet};
use misc_expense::project::{SheetProjector, project};

fn record(id: i64, row: u32, expenses: &[(&str, f64)]) -> Record {
    let mut record = Record::new(id, row);
    for (category, amount) in expenses {
        record.expenses.add(*category, *amount);
    }
    record
}

#[test]
fn writes_alternating_category_and_amount_cells() {
    let mut sheet = Worksheet::new("Data");
    let records = vec![
        record(101, 2, &[("Parking", 75.0), ("Toll", 10.0)]),
        record(102, 3, &[]),
    ];

    project(&mut sheet, &records, 7).expect("projection succeeds");

    assert_eq!(sheet.cell(2, 7), Some(&CellValue::Text("Parking".into())));
    assert_eq!(sheet.cell(2, 8), Some(&CellValue::Number(75.0)));
    assert_eq!(sheet.cell(2, 9), Some(&CellValue::Text("Toll".into())));
    assert_eq!(sheet.cell(2, 10), Some(&CellValue::Number(10.0)));
    assert_eq!(sheet.cells().count(), 4);
}

#[test]
fn leaves_cells_past_the_last_pair_untouched() {
    let mut sheet = Worksheet::new("Data");
    sheet.set_text(2, 7, "stale").expect("cell written");
    sheet.set_text(2, 9, "left alone").expect("cell written");
    sheet.set_number(2, 10, 3.0).expect("cell written");

    let written = SheetProjector::new(7)
        .project(&mut sheet, &[record(1, 2, &[("Fee", 2.0)])])
        .expect("projection succeeds");

    assert_eq!(written, 1);
    assert_eq!(sheet.cell_text(2, 7).as_deref(), Some("Fee"));
    assert_eq!(sheet.cell(2, 8), Some(&CellValue::Number(2.0)));
    assert_eq!(sheet.cell_text(2, 9).as_deref(), Some("left alone"));
    assert_eq!(sheet.cell(2, 10), Some(&CellValue::Number(3.0)));
}

#[test]
fn category_order_resorts_alphabetically() {
    let mut sheet = Worksheet::new("Data");
    let records = vec![record(1, 4, &[("toll", 1.0), ("Fuel", 2.0), ("meal", 3.0)])];

    SheetProjector::new(3)
        .with_order(ExpenseOrder::Category)
        .project(&mut sheet, &records)
        .expect("projection succeeds");

    let categories: Vec<String> = [3, 5, 7]
        .iter()
        .filter_map(|column| sheet.cell_text(4, *column))
        .collect();
    assert_eq!(categories, vec!["Fuel", "meal", "toll"]);
}

#[test]
fn invalid_address_is_fatal() {
    let mut sheet = Worksheet::new("Data");
    let records = vec![record(1, 0, &[("Fee", 1.0)])];

    assert!(project(&mut sheet, &records, 7).is_err());
}
