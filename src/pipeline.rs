use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use uuid::Uuid;

use crate::aggregate::ExpenseAggregator;
use crate::config::Settings;
use crate::error::{ExpenseError, Result};
use crate::io::excel_read;
use crate::io::excel_write;
use crate::io::store::{LineItemSource, SqliteStore};
use crate::model::{Record, Workbook};
use crate::normalize::NameNormalizer;
use crate::project::SheetProjector;
use crate::scan::RecordScanner;

/// Suffix appended to the input file stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_Processed";

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Records found in the worksheet, with their aggregated expenses.
    pub records: Vec<Record>,
    /// Line items that contributed to a total.
    pub line_items: usize,
    /// Category/amount pairs written to the worksheet.
    pub categories_written: usize,
}

/// Runs scan, aggregation and projection on the configured worksheet of an
/// in-memory workbook. The worksheet is only written once aggregation has
/// succeeded.
#[instrument(
    level = "info",
    skip_all,
    fields(run_id = %Uuid::new_v4(), sheet_index = settings.sheet_index)
)]
pub fn process_workbook<S: LineItemSource>(
    workbook: &mut Workbook,
    source: &mut S,
    settings: &Settings,
) -> Result<RunSummary> {
    let scanner = RecordScanner::new(settings.id_column).with_header_row(settings.header_row);
    let mut records = scanner.scan(workbook.sheet(settings.sheet_index)?).records;

    let normalizer = NameNormalizer::new(settings.equivalence_table());
    let line_items = ExpenseAggregator::new(source, &normalizer).aggregate(&mut records)?;

    let projector = SheetProjector::new(settings.start_column).with_order(settings.expense_order);
    let categories_written = projector.project(workbook.sheet_mut(settings.sheet_index)?, &records)?;

    Ok(RunSummary {
        records,
        line_items,
        categories_written,
    })
}

/// Loads `input`, enriches it from the configured SQLite store and saves the
/// result to `output`. Nothing is written when any stage fails.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn process_file(input: &Path, output: &Path, settings: &Settings) -> Result<RunSummary> {
    if !input.exists() {
        return Err(ExpenseError::MissingInput(input.to_path_buf()));
    }
    settings.validate()?;

    let mut workbook = excel_read::read_workbook(input)?;
    info!(sheet_count = workbook.sheets.len(), "workbook loaded");

    let mut store = SqliteStore::from_settings(&settings.store)?;
    let summary = process_workbook(&mut workbook, &mut store, settings)?;
    drop(store);

    excel_write::write_workbook(output, &workbook)?;
    info!(
        record_count = summary.records.len(),
        categories_written = summary.categories_written,
        "workbook saved"
    );
    Ok(summary)
}

/// Returns `<stem>_Processed.<ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(extension) => format!("{stem}{OUTPUT_SUFFIX}.{}", extension.to_string_lossy()),
        None => format!("{stem}{OUTPUT_SUFFIX}"),
    };
    input.with_file_name(file_name)
}
