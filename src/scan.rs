//! Recovers billing records from the identifier column of a worksheet.
//!
//! Rows are read top-down from the first row under the header. Cells that do
//! not hold an integer are tolerated until more than [`FAILURE_TOLERANCE`] of
//! them follow each other, which marks the end of the data block.

use tracing::{debug, info, instrument};

use crate::model::{MAX_ROW, Record, RecordId, Worksheet};

/// Number of consecutive non-identifier rows accepted inside the data block.
pub const FAILURE_TOLERANCE: u8 = 3;

/// Row holding the column headers when none is configured.
pub const DEFAULT_HEADER_ROW: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Still inside the data block with this many consecutive failures.
    Counting(u8),
    Terminated,
}

impl ScanState {
    fn on_success(self) -> Self {
        ScanState::Counting(0)
    }

    fn on_failure(self) -> Self {
        match self {
            ScanState::Counting(failures) if failures < FAILURE_TOLERANCE => {
                ScanState::Counting(failures + 1)
            }
            _ => ScanState::Terminated,
        }
    }
}

/// Result of a scan: the records found and the last row that was read.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub records: Vec<Record>,
    pub stop_row: u32,
}

/// Walks one column of a worksheet collecting `(id, row)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct RecordScanner {
    id_column: u32,
    header_row: u32,
}

impl RecordScanner {
    pub fn new(id_column: u32) -> Self {
        Self {
            id_column,
            header_row: DEFAULT_HEADER_ROW,
        }
    }

    pub fn with_header_row(mut self, header_row: u32) -> Self {
        self.header_row = header_row;
        self
    }

    #[instrument(level = "info", skip_all, fields(sheet = %sheet.name, id_column = self.id_column))]
    pub fn scan(&self, sheet: &Worksheet) -> ScanOutcome {
        let mut records = Vec::new();
        let mut state = ScanState::Counting(0);
        let mut row = self.header_row;

        while state != ScanState::Terminated && row < MAX_ROW {
            row += 1;
            match sheet
                .cell_text(row, self.id_column)
                .as_deref()
                .and_then(parse_id)
            {
                Some(id) => {
                    debug!(id, row, "record found");
                    records.push(Record::new(id, row));
                    state = state.on_success();
                }
                None => state = state.on_failure(),
            }
        }

        info!(record_count = records.len(), stop_row = row, "scan finished");
        ScanOutcome {
            records,
            stop_row: row,
        }
    }
}

/// Scans `sheet` from the default header offset and returns the records found.
pub fn scan(sheet: &Worksheet, id_column: u32) -> Vec<Record> {
    RecordScanner::new(id_column).scan(sheet).records
}

fn parse_id(text: &str) -> Option<RecordId> {
    text.trim().parse().ok()
}
