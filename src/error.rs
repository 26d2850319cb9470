use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Error type covering the failures that abort a pipeline run.
///
/// Scan-time parse failures and irrelevant line items are not represented
/// here; they are dropped silently by the stages that meet them.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the settings file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Connection, query or timeout failures reported by the line-item store.
    #[error("data source error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Raised when a workbook cannot be interpreted.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the configured worksheet index does not exist.
    #[error("worksheet {index} not found (workbook has {available} sheets)")]
    MissingSheet { index: usize, available: usize },

    /// Raised when a cell address falls outside the spreadsheet grid.
    #[error("invalid cell address row {row}, column {column}")]
    InvalidAddress { row: u32, column: u32 },

    /// Raised when settings are missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the settings file does not exist.
    #[error("settings file not found: {0}")]
    MissingConfig(PathBuf),

    /// Raised when the configured line-item database does not exist.
    #[error("line-item database not found: {0}")]
    MissingDatabase(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
