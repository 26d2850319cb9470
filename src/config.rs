//! Run settings, loaded from an optional JSON file and overridden by the CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ExpenseError, Result};
use crate::io::store::LineItemSchema;
use crate::model::{ExpenseOrder, MAX_COLUMN, MAX_ROW};
use crate::normalize::EquivalenceTable;

/// Settings for one pipeline run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// 1-based index of the worksheet holding the records.
    pub sheet_index: usize,
    /// Column carrying the record identifiers.
    pub id_column: u32,
    /// First column receiving category/amount pairs.
    pub start_column: u32,
    /// Row holding the column headers; data starts on the next row.
    pub header_row: u32,
    /// Order in which each record's categories are written.
    pub expense_order: ExpenseOrder,
    /// Equivalence table as `pattern;replacement` strings.
    pub replace: Vec<String>,
    pub store: StoreSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_index: 3,
            id_column: 2,
            start_column: 7,
            header_row: 1,
            expense_order: ExpenseOrder::Insertion,
            replace: Vec::new(),
            store: StoreSettings::default(),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file and validates them.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExpenseError::MissingConfig(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that indices address a real sheet cell.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_index == 0 {
            return Err(ExpenseError::InvalidConfig(
                "sheet_index is 1-based and must be at least 1".into(),
            ));
        }
        for (name, column) in [
            ("id_column", self.id_column),
            ("start_column", self.start_column),
        ] {
            if column == 0 || column > MAX_COLUMN {
                return Err(ExpenseError::InvalidConfig(format!(
                    "{name} must be between 1 and {MAX_COLUMN}, got {column}"
                )));
            }
        }
        if self.header_row >= MAX_ROW {
            return Err(ExpenseError::InvalidConfig(format!(
                "header_row must be below {MAX_ROW}, got {}",
                self.header_row
            )));
        }
        if self.store.timeout_secs == 0 {
            return Err(ExpenseError::InvalidConfig(
                "store.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Builds the equivalence table from the `replace` entries.
    pub fn equivalence_table(&self) -> EquivalenceTable {
        EquivalenceTable::from_entries(&self.replace)
    }
}

/// Location and layout of the line-item database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub path: Option<PathBuf>,
    pub table: String,
    pub id_column: String,
    pub category_column: String,
    pub amount_column: String,
    pub date_column: String,
    /// Seconds to wait on a locked database before failing the run.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        let schema = LineItemSchema::default();
        Self {
            path: None,
            table: schema.table,
            id_column: schema.id_column,
            category_column: schema.category_column,
            amount_column: schema.amount_column,
            date_column: schema.date_column,
            timeout_secs: 5,
        }
    }
}

impl StoreSettings {
    pub fn schema(&self) -> LineItemSchema {
        LineItemSchema {
            table: self.table.clone(),
            id_column: self.id_column.clone(),
            category_column: self.category_column.clone(),
            amount_column: self.amount_column.clone(),
            date_column: self.date_column.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the database path or fails when none was configured.
    pub fn require_path(&self) -> Result<&Path> {
        let path = self.path.as_deref().ok_or_else(|| {
            ExpenseError::InvalidConfig("no line-item database configured".into())
        })?;
        if !path.exists() {
            return Err(ExpenseError::MissingDatabase(path.to_path_buf()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{ "start_column": 9, "replace": ["parking;Parking"], "store": { "table": "Misc" } }"#,
        )
        .unwrap();

        assert_eq!(settings.sheet_index, 3);
        assert_eq!(settings.id_column, 2);
        assert_eq!(settings.start_column, 9);
        assert_eq!(settings.expense_order, ExpenseOrder::Insertion);
        assert_eq!(settings.store.table, "Misc");
        assert_eq!(settings.store.category_column, "Lain");
        assert_eq!(settings.equivalence_table().len(), 1);
    }

    #[test]
    fn zero_column_is_rejected() {
        let settings = Settings {
            id_column: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ExpenseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_settings_file_is_reported_as_such() {
        let error = Settings::load(Path::new("/nonexistent/settings.json")).unwrap_err();

        assert!(matches!(error, ExpenseError::MissingConfig(_)));
        assert_eq!(
            error.to_string(),
            "settings file not found: /nonexistent/settings.json"
        );
    }

    #[test]
    fn expense_order_parses_lowercase_names() {
        let settings: Settings = serde_json::from_str(r#"{ "expense_order": "category" }"#).unwrap();
        assert_eq!(settings.expense_order, ExpenseOrder::Category);
    }
}
