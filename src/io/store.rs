//! Line-item sources backing the aggregation stage.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use rusqlite::types::{Value, ValueRef};
use rusqlite::vtab::array::{self, Array};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, instrument};

use crate::config::StoreSettings;
use crate::error::Result;
use crate::model::{LineItem, RecordId};

/// Anything able to return the line items belonging to a set of records.
pub trait LineItemSource {
    /// Fetches every line item whose identifier is in `ids`.
    fn fetch_line_items(&mut self, ids: &[RecordId]) -> Result<Vec<LineItem>>;
}

/// Table and column names of the line-item table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemSchema {
    pub table: String,
    pub id_column: String,
    pub category_column: String,
    pub amount_column: String,
    pub date_column: String,
}

impl Default for LineItemSchema {
    fn default() -> Self {
        Self {
            table: "BiayaLain".to_string(),
            id_column: "ID".to_string(),
            category_column: "Lain".to_string(),
            amount_column: "BiayaLain".to_string(),
            date_column: "TGL".to_string(),
        }
    }
}

impl LineItemSchema {
    /// Query taking the whole id set as a single `rarray` parameter.
    fn select_statement(&self) -> String {
        format!(
            "SELECT {}, {}, {}, {} FROM {} WHERE {} IN rarray(?1)",
            quote_identifier(&self.id_column),
            quote_identifier(&self.category_column),
            quote_identifier(&self.amount_column),
            quote_identifier(&self.date_column),
            quote_identifier(&self.table),
            quote_identifier(&self.id_column),
        )
    }
}

/// Read-only SQLite database holding the line items.
pub struct SqliteStore {
    connection: Connection,
    schema: LineItemSchema,
}

impl SqliteStore {
    /// Opens the database at `path` read-only. Lock waits give up after
    /// `timeout`. The `rarray` table-valued function is registered on the
    /// connection.
    #[instrument(level = "debug", skip_all, fields(path = %path.display(), ?timeout))]
    pub fn open(path: &Path, schema: LineItemSchema, timeout: Duration) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(path, flags)?;
        connection.busy_timeout(timeout)?;
        array::load_module(&connection)?;
        Ok(Self { connection, schema })
    }

    /// Opens the store described by the settings.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let path = settings.require_path()?;
        Self::open(path, settings.schema(), settings.timeout())
    }
}

impl LineItemSource for SqliteStore {
    #[instrument(level = "info", skip_all, fields(id_count = ids.len()))]
    fn fetch_line_items(&mut self, ids: &[RecordId]) -> Result<Vec<LineItem>> {
        if ids.is_empty() {
            debug!("no identifiers, skipping query");
            return Ok(Vec::new());
        }

        let id_set: Array = Rc::new(ids.iter().copied().map(Value::from).collect());
        let mut statement = self.connection.prepare(&self.schema.select_statement())?;
        let items = statement
            .query_map([id_set], |row| {
                Ok(LineItem {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    amount: row.get(2)?,
                    date: value_to_text(row.get_ref(3)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(line_item_count = items.len(), "line items fetched");
        Ok(items)
    }
}

/// In-memory line items, filtered by identifier on fetch.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Vec<LineItem>,
}

impl MemoryStore {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}

impl LineItemSource for MemoryStore {
    fn fetch_line_items(&mut self, ids: &[RecordId]) -> Result<Vec<LineItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Real(number) => Some(number.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_statement_binds_the_id_set_once() {
        let sql = LineItemSchema::default().select_statement();
        assert_eq!(
            sql,
            "SELECT \"ID\", \"Lain\", \"BiayaLain\", \"TGL\" FROM \"BiayaLain\" WHERE \"ID\" IN rarray(?1)"
        );
    }

    #[test]
    fn identifiers_with_quotes_are_escaped() {
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
