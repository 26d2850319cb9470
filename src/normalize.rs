//! Category name normalisation driven by an ordered equivalence table.

use tracing::debug;

/// One `pattern;replacement` pair of the equivalence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    pub pattern: String,
    pub canonical: String,
}

/// Ordered list of equivalences. The first matching pattern wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceTable {
    entries: Vec<Equivalence>,
}

impl EquivalenceTable {
    /// Builds the table from `pattern;replacement` strings. Entries with
    /// fewer than two fields are skipped; fields past the second are ignored.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref();
                let mut fields = entry.split(';');
                match (fields.next(), fields.next()) {
                    (Some(pattern), Some(canonical)) => Some(Equivalence {
                        pattern: pattern.to_string(),
                        canonical: canonical.to_string(),
                    }),
                    _ => {
                        debug!(entry, "skipping malformed equivalence entry");
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[Equivalence] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps raw category labels to canonical names.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    table: EquivalenceTable,
}

impl NameNormalizer {
    pub fn new(table: EquivalenceTable) -> Self {
        Self { table }
    }

    /// Returns the canonical name of the first pattern equal to the trimmed
    /// label, ignoring case; otherwise the trimmed label itself.
    pub fn normalize(&self, label: &str) -> String {
        let trimmed = label.trim();
        let key = trimmed.to_uppercase();
        self.table
            .entries
            .iter()
            .find(|entry| entry.pattern.to_uppercase() == key)
            .map(|entry| entry.canonical.clone())
            .unwrap_or_else(|| trimmed.to_string())
    }
}
