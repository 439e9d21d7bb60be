//! Ordered record tables with a name→index resolver.
//!
//! The loader produces one table per input file: a header row plus rows of
//! field tuples, every field kept as a string. Checks never mutate the
//! payload; all validation state lives in a parallel flag array.

use crate::error::{ModelError, Result};

/// One data row: the source line number plus its field tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line in the source file, for diagnostics.
    pub line: u64,
    pub fields: Vec<String>,
}

impl Record {
    /// Field at `index`, or the empty string when the row is short.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A loaded dataset: column headers plus rows in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl RecordTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Resolve a column name to its index. Missing columns are fatal:
    /// every consumer addresses fields through this resolver, so a renamed
    /// or absent column means the input schema has drifted.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| ModelError::MissingColumn {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Field value at (`row`, `column`), empty string for short rows.
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.rows[row].field(column)
    }

    /// Sort rows by a key derived from each record, preserving input order
    /// for equal keys.
    pub fn sort_rows_by_key<K: Ord>(&mut self, key: impl Fn(&Record) -> K) {
        self.rows.sort_by_key(key);
    }
}
