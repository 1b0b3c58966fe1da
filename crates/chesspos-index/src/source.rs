//! Storage readers for tables of fixed-width boolean rows.
//!
//! A source holds named tables. The loader only needs three things from it:
//! the row count and width of a table, contiguous row-range reads, and a
//! stable row order across repeated reads.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{IndexError, Result};

/// A keyed collection of boolean row tables.
pub trait VectorSource {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Table keys in a stable order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Number of rows in a table.
    fn row_count(&self, key: &str) -> Result<usize>;

    /// Number of bits per row of a table.
    fn row_bits(&self, key: &str) -> Result<usize>;

    /// Read rows `range` of a table as a flat row-major matrix.
    fn read_rows(&self, key: &str, range: Range<usize>) -> Result<Vec<bool>>;
}

/// An in-memory table: `rows * width` booleans, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    width: usize,
    bits: Vec<bool>,
}

impl Table {
    /// Build a table from flat row-major bits.
    pub fn new(width: usize, bits: Vec<bool>) -> Result<Table> {
        if width == 0 || bits.len() % width != 0 {
            return Err(IndexError::Shape {
                context: "table length (multiple of row width)",
                expected: bits.len().next_multiple_of(width.max(1)),
                found: bits.len(),
            });
        }
        Ok(Table { width, bits })
    }

    /// Build a table from individual rows, which must all share one width.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Table> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut bits = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(IndexError::Shape {
                    context: "table row width",
                    expected: width,
                    found: row.len(),
                });
            }
            bits.extend_from_slice(row);
        }
        Table::new(width, bits)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.bits.len() / self.width
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

/// Tables held in memory, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    tables: BTreeMap<String, Table>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Add or replace a table.
    pub fn insert(&mut self, key: impl Into<String>, table: Table) {
        self.tables.insert(key.into(), table);
    }

    fn table(&self, key: &str) -> Result<&Table> {
        self.tables.get(key).ok_or_else(|| IndexError::SourceUnreadable {
            source_name: self.name.clone(),
            key: key.to_string(),
            reason: "no such table".to_string(),
        })
    }
}

impl VectorSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn row_count(&self, key: &str) -> Result<usize> {
        Ok(self.table(key)?.rows())
    }

    fn row_bits(&self, key: &str) -> Result<usize> {
        Ok(self.table(key)?.width())
    }

    fn read_rows(&self, key: &str, range: Range<usize>) -> Result<Vec<bool>> {
        let table = self.table(key)?;
        if range.start > range.end || range.end > table.rows() {
            return Err(IndexError::SourceUnreadable {
                source_name: self.name.clone(),
                key: key.to_string(),
                reason: format!("rows {range:?} out of bounds for {} rows", table.rows()),
            });
        }
        Ok(table.bits[range.start * table.width..range.end * table.width].to_vec())
    }
}
