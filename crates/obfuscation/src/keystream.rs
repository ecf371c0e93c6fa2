//! Pascal-table keystream for per-batch key selection

use std::ops::Deref;
use std::sync::Arc;

use thiserror::Error;

/// Batches at or below this size use the fixed [`FIXED_KEY_ROW`]
pub const SMALL_BATCH_LIMIT: usize = 5;

/// Number of table rows built for larger batches
pub const KEY_TABLE_ROWS: usize = 5;

/// Key row used for small batches
pub const FIXED_KEY_ROW: [u64; 2] = [1, 1];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ObfuscationError {
    #[error("Key row must contain at least one value")]
    EmptyKey,
}

/// Non-empty row of key values
///
/// Cloning is cheap: the values are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow(Arc<[u64]>);

impl KeyRow {
    /// Key values as a slice (never empty)
    pub fn values(&self) -> &[u64] {
        &self.0
    }

    /// Byte used to mask position `i` of a payload
    #[inline]
    pub fn byte_at(&self, i: usize) -> u8 {
        (self.0[i % self.0.len()] & 0xFF) as u8
    }
}

impl Deref for KeyRow {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

impl TryFrom<Vec<u64>> for KeyRow {
    type Error = ObfuscationError;

    fn try_from(values: Vec<u64>) -> Result<Self, Self::Error> {
        if values.is_empty() {
            return Err(ObfuscationError::EmptyKey);
        }
        Ok(Self(values.into()))
    }
}

/// Triangular table of binomial coefficients
///
/// Entries use wrapping arithmetic past row 67; the low byte that the cipher
/// consumes stays exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinatorialTable {
    rows: Vec<Vec<u64>>,
}

impl CombinatorialTable {
    /// Build a table with `rows` rows (at least one)
    pub fn build(rows: usize) -> Self {
        let rows = rows.max(1);
        let mut table: Vec<Vec<u64>> = Vec::with_capacity(rows);
        table.push(vec![1]);

        for i in 1..rows {
            let above = &table[i - 1];
            let mut row = Vec::with_capacity(i + 1);
            row.push(1);
            for j in 1..i {
                row.push(above[j - 1].wrapping_add(above[j]));
            }
            row.push(1);
            table.push(row);
        }

        Self { rows: table }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: a table has at least row 0
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[u64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Row `index` as a key, clamped to the last row
    pub fn key_row(&self, index: usize) -> KeyRow {
        let last = self.rows.len() - 1;
        KeyRow(self.rows[index.min(last)].as_slice().into())
    }
}

/// Shorthand for [`CombinatorialTable::build`]
pub fn build_table(rows: usize) -> CombinatorialTable {
    CombinatorialTable::build(rows)
}

/// Pick the key row for a batch of `batch_size` packets
pub fn select_key_row(batch_size: usize) -> KeyRow {
    if batch_size <= SMALL_BATCH_LIMIT {
        return KeyRow(FIXED_KEY_ROW.as_slice().into());
    }

    let table = CombinatorialTable::build(KEY_TABLE_ROWS);
    table.key_row(KEY_TABLE_ROWS - 1)
}
