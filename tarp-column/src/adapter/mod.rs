//! The boundary between columns and the storage holding their blocks.
//!
//! A [FileAdapter] knows how to read and write the raw, big-endian block of a
//! column and how to describe its schema. Columns never touch storage
//! directly, everything goes through this trait.

mod memory;

use std::fmt::{Display, Formatter};
use std::io;
use std::ops::Range;

use bon::bon;
use bytes::Bytes;
use serde_derive::{Deserialize, Serialize};

pub use self::memory::MemoryAdapter;
use crate::datatype::StoredDataType;

/// Raw block access for the columns of a table file.
pub trait FileAdapter: Send + Sync {
    /// Returns the schema of the given column.
    fn column_schema(&self, id: &ColumnId) -> io::Result<ColumnSchema>;

    /// Reads the serialized block holding the given rows of the column.
    ///
    /// The returned block must be exactly `rows.len() * row_bytes` long.
    fn read_column_block(&self, id: &ColumnId, rows: Range<usize>) -> io::Result<Bytes>;

    /// Replaces the block of the column with a new block described by `schema`.
    fn write_column_block(
        &self,
        id: &ColumnId,
        schema: &ColumnSchema,
        block: Bytes,
    ) -> io::Result<()>;
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
/// The identity of a column within a storage.
pub struct ColumnId {
    table: String,
    column: String,
}

impl ColumnId {
    /// Creates a new [ColumnId] using the given components.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// The name of the table holding the column.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The name of the column.
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tarp://{}/{}", self.table, self.column)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
/// The stored description of a column.
pub struct ColumnSchema {
    /// The name of the column.
    pub name: String,
    /// The stored kind of the column elements.
    pub data_type: StoredDataType,
    /// The number of rows in the block.
    pub length: usize,
    /// The number of elements per row.
    pub repeat: usize,
    /// The width of a single element in bytes.
    pub width: usize,
    /// The integer marker of undefined values within the block, if any.
    pub tnull: Option<i64>,
}

#[bon]
impl ColumnSchema {
    #[builder]
    /// Creates a new schema.
    ///
    /// The width defaults to the width of the kind, text columns
    /// should always set it.
    pub fn new(
        #[builder(into)] name: String,
        data_type: StoredDataType,
        #[builder(default)] length: usize,
        #[builder(default = 1)] repeat: usize,
        width: Option<usize>,
        tnull: Option<i64>,
    ) -> Self {
        Self {
            name,
            data_type,
            length,
            repeat,
            width: width.unwrap_or_else(|| data_type.default_width()),
            tnull,
        }
    }

    #[inline]
    /// The number of bytes a single row occupies within the block.
    pub fn row_bytes(&self) -> usize {
        self.data_type.row_bytes(self.repeat, self.width)
    }

    #[inline]
    /// The number of bytes of the full block.
    pub fn block_bytes(&self) -> usize {
        self.row_bytes() * self.length
    }
}
