use std::io;
use std::io::ErrorKind;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::{ColumnId, ColumnSchema, FileAdapter};
use crate::element::{encode_block, Element};

struct StoredColumn {
    schema: ColumnSchema,
    block: Bytes,
}

#[derive(Default)]
/// A [FileAdapter] keeping all column blocks in memory.
///
/// The adapter counts block reads and can be told to fail them, which makes
/// it suitable for embedding as well as for exercising the lazy load path.
pub struct MemoryAdapter {
    columns: RwLock<ahash::HashMap<ColumnId, StoredColumn>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
}

impl MemoryAdapter {
    /// Creates a new empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw block for the column described by `schema`.
    ///
    /// Returns an error if the block size does not match the schema.
    pub fn put_block(
        &self,
        id: ColumnId,
        schema: ColumnSchema,
        block: Bytes,
    ) -> io::Result<()> {
        if block.len() != schema.block_bytes() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "block of {} bytes does not match schema of {} bytes",
                    block.len(),
                    schema.block_bytes()
                ),
            ));
        }

        debug!(column = %id, bytes = block.len(), "Storing column block");
        self.columns.write().insert(id, StoredColumn { schema, block });
        Ok(())
    }

    /// Encodes and stores `values` as the block of the given column.
    ///
    /// `values` must hold a multiple of `repeat` elements.
    pub fn put_values<T: Element>(
        &self,
        id: ColumnId,
        repeat: usize,
        width: usize,
        values: &[T],
    ) -> io::Result<()> {
        if repeat == 0 || values.len() % repeat != 0 {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} values do not fill rows of {repeat}", values.len()),
            ));
        }

        let schema = ColumnSchema::builder()
            .name(id.column())
            .data_type(T::DATA_TYPE)
            .length(values.len() / repeat)
            .repeat(repeat)
            .width(width)
            .build();
        let block = encode_block(values, repeat, width).freeze();
        self.put_block(id, schema, block)
    }

    /// Sets the integer marker of undefined values of a stored column.
    pub fn set_tnull(&self, id: &ColumnId, tnull: Option<i64>) -> io::Result<()> {
        let mut columns = self.columns.write();
        let stored = columns.get_mut(id).ok_or_else(|| not_found(id))?;
        stored.schema.tnull = tnull;
        Ok(())
    }

    /// The number of block reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Makes all following block reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Returns a copy of the stored block of the column.
    pub fn block(&self, id: &ColumnId) -> Option<Bytes> {
        self.columns.read().get(id).map(|stored| stored.block.clone())
    }
}

impl FileAdapter for MemoryAdapter {
    fn column_schema(&self, id: &ColumnId) -> io::Result<ColumnSchema> {
        self.columns
            .read()
            .get(id)
            .map(|stored| stored.schema.clone())
            .ok_or_else(|| not_found(id))
    }

    fn read_column_block(&self, id: &ColumnId, rows: Range<usize>) -> io::Result<Bytes> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(io::Error::new(ErrorKind::Other, "injected read failure"));
        }

        let columns = self.columns.read();
        let stored = columns.get(id).ok_or_else(|| not_found(id))?;

        if rows.start > rows.end || rows.end > stored.schema.length {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "rows {rows:?} are outside the {} rows of {id}",
                    stored.schema.length
                ),
            ));
        }

        let row_bytes = stored.schema.row_bytes();
        let block = stored
            .block
            .slice(rows.start * row_bytes..rows.end * row_bytes);

        self.reads.fetch_add(1, Ordering::Relaxed);
        trace!(column = %id, rows = ?rows, bytes = block.len(), "Read column block");

        Ok(block)
    }

    fn write_column_block(
        &self,
        id: &ColumnId,
        schema: &ColumnSchema,
        block: Bytes,
    ) -> io::Result<()> {
        self.put_block(id.clone(), schema.clone(), block)
    }
}

fn not_found(id: &ColumnId) -> io::Error {
    io::Error::new(ErrorKind::NotFound, format!("column {id} does not exist"))
}
