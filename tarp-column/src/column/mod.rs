//! The column facade.
//!
//! A [Column] combines the row layout, the lazily loaded buffer and the null
//! policy of a single typed column. Any call that needs element data may
//! materialize the buffer first, which is why even the read accessors take
//! `&mut self`: the first read of an unloaded column performs a fetch.

mod access;

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, instrument};

pub use self::access::{open_column, ColumnAccess};
use crate::adapter::{ColumnId, ColumnSchema, FileAdapter};
use crate::cache::{BlockSource, BlockWindow, LazyBuffer};
use crate::config::CopyOptions;
use crate::element::{encode_block, Element};
use crate::error::ColumnError;
use crate::null::NullPolicy;
use crate::offset::RowLayout;

#[derive(Debug, Clone)]
/// A named, typed column of `length` rows with `repeat` elements per row.
///
/// Cloning a column always copies its metadata but only copies the buffer
/// if it is currently loaded, an unloaded clone performs its own fetch
/// from the shared stored block on first use.
pub struct Column<T: Element> {
    /// The name of the column.
    name: String,
    /// The number of rows.
    length: usize,
    /// The number of elements per row, fixed at creation.
    repeat: usize,
    /// The width of a single element in bytes.
    width: usize,
    /// The first row of the stored block this column is a view of.
    row_start: usize,
    buffer: LazyBuffer<T>,
    null: NullPolicy<T>,
}

impl<T: Element> Column<T> {
    /// Creates an unloaded column of `length` rows that is not backed by
    /// any stored block.
    ///
    /// The first access materializes a zeroed buffer.
    pub fn new(name: impl Into<String>, length: usize, repeat: usize) -> Self {
        Self::with_width(name, length, repeat, T::default_width())
    }

    /// Creates an unloaded column with an explicit element width.
    ///
    /// This is mostly useful for text columns where the width is the
    /// number of characters of each string.
    pub fn with_width(
        name: impl Into<String>,
        length: usize,
        repeat: usize,
        width: usize,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            repeat: repeat.max(1),
            width,
            row_start: 0,
            buffer: LazyBuffer::default(),
            null: NullPolicy::default(),
        }
    }

    /// Creates a loaded column holding the given values.
    ///
    /// `values` must hold a multiple of `repeat` elements, any trailing
    /// partial row is dropped.
    pub fn from_values(name: impl Into<String>, repeat: usize, mut values: Vec<T>) -> Self {
        let repeat = repeat.max(1);
        let length = values.len() / repeat;
        values.truncate(length * repeat);

        Self {
            name: name.into(),
            length,
            repeat,
            width: T::default_width(),
            row_start: 0,
            buffer: LazyBuffer::with_values(values),
            null: NullPolicy::default(),
        }
    }

    /// Opens the stored column with the given id.
    ///
    /// The column is created from the schema alone and stays unloaded until
    /// its data is first accessed.
    pub fn open(adapter: Arc<dyn FileAdapter>, id: ColumnId) -> Result<Self, ColumnError> {
        let schema = adapter.column_schema(&id)?;
        let rows = 0..schema.length;
        Self::open_schema(adapter, id, schema, rows)
    }

    /// Opens a window of `rows` of the stored column with the given id.
    pub fn open_window(
        adapter: Arc<dyn FileAdapter>,
        id: ColumnId,
        rows: Range<usize>,
    ) -> Result<Self, ColumnError> {
        let schema = adapter.column_schema(&id)?;
        if rows.start > rows.end || rows.end > schema.length {
            return Err(ColumnError::InvalidRow {
                row: rows.end.max(rows.start),
                length: schema.length,
            });
        }
        Self::open_schema(adapter, id, schema, rows)
    }

    fn open_schema(
        adapter: Arc<dyn FileAdapter>,
        id: ColumnId,
        schema: ColumnSchema,
        rows: Range<usize>,
    ) -> Result<Self, ColumnError> {
        if schema.data_type != T::DATA_TYPE {
            return Err(ColumnError::TypeMismatch {
                expected: T::DATA_TYPE,
                actual: schema.data_type,
            });
        }
        T::DATA_TYPE.check_width(schema.width)?;

        debug!(column = %id, rows = ?rows, "Opened column");

        let stored_null = schema.tnull.and_then(T::from_stored_null);
        let source = BlockSource { adapter, id };
        Ok(Self {
            name: schema.name,
            length: rows.len(),
            repeat: schema.repeat.max(1),
            width: schema.width,
            row_start: rows.start,
            buffer: LazyBuffer::backed_by(source, stored_null),
            null: NullPolicy::default(),
        })
    }

    #[inline]
    /// The name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the column.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    /// The number of rows in the column.
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    /// The number of elements stored per row.
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    #[inline]
    /// The width of a single element in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    /// The total number of elements, `length * repeat`.
    pub fn size(&self) -> usize {
        self.layout().size()
    }

    #[inline]
    /// The first row of the stored block this column is a view of.
    pub fn row_start(&self) -> usize {
        self.row_start
    }

    #[inline]
    /// Returns `true` if the buffer is materialized.
    pub fn is_loaded(&self) -> bool {
        self.buffer.is_loaded()
    }

    #[inline]
    /// Returns `true` if the column is backed by a stored block.
    pub fn is_backed(&self) -> bool {
        self.buffer.source().is_some()
    }

    #[inline]
    pub(crate) fn layout(&self) -> RowLayout {
        RowLayout {
            length: self.length,
            repeat: self.repeat,
        }
    }

    fn window(&self) -> BlockWindow {
        BlockWindow {
            layout: self.layout(),
            width: self.width,
            row_start: self.row_start,
        }
    }

    /// Materializes the buffer if it is not loaded yet.
    ///
    /// An empty column has nothing to load and stays unloaded.
    pub fn load(&mut self) -> Result<(), ColumnError> {
        if self.size() == 0 {
            return Ok(());
        }
        self.materialize()?;
        Ok(())
    }

    /// Releases and loads the column again.
    ///
    /// Any in-memory change of a column backed by a stored block is lost, this
    /// is the way to apply a changed null sentinel to the loaded data.
    pub fn reload(&mut self) -> Result<(), ColumnError> {
        self.release();
        self.load()
    }

    /// Frees the buffer, the column becomes unloaded.
    pub fn release(&mut self) {
        self.buffer.release();
    }

    pub(crate) fn materialize(&mut self) -> Result<&mut Vec<T>, ColumnError> {
        let window = self.window();
        self.buffer.ensure_loaded(window, &self.null)
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut LazyBuffer<T> {
        &mut self.buffer
    }

    pub(crate) fn set_length(&mut self, length: usize) {
        self.length = length;
    }

    /// Returns a reference to element `index` of `row`.
    pub fn get(&mut self, row: usize, index: usize) -> Result<&T, ColumnError> {
        let offset = self.layout().offset(row, index)?;
        let data = self.materialize()?;
        Ok(&data[offset])
    }

    /// Returns a mutable reference to element `index` of `row`.
    pub fn get_mut(&mut self, row: usize, index: usize) -> Result<&mut T, ColumnError> {
        let offset = self.layout().offset(row, index)?;
        let data = self.materialize()?;
        Ok(&mut data[offset])
    }

    /// Sets element `index` of `row`.
    pub fn set(&mut self, row: usize, index: usize, value: T) -> Result<(), ColumnError> {
        *self.get_mut(row, index)? = value;
        Ok(())
    }

    /// Returns the element at `row` and `index` if the column is loaded.
    ///
    /// Unlike [Self::get] this never fetches.
    pub fn peek(&self, row: usize, index: usize) -> Result<Option<&T>, ColumnError> {
        let offset = self.layout().offset(row, index)?;
        Ok(self.buffer.values().map(|data| &data[offset]))
    }

    /// Returns all elements of the column, row by row.
    pub fn values(&mut self) -> Result<&[T], ColumnError> {
        if self.size() == 0 {
            return Ok(&[]);
        }
        let data = self.materialize()?;
        Ok(data.as_slice())
    }

    /// Returns all elements of the column mutably, row by row.
    pub fn values_mut(&mut self) -> Result<&mut [T], ColumnError> {
        if self.size() == 0 {
            return Ok(&mut []);
        }
        let data = self.materialize()?;
        Ok(data.as_mut_slice())
    }

    /// Returns the elements of the column if it is loaded.
    pub fn loaded_values(&self) -> Option<&[T]> {
        self.buffer.values()
    }

    /// Returns the element at `row` and `index` as text.
    pub fn as_text(&mut self, row: usize, index: usize) -> Result<String, ColumnError> {
        self.get(row, index).map(T::to_text)
    }

    /// Returns the element at `row` and `index` as a double precision float.
    pub fn as_real(&mut self, row: usize, index: usize) -> Result<f64, ColumnError> {
        self.get(row, index).map(T::to_real)
    }

    /// Returns the element at `row` and `index` truncated to an integer.
    pub fn as_integer(&mut self, row: usize, index: usize) -> Result<i32, ColumnError> {
        self.get(row, index).map(T::to_integer)
    }

    /// Sets the null sentinel of the column.
    ///
    /// The sentinel is applied to undefined values when the column is
    /// fetched. Setting it on a loaded column does not touch the loaded
    /// values, call [Self::reload] to apply it.
    pub fn set_null(&mut self, value: Option<T>) {
        self.null.set(value);
    }

    #[inline]
    /// Returns the null sentinel if one is set.
    pub fn null_value(&self) -> Option<&T> {
        self.null.value()
    }

    #[inline]
    /// Returns `true` if a null sentinel is set.
    pub fn has_null(&self) -> bool {
        self.null.has_null()
    }

    /// Resets the column to an empty, unloaded state.
    ///
    /// The name and the number of elements per row are kept, everything
    /// else returns to its default.
    pub fn clear(&mut self) {
        self.buffer.release();
        self.buffer.detach();
        self.null = NullPolicy::default();
        self.length = 0;
        self.row_start = 0;
    }

    /// Returns the binary table format code of the column.
    pub fn tform(&self) -> String {
        T::DATA_TYPE.binary_format(self.repeat, self.width)
    }

    /// Returns the ASCII table format code of the column, if representable.
    pub fn ascii_format(&self) -> Option<String> {
        T::DATA_TYPE.ascii_format(self.width)
    }

    /// Describes the column as it currently is.
    pub fn schema(&self) -> ColumnSchema {
        ColumnSchema::builder()
            .name(self.name.clone())
            .data_type(T::DATA_TYPE)
            .length(self.length)
            .repeat(self.repeat)
            .width(self.width)
            .build()
    }

    #[instrument(skip(self, adapter), fields(column = %self.name))]
    /// Writes the column as a new stored block with the given id.
    ///
    /// The column is materialized if necessary and is backed by the written
    /// block afterwards.
    pub fn save(
        &mut self,
        adapter: Arc<dyn FileAdapter>,
        id: ColumnId,
    ) -> Result<(), ColumnError> {
        let (repeat, width) = (self.repeat, self.width);
        let block = match self.size() {
            0 => Default::default(),
            _ => encode_block(self.materialize()?, repeat, width),
        };

        let schema = self.schema();
        adapter.write_column_block(&id, &schema, block.freeze())?;
        debug!(target_column = %id, rows = self.length, "Saved column");

        self.row_start = 0;
        self.buffer.attach(BlockSource { adapter, id }, None);
        Ok(())
    }

    /// Copies the column.
    ///
    /// With [CopyOptions::conserve_memory] an unloaded column is loaded only for
    /// the duration of the copy and released again, the copy holds the data
    /// while `self` stays unloaded.
    pub fn duplicate(&mut self, options: &CopyOptions) -> Result<Self, ColumnError> {
        if !options.conserve_memory() || self.is_loaded() {
            return Ok(self.clone());
        }

        debug!(column = %self.name, "Copying unloaded column in conserve memory mode");
        self.load()?;
        let copy = self.clone();
        self.release();
        Ok(copy)
    }

    /// Replaces this column with a copy of `source`.
    ///
    /// See [Self::duplicate] for how `options` affects the source.
    pub fn assign_from(
        &mut self,
        source: &mut Column<T>,
        options: &CopyOptions,
    ) -> Result<(), ColumnError> {
        *self = source.duplicate(options)?;
        Ok(())
    }
}
