//! Type erased access to columns.
//!
//! Tables hold columns of many element types side by side, this provides a
//! common abstraction over all [Column] variants.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use super::Column;
use crate::adapter::{ColumnId, FileAdapter};
use crate::config::CopyOptions;
use crate::datatype::StoredDataType;
use crate::element::{Bit, Element};
use crate::error::ColumnError;

/// Accessor methods for a column of any element type.
pub trait ColumnAccess: Debug + Send + Sync {
    /// The name of the column.
    fn name(&self) -> &str;
    /// The stored kind of the column elements.
    fn data_type(&self) -> StoredDataType;
    /// The number of rows.
    fn length(&self) -> usize;
    /// The number of elements per row.
    fn repeat(&self) -> usize;
    /// The width of a single element in bytes.
    fn width(&self) -> usize;
    /// Returns `true` if the buffer is materialized.
    fn is_loaded(&self) -> bool;
    /// Materializes the buffer.
    fn load(&mut self) -> Result<(), ColumnError>;
    /// Frees the buffer.
    fn release(&mut self);
    /// Resets the column to an empty, unloaded state.
    fn clear(&mut self);
    /// Returns the element at `row` and `index` as text.
    fn as_text(&mut self, row: usize, index: usize) -> Result<String, ColumnError>;
    /// Returns the element at `row` and `index` as a double precision float.
    fn as_real(&mut self, row: usize, index: usize) -> Result<f64, ColumnError>;
    /// Returns the element at `row` and `index` truncated to an integer.
    fn as_integer(&mut self, row: usize, index: usize) -> Result<i32, ColumnError>;
    /// Inserts `nrows` zeroed rows before `row`.
    fn insert(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError>;
    /// Removes `nrows` rows starting at `row`.
    fn remove(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError>;
    /// Returns the binary table format code of the column.
    fn tform(&self) -> String;
    /// Writes the column as a new stored block with the given id.
    fn save(&mut self, adapter: Arc<dyn FileAdapter>, id: ColumnId) -> Result<(), ColumnError>;
    /// Copies the column, see [Column::duplicate].
    fn duplicate(&mut self, options: &CopyOptions) -> Result<Box<dyn ColumnAccess>, ColumnError>;
    /// Returns the column as [Any] for downcasting to its typed [Column].
    fn as_any(&self) -> &dyn Any;
    /// Returns the column as mutable [Any] for downcasting to its typed [Column].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Element> ColumnAccess for Column<T> {
    #[inline]
    fn name(&self) -> &str {
        Column::name(self)
    }

    #[inline]
    fn data_type(&self) -> StoredDataType {
        T::DATA_TYPE
    }

    #[inline]
    fn length(&self) -> usize {
        Column::length(self)
    }

    #[inline]
    fn repeat(&self) -> usize {
        Column::repeat(self)
    }

    #[inline]
    fn width(&self) -> usize {
        Column::width(self)
    }

    #[inline]
    fn is_loaded(&self) -> bool {
        Column::is_loaded(self)
    }

    fn load(&mut self) -> Result<(), ColumnError> {
        Column::load(self)
    }

    fn release(&mut self) {
        Column::release(self)
    }

    fn clear(&mut self) {
        Column::clear(self)
    }

    fn as_text(&mut self, row: usize, index: usize) -> Result<String, ColumnError> {
        Column::as_text(self, row, index)
    }

    fn as_real(&mut self, row: usize, index: usize) -> Result<f64, ColumnError> {
        Column::as_real(self, row, index)
    }

    fn as_integer(&mut self, row: usize, index: usize) -> Result<i32, ColumnError> {
        Column::as_integer(self, row, index)
    }

    fn insert(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError> {
        Column::insert(self, row, nrows)
    }

    fn remove(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError> {
        Column::remove(self, row, nrows)
    }

    fn tform(&self) -> String {
        Column::tform(self)
    }

    fn save(&mut self, adapter: Arc<dyn FileAdapter>, id: ColumnId) -> Result<(), ColumnError> {
        Column::save(self, adapter, id)
    }

    fn duplicate(&mut self, options: &CopyOptions) -> Result<Box<dyn ColumnAccess>, ColumnError> {
        let copy = Column::duplicate(self, options)?;
        Ok(Box::new(copy))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Opens the stored column with the given id as the column type matching
/// its stored kind.
///
/// The column stays unloaded until its data is first accessed.
pub fn open_column(
    adapter: Arc<dyn FileAdapter>,
    id: ColumnId,
) -> Result<Box<dyn ColumnAccess>, ColumnError> {
    let schema = adapter.column_schema(&id)?;

    let column: Box<dyn ColumnAccess> = match schema.data_type {
        StoredDataType::Bit => Box::new(Column::<Bit>::open(adapter, id)?),
        StoredDataType::U8 => Box::new(Column::<u8>::open(adapter, id)?),
        StoredDataType::Logical => Box::new(Column::<bool>::open(adapter, id)?),
        StoredDataType::String => Box::new(Column::<String>::open(adapter, id)?),
        StoredDataType::U16 => Box::new(Column::<u16>::open(adapter, id)?),
        StoredDataType::I16 => Box::new(Column::<i16>::open(adapter, id)?),
        StoredDataType::U32 => Box::new(Column::<u32>::open(adapter, id)?),
        StoredDataType::I32 => Box::new(Column::<i32>::open(adapter, id)?),
        StoredDataType::F32 => Box::new(Column::<f32>::open(adapter, id)?),
        StoredDataType::I64 => Box::new(Column::<i64>::open(adapter, id)?),
        StoredDataType::F64 => Box::new(Column::<f64>::open(adapter, id)?),
    };

    Ok(column)
}
