//! A minimal table holding a set of row aligned columns.
//!
//! The table owns its columns, keeps their names unique and applies
//! structural edits to every column with identical arguments so all columns
//! always have the same number of rows.

use tracing::{debug, info, instrument};

use crate::column::{Column, ColumnAccess};
use crate::config::CopyOptions;
use crate::datatype::StoredDataType;
use crate::element::Element;
use crate::error::ColumnError;

#[derive(Debug, thiserror::Error)]
/// An error that can occur when operating on a table.
pub enum TableError {
    #[error("Column Error: {0}")]
    /// An operation on one of the columns failed.
    Column(#[from] ColumnError),
    #[error("Column already exists: {0:?}")]
    /// A column with the provided name already exists.
    DuplicateColumn(String),
    #[error("Column not found: {0:?}")]
    /// No column exists within the table with the given name.
    ColumnNotFound(String),
    #[error("Column {name:?} has {length} rows, the table has {nrows}")]
    /// The column does not have the same number of rows as the table.
    LengthMismatch {
        name: String,
        length: usize,
        nrows: usize,
    },
    #[error("Column {name:?} holds {actual:?} elements, not {expected:?}")]
    /// The column holds a different element type than requested.
    TypeMismatch {
        name: String,
        expected: StoredDataType,
        actual: StoredDataType,
    },
}

#[derive(Debug, Default)]
/// An ordered set of uniquely named, row aligned columns.
pub struct Table {
    name: String,
    nrows: usize,
    columns: Vec<Box<dyn ColumnAccess>>,
    index: ahash::HashMap<String, usize>,
}

impl Table {
    /// Creates a new table without any columns.
    pub fn new(name: impl Into<String>, nrows: usize) -> Self {
        Self {
            name: name.into(),
            nrows,
            ..Default::default()
        }
    }

    #[inline]
    /// The name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    /// The number of rows shared by all columns.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    /// The number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if a column with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &dyn ColumnAccess> {
        self.columns
            .iter()
            .map(|column| -> &dyn ColumnAccess { column.as_ref() })
    }

    /// Appends a column to the table.
    ///
    /// The first column of an empty table defines the number of rows, an
    /// empty column is sized to the table and any other column must match
    /// the table's number of rows.
    pub fn append(&mut self, mut column: Box<dyn ColumnAccess>) -> Result<(), TableError> {
        let name = column.name().to_string();
        if self.index.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }

        if self.columns.is_empty() && self.nrows == 0 {
            self.nrows = column.length();
        } else if column.length() == 0 {
            column.insert(0, self.nrows)?;
        } else if column.length() != self.nrows {
            return Err(TableError::LengthMismatch {
                name,
                length: column.length(),
                nrows: self.nrows,
            });
        }

        debug!(table = %self.name, column = %name, "Appended column");
        self.index.insert(name, self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Appends a typed column to the table.
    pub fn append_column<T: Element>(&mut self, column: Column<T>) -> Result<(), TableError> {
        self.append(Box::new(column))
    }

    /// Returns the column with the given name.
    pub fn column(&self, name: &str) -> Option<&dyn ColumnAccess> {
        let position = *self.index.get(name)?;
        Some(self.columns[position].as_ref())
    }

    /// Returns the column with the given name mutably.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut dyn ColumnAccess> {
        let position = *self.index.get(name)?;
        Some(self.columns[position].as_mut())
    }

    /// Returns the typed column with the given name.
    ///
    /// Structural edits must go through the table to keep the columns
    /// aligned, the typed column is meant for element access.
    pub fn typed_mut<T: Element>(&mut self, name: &str) -> Result<&mut Column<T>, TableError> {
        let column = self
            .column_mut(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;

        let actual = column.data_type();
        column
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .ok_or_else(|| TableError::TypeMismatch {
                name: name.to_string(),
                expected: T::DATA_TYPE,
                actual,
            })
    }

    /// Removes the column with the given name from the table.
    pub fn remove_column(&mut self, name: &str) -> Option<Box<dyn ColumnAccess>> {
        let position = self.index.remove(name)?;
        let column = self.columns.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        debug!(table = %self.name, column = %name, "Removed column");
        Some(column)
    }

    #[instrument(skip(self), fields(table = %self.name))]
    /// Inserts `nrows` zeroed rows before `row` into every column.
    ///
    /// All columns are materialized before any of them is reshaped, so a
    /// failed fetch leaves the table untouched.
    pub fn insert_rows(&mut self, row: usize, nrows: usize) -> Result<(), TableError> {
        if row > self.nrows {
            return Err(ColumnError::InvalidRow {
                row,
                length: self.nrows,
            }
            .into());
        }
        let available = usize::MAX - self.nrows;
        if nrows > available {
            return Err(ColumnError::InvalidCount { nrows, available }.into());
        }
        if nrows == 0 {
            return Ok(());
        }

        self.load_all()?;
        for column in self.columns.iter_mut() {
            column.insert(row, nrows)?;
        }
        self.nrows += nrows;

        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.name))]
    /// Removes `nrows` rows starting at `row` from every column.
    ///
    /// All columns are materialized before any of them is reshaped, so a
    /// failed fetch leaves the table untouched.
    pub fn remove_rows(&mut self, row: usize, nrows: usize) -> Result<(), TableError> {
        if row >= self.nrows {
            return Err(ColumnError::InvalidRow {
                row,
                length: self.nrows,
            }
            .into());
        }
        let available = self.nrows - row;
        if nrows > available {
            return Err(ColumnError::InvalidCount { nrows, available }.into());
        }
        if nrows == 0 {
            return Ok(());
        }

        self.load_all()?;
        for column in self.columns.iter_mut() {
            column.remove(row, nrows)?;
        }
        self.nrows -= nrows;

        Ok(())
    }

    /// Materializes every column of the table.
    pub fn load_all(&mut self) -> Result<(), TableError> {
        for column in self.columns.iter_mut() {
            column.load()?;
        }
        Ok(())
    }

    /// Frees the buffer of every column.
    pub fn release_all(&mut self) {
        for column in self.columns.iter_mut() {
            column.release();
        }
    }

    /// Drops every column, the table becomes empty.
    pub fn clear(&mut self) {
        info!(table = %self.name, columns = self.columns.len(), "Clearing table");
        for column in self.columns.iter_mut() {
            column.clear();
        }
        self.columns.clear();
        self.index.clear();
        self.nrows = 0;
    }

    /// Copies the table and all of its columns.
    pub fn duplicate(&mut self, options: &CopyOptions) -> Result<Self, TableError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter_mut() {
            columns.push(column.duplicate(options)?);
        }

        Ok(Self {
            name: self.name.clone(),
            nrows: self.nrows,
            columns,
            index: self.index.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapter::{ColumnId, MemoryAdapter};
    use crate::column::open_column;

    fn table() -> Table {
        let mut table = Table::new("EVENTS", 0);
        table
            .append_column(Column::from_values("ID", 1, vec![1i32, 2, 3]))
            .unwrap();
        table
            .append_column(Column::from_values("POS", 2, vec![0.5f64, 1.5, 2.5, 3.5, 4.5, 5.5]))
            .unwrap();
        table
    }

    #[test]
    fn test_append_rules() {
        let mut table = table();
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.ncols(), 2);

        let err = table
            .append_column(Column::from_values("ID", 1, vec![1i32, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(_)));

        let err = table
            .append_column(Column::from_values("BAD", 1, vec![1u8]))
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { length: 1, nrows: 3, .. }));

        table.append_column(Column::<i16>::new("EMPTY", 0, 1)).unwrap();
        let empty = table.column("EMPTY").unwrap();
        assert_eq!(empty.length(), 3);
        assert!(!empty.is_loaded());
    }

    #[test]
    fn test_rows_stay_aligned() {
        let mut table = table();
        table.insert_rows(1, 2).unwrap();
        assert_eq!(table.nrows(), 5);
        assert!(table.columns().all(|column| column.length() == 5));

        let ids = table.typed_mut::<i32>("ID").unwrap();
        assert_eq!(ids.values().unwrap(), &[1, 0, 0, 2, 3]);

        table.remove_rows(0, 2).unwrap();
        assert_eq!(table.nrows(), 3);
        let pos = table.typed_mut::<f64>("POS").unwrap();
        assert_eq!(pos.values().unwrap(), &[0.0, 0.0, 2.5, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn test_row_validation() {
        let mut table = table();
        assert!(matches!(
            table.insert_rows(4, 1),
            Err(TableError::Column(ColumnError::InvalidRow { .. }))
        ));
        assert!(matches!(
            table.remove_rows(1, 3),
            Err(TableError::Column(ColumnError::InvalidCount { .. }))
        ));
        assert!(matches!(
            table.insert_rows(0, usize::MAX),
            Err(TableError::Column(ColumnError::InvalidCount { .. }))
        ));
        assert_eq!(table.nrows(), 3);
    }

    #[test]
    fn test_failed_fetch_leaves_table_aligned() {
        let adapter = Arc::new(MemoryAdapter::new());
        let id = ColumnId::new("EVENTS", "TIME");
        adapter.put_values(id.clone(), 1, 8, &[1.0f64, 2.0, 3.0]).unwrap();

        let mut table = table();
        table.append(open_column(adapter.clone(), id).unwrap()).unwrap();

        adapter.set_fail_reads(true);
        assert!(table.insert_rows(0, 1).is_err());
        assert!(table.columns().all(|column| column.length() == 3));

        adapter.set_fail_reads(false);
        table.insert_rows(0, 1).unwrap();
        assert!(table.columns().all(|column| column.length() == 4));
    }

    #[test]
    fn test_typed_access_mismatch() {
        let mut table = table();
        let err = table.typed_mut::<f32>("ID").unwrap_err();
        assert!(matches!(
            err,
            TableError::TypeMismatch {
                expected: StoredDataType::F32,
                actual: StoredDataType::I32,
                ..
            }
        ));
        assert!(matches!(
            table.typed_mut::<i32>("missing"),
            Err(TableError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_remove_column_reindexes() {
        let mut table = table();
        table.append_column(Column::<u8>::new("LAST", 3, 1)).unwrap();

        let removed = table.remove_column("ID").unwrap();
        assert_eq!(removed.name(), "ID");
        assert!(!table.contains("ID"));
        assert_eq!(table.column("LAST").unwrap().name(), "LAST");
        assert_eq!(table.column("POS").unwrap().repeat(), 2);
    }

    #[test]
    fn test_duplicate_and_clear() {
        let mut table = table();
        let mut copy = table.duplicate(&CopyOptions::default()).unwrap();
        copy.remove_rows(0, 1).unwrap();
        assert_eq!(copy.nrows(), 2);
        assert_eq!(table.nrows(), 3);

        table.clear();
        assert_eq!(table.ncols(), 0);
        assert_eq!(table.nrows(), 0);
        assert!(table.column("ID").is_none());
    }
}
