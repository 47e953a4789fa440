use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::column::Column;
use crate::element::Element;
use crate::error::ColumnError;

/// A column that can be cheaply cloned and read from many threads.
///
/// A [Column] fetches its data on first read, which mutates it. Here that
/// transition is serialized: readers take an upgradable lock, only upgrade
/// it to load an unloaded column and then read the loaded buffer alongside
/// any other readers.
pub struct SharedColumn<T: Element> {
    inner: Arc<RwLock<Column<T>>>,
}

impl<T: Element> Clone for SharedColumn<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Element> From<Column<T>> for SharedColumn<T> {
    fn from(column: Column<T>) -> Self {
        Self::new(column)
    }
}

impl<T: Element> SharedColumn<T> {
    /// Wraps the given column.
    pub fn new(column: Column<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(column)),
        }
    }

    /// Returns a read guard of the column with its buffer loaded.
    ///
    /// An empty column is returned as is.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Column<T>>, ColumnError> {
        let guard = self.inner.upgradable_read();
        if guard.is_loaded() || guard.size() == 0 {
            return Ok(RwLockUpgradableReadGuard::downgrade(guard));
        }

        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        // Another reader may have been upgraded first.
        if !guard.is_loaded() {
            trace!(column = %guard.name(), "Loading shared column");
            guard.load()?;
        }
        Ok(RwLockWriteGuard::downgrade(guard))
    }

    /// Returns exclusive access to the column.
    pub fn write(&self) -> RwLockWriteGuard<'_, Column<T>> {
        self.inner.write()
    }

    /// Returns a copy of element `index` of `row`.
    pub fn get(&self, row: usize, index: usize) -> Result<T, ColumnError> {
        let guard = self.read()?;
        guard
            .peek(row, index)?
            .cloned()
            .ok_or(ColumnError::InvalidRow {
                row,
                length: guard.length(),
            })
    }

    /// Returns the element at `row` and `index` as a double precision float.
    pub fn as_real(&self, row: usize, index: usize) -> Result<f64, ColumnError> {
        self.get(row, index).map(|value| value.to_real())
    }

    /// Returns the element at `row` and `index` as text.
    pub fn as_text(&self, row: usize, index: usize) -> Result<String, ColumnError> {
        self.get(row, index).map(|value| value.to_text())
    }

    /// Returns `true` if the buffer is materialized.
    pub fn is_loaded(&self) -> bool {
        self.inner.read().is_loaded()
    }

    /// Frees the buffer of the column.
    pub fn release(&self) {
        self.inner.write().release();
    }
}
