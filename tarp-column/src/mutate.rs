//! Row insertion and removal.
//!
//! Both operations take the current buffer out of the column, allocate the
//! reshaped buffer and move the surviving elements across. Nothing can fail
//! once the old buffer has been taken. Reshaping a column detaches it from its
//! stored block, the in-memory buffer is the only copy of the data until it
//! is saved.

use std::mem;

use tracing::{debug, instrument};

use crate::column::Column;
use crate::element::Element;
use crate::error::ColumnError;

impl<T: Element> Column<T> {
    #[instrument(skip(self), fields(column = %self.name()))]
    /// Inserts `nrows` zeroed rows before `row`.
    ///
    /// `row` may be equal to the length of the column to append rows.
    /// Inserting into an empty column only sets its length, no buffer is
    /// allocated until the rows are first accessed.
    pub fn insert(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError> {
        let length = self.length();
        if row > length {
            return Err(ColumnError::InvalidRow { row, length });
        }

        // The element count of the reshaped column must fit in a usize.
        let available = (usize::MAX / self.repeat()).saturating_sub(length);
        if nrows > available {
            return Err(ColumnError::InvalidCount { nrows, available });
        }

        if nrows == 0 {
            return Ok(());
        }

        if length == 0 {
            debug!("Pre-sizing empty column");
            let buffer = self.buffer_mut();
            buffer.release();
            buffer.detach();
            self.set_length(nrows);
            return Ok(());
        }

        let repeat = self.repeat();
        let (at, count) = (row * repeat, nrows * repeat);
        let mut old = mem::take(self.materialize()?);

        let buffer = self.buffer_mut();
        let values = buffer.allocate(old.len() + count);
        values[..at].swap_with_slice(&mut old[..at]);
        values[at + count..].swap_with_slice(&mut old[at..]);
        buffer.detach();
        self.set_length(length + nrows);

        Ok(())
    }

    #[instrument(skip(self), fields(column = %self.name()))]
    /// Removes `nrows` rows starting at `row`.
    ///
    /// Removing every row releases the buffer, the column returns to the
    /// unloaded state.
    pub fn remove(&mut self, row: usize, nrows: usize) -> Result<(), ColumnError> {
        let length = self.length();
        if row >= length {
            return Err(ColumnError::InvalidRow { row, length });
        }

        let available = length - row;
        if nrows > available {
            return Err(ColumnError::InvalidCount { nrows, available });
        }

        if nrows == 0 {
            return Ok(());
        }

        let repeat = self.repeat();
        let (at, count) = (row * repeat, nrows * repeat);
        let mut old = mem::take(self.materialize()?);

        let buffer = self.buffer_mut();
        let values = buffer.allocate(old.len() - count);
        values[..at].swap_with_slice(&mut old[..at]);
        values[at..].swap_with_slice(&mut old[at + count..]);
        buffer.detach();
        self.set_length(length - nrows);

        Ok(())
    }
}
