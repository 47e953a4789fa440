use std::io;

use crate::datatype::StoredDataType;

#[derive(Debug, thiserror::Error)]
/// An error that can occur when accessing or reshaping a column.
///
/// A failed operation never leaves the column half-updated, a column
/// that failed to load stays unloaded and can be retried.
pub enum ColumnError {
    #[error("Invalid row: {row} is outside the column of {length} rows")]
    /// The row is outside the legal range for the requested operation.
    InvalidRow { row: usize, length: usize },
    #[error("Invalid row count: {nrows} exceeds the {available} rows available")]
    /// More rows were requested than are available from the given row onwards.
    InvalidCount { nrows: usize, available: usize },
    #[error("Index out of range: {index} is outside a row of {repeat} elements")]
    /// The element index is outside `0..repeat`.
    OutOfRange { index: usize, repeat: usize },
    #[error("IO Error: {0}")]
    /// The backing block could not be read or written.
    Io(#[from] io::Error),
    #[error("Malformed block: expected {expected} bytes, got {actual}")]
    /// The backing block does not have the size the column layout requires.
    MalformedBlock { expected: usize, actual: usize },
    #[error("Invalid width: {data_type:?} elements are {expected} bytes wide, not {width}")]
    /// The element width does not match the fixed width of the stored kind.
    InvalidWidth {
        data_type: StoredDataType,
        width: usize,
        expected: usize,
    },
    #[error("Type mismatch: expected {expected:?}, got {actual:?}")]
    /// The stored kind of the column differs from the requested element type.
    TypeMismatch {
        expected: StoredDataType,
        actual: StoredDataType,
    },
}
