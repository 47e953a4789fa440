//! Element type descriptors.
//!
//! Every scalar kind a column can hold implements [Element], which is the
//! only place per-kind behaviour lives. The column engine itself is written
//! once, generic over this trait.

mod logical;
mod primitive;
mod text;

use std::fmt::Debug;

use bytes::BytesMut;

pub use self::logical::Bit;
use crate::datatype::StoredDataType;
use crate::error::ColumnError;

/// The capability set of a scalar kind stored in a column.
pub trait Element: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The stored kind of the element.
    const DATA_TYPE: StoredDataType;

    /// The zero value used to initialise new rows.
    fn zero() -> Self;

    /// The width of a single element in bytes, unless the column
    /// specifies its own width.
    fn default_width() -> usize {
        Self::DATA_TYPE.default_width()
    }

    /// Decodes a single row of `repeat` elements from `row`.
    ///
    /// `row` is exactly [StoredDataType::row_bytes] long.
    fn decode_row(row: &[u8], repeat: usize, width: usize, out: &mut Vec<Self>);

    /// Encodes a single row of elements into `out`.
    fn encode_row(values: &[Self], width: usize, out: &mut BytesMut);

    /// The canonical text representation of the value.
    fn to_text(&self) -> String;

    /// The value converted to a double precision float.
    fn to_real(&self) -> f64;

    /// The value truncated to a 32 bit integer.
    fn to_integer(&self) -> i32;

    /// Converts the integer "undefined" marker of a stored column
    /// into this kind, if the kind supports one.
    fn from_stored_null(_tnull: i64) -> Option<Self> {
        None
    }

    /// Returns `true` if the value is undefined by construction (NaN).
    fn is_undefined(&self) -> bool {
        false
    }
}

/// Decodes a full column block of `length` rows.
pub fn decode_block<T: Element>(
    block: &[u8],
    length: usize,
    repeat: usize,
    width: usize,
) -> Result<Vec<T>, ColumnError> {
    T::DATA_TYPE.check_width(width)?;

    let row_bytes = T::DATA_TYPE.row_bytes(repeat, width);
    let expected = row_bytes * length;
    if block.len() != expected {
        return Err(ColumnError::MalformedBlock {
            expected,
            actual: block.len(),
        });
    }

    let mut values = Vec::with_capacity(length * repeat);
    if row_bytes == 0 {
        // Zero width rows occupy no bytes but still hold `repeat` elements.
        for _ in 0..length {
            T::decode_row(&[], repeat, width, &mut values);
        }
        return Ok(values);
    }

    for row in block.chunks_exact(row_bytes) {
        T::decode_row(row, repeat, width, &mut values);
    }

    Ok(values)
}

/// Encodes a full column buffer into a block.
///
/// `values` must hold a multiple of `repeat` elements.
pub fn encode_block<T: Element>(values: &[T], repeat: usize, width: usize) -> BytesMut {
    let rows = if repeat == 0 { 0 } else { values.len() / repeat };
    let mut block = BytesMut::with_capacity(T::DATA_TYPE.row_bytes(repeat, width) * rows);
    if repeat == 0 {
        return block;
    }

    for row in values.chunks_exact(repeat) {
        T::encode_row(row, width, &mut block);
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_block_size_mismatch() {
        let err = decode_block::<i32>(&[0, 0, 0, 1, 0, 0], 2, 1, 4)
            .expect_err("Block should be rejected");
        assert!(
            matches!(err, ColumnError::MalformedBlock { expected: 8, actual: 6 }),
            "Unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_decode_block_big_endian() {
        let block = [0x00, 0x00, 0x00, 0x0A, 0xFF, 0xFF, 0xFF, 0xFE];
        let values = decode_block::<i32>(&block, 2, 1, 4).unwrap();
        assert_eq!(values, vec![10, -2]);

        let encoded = encode_block(&values, 1, 4);
        assert_eq!(encoded.as_ref(), &block);
    }

    #[test]
    fn test_decode_vector_rows() {
        let values: Vec<i16> = vec![1, 2, 3, 4, 5, 6];
        let block = encode_block(&values, 3, 2);
        assert_eq!(block.len(), 12);
        let decoded = decode_block::<i16>(&block, 2, 3, 2).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_decode_zero_width_text() {
        let values = decode_block::<String>(&[], 3, 2, 0).unwrap();
        assert_eq!(values, vec![String::new(); 6]);
    }

    #[test]
    fn test_decode_rejects_wrong_fixed_width() {
        let err = decode_block::<i32>(&[0, 1, 0, 2], 2, 1, 2).unwrap_err();
        assert!(matches!(
            err,
            ColumnError::InvalidWidth {
                data_type: StoredDataType::I32,
                width: 2,
                expected: 4,
            }
        ));
    }

    #[test]
    fn test_decode_empty_block() {
        let values = decode_block::<f64>(&[], 0, 4, 8).unwrap();
        assert!(values.is_empty());
    }
}
