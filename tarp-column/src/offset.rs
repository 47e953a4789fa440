use crate::error::ColumnError;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// The row shape of a column at a point in time.
///
/// A layout is a snapshot, it must be taken again after every resize.
pub struct RowLayout {
    /// The number of rows in the column.
    pub length: usize,
    /// The number of elements stored per row.
    pub repeat: usize,
}

impl RowLayout {
    #[inline]
    /// The total number of elements in the column.
    pub fn size(&self) -> usize {
        self.length * self.repeat
    }

    #[inline]
    /// Returns the position of element `index` of `row` within the flat buffer.
    pub fn offset(&self, row: usize, index: usize) -> Result<usize, ColumnError> {
        if row >= self.length {
            return Err(ColumnError::InvalidRow {
                row,
                length: self.length,
            });
        }
        if index >= self.repeat {
            return Err(ColumnError::OutOfRange {
                index,
                repeat: self.repeat,
            });
        }
        Ok(row * self.repeat + index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_formula() {
        let layout = RowLayout { length: 4, repeat: 3 };
        for row in 0..4 {
            for index in 0..3 {
                assert_eq!(layout.offset(row, index).unwrap(), row * 3 + index);
            }
        }
        assert_eq!(layout.size(), 12);
    }

    #[rstest::rstest]
    #[case(4, 0)]
    #[case(9, 2)]
    fn test_offset_invalid_row(#[case] row: usize, #[case] index: usize) {
        let layout = RowLayout { length: 4, repeat: 3 };
        let err = layout.offset(row, index).expect_err("Row should be rejected");
        assert!(matches!(err, ColumnError::InvalidRow { length: 4, .. }));
    }

    #[test]
    fn test_offset_invalid_index() {
        let layout = RowLayout { length: 4, repeat: 3 };
        let err = layout.offset(1, 3).expect_err("Index should be rejected");
        assert!(matches!(err, ColumnError::OutOfRange { index: 3, repeat: 3 }));
    }

    #[test]
    fn test_offset_empty_column() {
        let layout = RowLayout { length: 0, repeat: 1 };
        assert!(layout.offset(0, 0).is_err());
    }
}
