use serde_derive::{Deserialize, Serialize};

use crate::error::ColumnError;

#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
/// The data type of the column as stored in a binary table block.
///
/// The discriminant is the numeric type code of the kind. These types have
/// no concept of nested structures, a row holds `repeat` scalars of one kind.
pub enum StoredDataType {
    Bit = 1,
    U8 = 11,
    Logical = 14,
    String = 16,
    U16 = 20,
    I16 = 21,
    U32 = 40,
    I32 = 41,
    F32 = 42,
    I64 = 81,
    F64 = 82,
}

impl StoredDataType {
    /// Returns the numeric type code of the kind.
    pub fn type_code(self) -> u32 {
        self as u32
    }

    /// Looks up the kind with the given numeric type code.
    pub fn from_type_code(code: u32) -> Option<Self> {
        let kind = match code {
            1 => Self::Bit,
            11 => Self::U8,
            14 => Self::Logical,
            16 => Self::String,
            20 => Self::U16,
            21 => Self::I16,
            40 => Self::U32,
            41 => Self::I32,
            42 => Self::F32,
            81 => Self::I64,
            82 => Self::F64,
            _ => return None,
        };
        Some(kind)
    }

    /// The width of a single element in bytes.
    ///
    /// Text columns have a per-column width, `1` is returned as the width of a
    /// single character. Bits are packed, see [Self::row_bytes].
    pub fn default_width(self) -> usize {
        match self {
            Self::Bit | Self::U8 | Self::Logical | Self::String => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    /// Returns `true` if every element of the kind has the same width.
    ///
    /// Text columns choose their width and bits are packed, every other
    /// kind must use [Self::default_width].
    pub fn has_fixed_width(self) -> bool {
        !matches!(self, Self::String | Self::Bit)
    }

    /// Checks that `width` is a legal element width for the kind.
    pub fn check_width(self, width: usize) -> Result<(), ColumnError> {
        let expected = self.default_width();
        if self.has_fixed_width() && width != expected {
            return Err(ColumnError::InvalidWidth {
                data_type: self,
                width,
                expected,
            });
        }
        Ok(())
    }

    /// The number of bytes a row of `repeat` elements of `width` bytes
    /// occupies in a block.
    pub fn row_bytes(self, repeat: usize, width: usize) -> usize {
        match self {
            Self::Bit => repeat.div_ceil(8),
            _ => repeat * width,
        }
    }

    /// Returns the binary table format code (`TFORM`) of a column.
    pub fn binary_format(self, repeat: usize, width: usize) -> String {
        let code = match self {
            Self::Bit => 'X',
            Self::U8 => 'B',
            Self::Logical => 'L',
            Self::U16 => 'U',
            Self::I16 => 'I',
            Self::U32 => 'V',
            Self::I32 => 'J',
            Self::F32 => 'E',
            Self::I64 => 'K',
            Self::F64 => 'D',
            Self::String if repeat > 1 => return format!("{}A{width}", repeat * width),
            Self::String => return format!("{width}A"),
        };
        format!("{repeat}{code}")
    }

    /// Returns the ASCII table format code of a column.
    ///
    /// Logical and bit columns cannot be represented in an ASCII table.
    pub fn ascii_format(self, width: usize) -> Option<String> {
        let format = match self {
            Self::Bit | Self::Logical => return None,
            Self::String => return Some(format!("A{width}")),
            Self::U8 => "I4",
            Self::U16 | Self::I16 => "I6",
            Self::U32 | Self::I32 => "I11",
            Self::I64 => "I20",
            Self::F32 => "E14.7",
            Self::F64 => "D23.15",
        };
        Some(format.to_string())
    }
}
