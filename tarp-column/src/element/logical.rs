//! Element descriptors for boolean columns.
//!
//! Logical columns store one byte per element (`T`, `F`, or `0` when
//! undefined), bit columns pack eight elements into a byte, most
//! significant bit first.

use bytes::{BufMut, BytesMut};

use super::Element;
use crate::datatype::StoredDataType;

impl Element for bool {
    const DATA_TYPE: StoredDataType = StoredDataType::Logical;

    #[inline]
    fn zero() -> Self {
        false
    }

    fn decode_row(row: &[u8], repeat: usize, _width: usize, out: &mut Vec<Self>) {
        out.extend(row[..repeat].iter().map(|byte| *byte == b'T'));
    }

    fn encode_row(values: &[Self], _width: usize, out: &mut BytesMut) {
        for value in values {
            out.put_u8(if *value { b'T' } else { b'F' });
        }
    }

    fn to_text(&self) -> String {
        logical_text(*self)
    }

    fn to_real(&self) -> f64 {
        if *self {
            1.0
        } else {
            0.0
        }
    }

    fn to_integer(&self) -> i32 {
        i32::from(*self)
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
/// A single bit of a bit-packed column.
pub struct Bit(pub bool);

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<Bit> for bool {
    fn from(value: Bit) -> Self {
        value.0
    }
}

impl Element for Bit {
    const DATA_TYPE: StoredDataType = StoredDataType::Bit;

    #[inline]
    fn zero() -> Self {
        Self(false)
    }

    fn decode_row(row: &[u8], repeat: usize, _width: usize, out: &mut Vec<Self>) {
        for i in 0..repeat {
            let mask = 0x80 >> (i % 8);
            out.push(Self(row[i / 8] & mask != 0));
        }
    }

    fn encode_row(values: &[Self], _width: usize, out: &mut BytesMut) {
        for chunk in values.chunks(8) {
            let mut byte = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                if bit.0 {
                    byte |= 0x80 >> i;
                }
            }
            out.put_u8(byte);
        }
    }

    fn to_text(&self) -> String {
        logical_text(self.0)
    }

    fn to_real(&self) -> f64 {
        self.0.to_real()
    }

    fn to_integer(&self) -> i32 {
        i32::from(self.0)
    }
}

fn logical_text(value: bool) -> String {
    let text = if value { "T" } else { "F" };
    text.to_string()
}
