//! Element descriptors for primitive numeric columns.
//!
//! This includes types that are cheaply copied and have a fixed width
//! i.e. `u8`, `i32`, `f64`, etc...

use bytes::{Buf, BufMut, BytesMut};

use super::Element;
use crate::datatype::StoredDataType;

macro_rules! integer_element {
    ($t:ty, $kind:ident, $get:ident, $put:ident) => {
        impl Element for $t {
            const DATA_TYPE: StoredDataType = StoredDataType::$kind;

            #[inline]
            fn zero() -> Self {
                0
            }

            fn decode_row(mut row: &[u8], repeat: usize, _width: usize, out: &mut Vec<Self>) {
                for _ in 0..repeat {
                    out.push(row.$get());
                }
            }

            fn encode_row(values: &[Self], _width: usize, out: &mut BytesMut) {
                for value in values {
                    out.$put(*value);
                }
            }

            fn to_text(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn to_real(&self) -> f64 {
                *self as f64
            }

            #[inline]
            fn to_integer(&self) -> i32 {
                *self as i32
            }

            fn from_stored_null(tnull: i64) -> Option<Self> {
                <$t>::try_from(tnull).ok()
            }
        }
    };
}

macro_rules! float_element {
    ($t:ty, $kind:ident, $get:ident, $put:ident) => {
        impl Element for $t {
            const DATA_TYPE: StoredDataType = StoredDataType::$kind;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            fn decode_row(mut row: &[u8], repeat: usize, _width: usize, out: &mut Vec<Self>) {
                for _ in 0..repeat {
                    out.push(row.$get());
                }
            }

            fn encode_row(values: &[Self], _width: usize, out: &mut BytesMut) {
                for value in values {
                    out.$put(*value);
                }
            }

            fn to_text(&self) -> String {
                self.to_string()
            }

            #[inline]
            fn to_real(&self) -> f64 {
                *self as f64
            }

            #[inline]
            fn to_integer(&self) -> i32 {
                *self as i32
            }

            #[inline]
            fn is_undefined(&self) -> bool {
                self.is_nan()
            }
        }
    };
}

integer_element!(u8, U8, get_u8, put_u8);
integer_element!(u16, U16, get_u16, put_u16);
integer_element!(i16, I16, get_i16, put_i16);
integer_element!(u32, U32, get_u32, put_u32);
integer_element!(i32, I32, get_i32, put_i32);
integer_element!(i64, I64, get_i64, put_i64);
float_element!(f32, F32, get_f32, put_f32);
float_element!(f64, F64, get_f64, put_f64);
