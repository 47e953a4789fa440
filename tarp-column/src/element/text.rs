use bytes::{BufMut, BytesMut};

use super::Element;
use crate::datatype::StoredDataType;

impl Element for String {
    const DATA_TYPE: StoredDataType = StoredDataType::String;

    fn zero() -> Self {
        String::new()
    }

    fn decode_row(row: &[u8], repeat: usize, width: usize, out: &mut Vec<Self>) {
        if width == 0 {
            out.extend((0..repeat).map(|_| String::new()));
            return;
        }

        for raw in row.chunks_exact(width).take(repeat) {
            let end = raw
                .iter()
                .rposition(|byte| *byte != b' ' && *byte != 0)
                .map_or(0, |pos| pos + 1);
            out.push(String::from_utf8_lossy(&raw[..end]).into_owned());
        }
    }

    fn encode_row(values: &[Self], width: usize, out: &mut BytesMut) {
        for value in values {
            let mut len = value.len().min(width);
            while !value.is_char_boundary(len) {
                len -= 1;
            }
            out.put_slice(&value.as_bytes()[..len]);
            out.put_bytes(b' ', width - len);
        }
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn to_real(&self) -> f64 {
        self.trim().parse().unwrap_or(0.0)
    }

    fn to_integer(&self) -> i32 {
        self.to_real() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{decode_block, encode_block};

    #[test]
    fn test_text_padding() {
        let values = vec!["ab".to_string(), "toolong".to_string()];
        let block = encode_block(&values, 2, 4);
        assert_eq!(block.as_ref(), b"ab  tool");

        let decoded = decode_block::<String>(&block, 1, 2, 4).unwrap();
        assert_eq!(decoded, vec!["ab".to_string(), "tool".to_string()]);
    }

    #[test]
    fn test_text_truncates_on_char_boundary() {
        let values = vec!["aé".to_string(), "€uro".to_string()];
        let block = encode_block(&values, 1, 3);
        assert_eq!(block.as_ref(), "aé€".as_bytes());

        let block = encode_block(&values, 1, 2);
        assert_eq!(block.as_ref(), b"a   ");

        let decoded = decode_block::<String>(&block, 2, 1, 2).unwrap();
        assert_eq!(decoded, vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn test_text_trims_nul_padding() {
        let decoded = decode_block::<String>(b"xy\0\0", 1, 1, 4).unwrap();
        assert_eq!(decoded, vec!["xy".to_string()]);
    }

    #[test]
    fn test_text_conversions() {
        assert_eq!(" 42 ".to_string().to_integer(), 42);
        assert_eq!("-3.75".to_string().to_real(), -3.75);
        assert_eq!("-3.75".to_string().to_integer(), -3);
        assert_eq!("n/a".to_string().to_real(), 0.0);
    }
}
