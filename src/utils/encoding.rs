// Encoding utilities

use encoding_rs::{UTF_16BE, UTF_16LE};

/// Text encodings understood in ID3v2 text frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
}

impl TextEncoding {
    /// Any other selector byte is unsupported and decodes to empty text
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Iso8859_1),
            1 => Some(TextEncoding::Utf16),
            _ => None,
        }
    }

    /// The narrowest encoding that represents `text` without loss
    pub fn for_text(text: &str) -> Self {
        if text.chars().all(|c| (c as u32) <= 0xFF) {
            TextEncoding::Iso8859_1
        } else {
            TextEncoding::Utf16
        }
    }
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of equal value.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Encode to ISO-8859-1, replacing characters above U+00FF with `?`
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

/// Decode UTF-16 whose byte order was given by a BOM (`FE FF` is big endian,
/// anything else little endian). Trailing NULs are stripped.
pub fn decode_utf16(bom: &[u8], data: &[u8]) -> String {
    let encoding = if bom == [0xFE, 0xFF] { UTF_16BE } else { UTF_16LE };
    let (text, _) = encoding.decode_without_bom_handling(data);
    text.trim_end_matches('\0').to_string()
}

/// Little-endian UTF-16 with a leading BOM
pub fn encode_utf16(text: &str) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFE];
    out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    out
}

/// Decode text frame data: a selector byte followed by the text
pub fn decode_text_frame(data: &[u8]) -> String {
    let Some((&selector, body)) = data.split_first() else {
        return String::new();
    };

    match TextEncoding::from_byte(selector) {
        Some(TextEncoding::Iso8859_1) => {
            let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
            decode_latin1(&body[..end])
        }
        Some(TextEncoding::Utf16) => {
            if body.len() < 2 {
                return String::new();
            }
            let (bom, text) = body.split_at(2);
            decode_utf16(bom, text)
        }
        None => String::new(),
    }
}

/// Encode text frame data, choosing Latin-1 when possible
pub fn encode_text_frame(text: &str) -> Vec<u8> {
    let encoding = TextEncoding::for_text(text);
    let mut result = vec![encoding as u8];
    result.extend(encode_text(text, encoding));
    result
}

/// Encode text with specified encoding
pub fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Iso8859_1 => encode_latin1(text),
        TextEncoding::Utf16 => encode_utf16(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_stops_at_nul() {
        assert_eq!(decode_text_frame(b"\x00Abbey Road\x00"), "Abbey Road");
        assert_eq!(decode_text_frame(b"\x00Abbey Road\x00junk"), "Abbey Road");
        assert_eq!(decode_text_frame(b"\x00Abbey Road"), "Abbey Road");
    }

    #[test]
    fn test_latin1_high_bytes() {
        assert_eq!(decode_text_frame(b"\x00Bj\xF6rk"), "Björk");
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut data = vec![0x01, 0xFF, 0xFE];
        data.extend("Let It Be".encode_utf16().flat_map(u16::to_le_bytes));
        data.extend([0, 0]);
        assert_eq!(decode_text_frame(&data), "Let It Be");

        let mut data = vec![0x01, 0xFE, 0xFF];
        data.extend("Let It Be".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(decode_text_frame(&data), "Let It Be");
    }

    #[test]
    fn test_unsupported_selector() {
        assert_eq!(decode_text_frame(b"\x03UTF-8 text"), "");
        assert_eq!(decode_text_frame(b""), "");
        assert_eq!(decode_text_frame(b"\x01\xFF"), "");
    }

    #[test]
    fn test_encoding_choice() {
        assert_eq!(encode_text_frame("Café"), b"\x00Caf\xE9".to_vec());

        let encoded = encode_text_frame("東京");
        assert_eq!(&encoded[..3], &[0x01, 0xFF, 0xFE]);
        assert_eq!(decode_text_frame(&encoded), "東京");
    }
}
