// ID3 frame definitions and parsers

use crate::utils::encoding::{
    decode_latin1, decode_text_frame, decode_utf16, encode_text, encode_text_frame, TextEncoding,
};

/// Size of the tag header and of every frame header
pub const HEADER_LEN: usize = 10;

/// Common ID3v2.3 frame identifiers
pub mod frame_ids {
    pub const TITLE: &str = "TIT2"; // Title/songname/content description
    pub const ARTIST: &str = "TPE1"; // Lead performer(s)/Soloist(s)
    pub const ALBUM: &str = "TALB"; // Album/Movie/Show title
    pub const YEAR: &str = "TYER"; // Year
    pub const DATE: &str = "TDAT"; // Date
    pub const TRACK: &str = "TRCK"; // Track number/Position in set
    pub const GENRE: &str = "TCON"; // Content type
    pub const COMMENT: &str = "COMM"; // Comments
}

/// A comment frame: language, short description and the comment itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrame {
    pub language: [u8; 3],
    pub description: String,
    pub text: String,
}

impl CommentFrame {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            language: *b"eng",
            description: String::new(),
            text: text.into(),
        }
    }

    /// Parse a COMM body: encoding(1) language(3) description NUL text
    pub fn parse(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::new("");
        }

        let language = [data[1], data[2], data[3]];
        let body = &data[4..];
        let (description, text) = match TextEncoding::from_byte(data[0]) {
            Some(TextEncoding::Iso8859_1) => {
                let (desc, rest) = split_latin1(body);
                let (text, _) = split_latin1(rest);
                (decode_latin1(desc), decode_latin1(text))
            }
            Some(TextEncoding::Utf16) => {
                let (desc, rest) = split_utf16(body);
                (decode_utf16_string(desc), decode_utf16_string(rest))
            }
            None => (String::new(), String::new()),
        };

        Self {
            language,
            description,
            text,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let encoding = if TextEncoding::for_text(&self.description) == TextEncoding::Utf16 {
            TextEncoding::Utf16
        } else {
            TextEncoding::for_text(&self.text)
        };

        let mut out = vec![encoding as u8];
        out.extend_from_slice(&self.language);
        out.extend(encode_text(&self.description, encoding));
        match encoding {
            TextEncoding::Iso8859_1 => out.push(0),
            TextEncoding::Utf16 => out.extend([0, 0]),
        }
        out.extend(encode_text(&self.text, encoding));
        out
    }
}

fn split_latin1(data: &[u8]) -> (&[u8], &[u8]) {
    match data.iter().position(|&b| b == 0) {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &[][..]),
    }
}

fn split_utf16(data: &[u8]) -> (&[u8], &[u8]) {
    match data.chunks_exact(2).position(|pair| pair == [0, 0]) {
        Some(i) => (&data[..i * 2], &data[i * 2 + 2..]),
        None => (data, &[][..]),
    }
}

fn decode_utf16_string(data: &[u8]) -> String {
    if data.len() < 2 {
        return String::new();
    }
    let (bom, text) = data.split_at(2);
    decode_utf16(bom, text)
}

/// Decoded content of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameContent {
    Text(String),
    Comment(CommentFrame),
    Binary(Vec<u8>),
}

impl FrameContent {
    /// Decode a frame payload according to its id
    pub fn decode(frame_id: &str, data: Vec<u8>) -> Self {
        if frame_id == frame_ids::COMMENT {
            FrameContent::Comment(CommentFrame::parse(&data))
        } else if is_text_frame(frame_id) {
            FrameContent::Text(decode_text_frame(&data))
        } else {
            FrameContent::Binary(data)
        }
    }

    /// Serialize back into a frame body
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            FrameContent::Text(text) => encode_text_frame(text),
            FrameContent::Comment(comment) => comment.to_bytes(),
            FrameContent::Binary(data) => data.clone(),
        }
    }

    /// The user-visible text, if this is a text or comment frame
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FrameContent::Text(text) => Some(text.as_str()),
            FrameContent::Comment(comment) => Some(comment.text.as_str()),
            FrameContent::Binary(_) => None,
        }
    }
}

/// Text information frames all start with `T`
pub fn is_text_frame(frame_id: &str) -> bool {
    frame_id.starts_with('T')
}
