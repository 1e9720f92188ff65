// ID3v1 tag implementation
//
// Format of tag (last 128 bytes of the file):
// "TAG"       3 bytes
// Song Title  30 bytes
// Artist      30 bytes
// Album       30 bytes
// Year        4 bytes
// Comment     30 bytes (ID3v1.1: 28 bytes, NUL, track number)
// Genre       1 byte (index into the genre table)

use crate::config::CodecOptions;
use crate::error::{Result, TagError};
use crate::field_mapping::track_numerator;
use crate::genre::genre_index;
use crate::id3::v2::Id3v2Tag;
use crate::utils::encoding::{decode_latin1, encode_latin1};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Value of text fields when no tag was found
pub const NOT_AVAILABLE: &str = "N/A";

/// Comment stored by [`Id3v1Tag::copy_from_v2`]
pub const CONVERTED_COMMENT: &str = "copied from ID3v2 tag";

/// ID3v1 tag structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// 0 when the comment carries no track number
    pub track: u8,
    /// Raw genre byte, not checked against the genre table
    pub genre_code: u8,
    /// Whether the tag was read from an existing `TAG` trailer
    pub loaded: bool,
}

impl Default for Id3v1Tag {
    fn default() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            artist: NOT_AVAILABLE.to_string(),
            album: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            comment: NOT_AVAILABLE.to_string(),
            track: 0,
            genre_code: 0,
            loaded: false,
        }
    }
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];
    const PADDING: &'static [char] = &[' ', '\t', '\0'];

    /// Read ID3v1 tag from file
    pub fn read_from_path(path: impl AsRef<Path>, options: CodecOptions) -> Result<Self> {
        let mut file = File::open(path)?;
        Self::read_from(&mut file, options)
    }

    /// Read the trailing 128 bytes of `reader`. A missing trailer is not an error.
    pub fn read_from<R: Read + Seek>(reader: &mut R, options: CodecOptions) -> Result<Self> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < Self::TAG_SIZE as u64 {
            if options.debug {
                log::debug!("file is {} bytes, too short for an ID3v1 tag", file_size);
            }
            return Ok(Self::default());
        }

        reader.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        let mut buffer = [0u8; Self::TAG_SIZE];
        reader.read_exact(&mut buffer)?;

        let tag = Self::parse(&buffer);
        if options.debug {
            log::debug!("ID3v1 trailer: loaded={}", tag.loaded);
        }
        Ok(tag)
    }

    /// Parse ID3v1 tag from buffer
    pub fn parse(buffer: &[u8; Self::TAG_SIZE]) -> Self {
        if buffer[0..3] != Self::TAG_ID {
            return Self::default();
        }

        // ID3v1.1 keeps the track number in the last comment byte
        let (comment, track) = if buffer[125] == 0 && buffer[126] != 0 {
            (Self::parse_string(&buffer[97..125]), buffer[126])
        } else {
            (Self::parse_string(&buffer[97..127]), 0)
        };

        Id3v1Tag {
            title: Self::parse_string(&buffer[3..33]),
            artist: Self::parse_string(&buffer[33..63]),
            album: Self::parse_string(&buffer[63..93]),
            year: Self::parse_string(&buffer[93..97]),
            comment,
            track,
            genre_code: buffer[127],
            loaded: true,
        }
    }

    /// Decode a fixed-width field, dropping trailing space, tab and NUL
    fn parse_string(bytes: &[u8]) -> String {
        decode_latin1(bytes)
            .trim_end_matches(Self::PADDING)
            .to_string()
    }

    /// Serialize into the 128-byte on-disk layout
    ///
    /// Fields are padded but never truncated, so an over-long field yields a
    /// [`TagError::SizeMismatch`].
    pub fn to_bytes(&self) -> Result<[u8; Self::TAG_SIZE]> {
        let mut tag = Vec::with_capacity(Self::TAG_SIZE);
        tag.extend_from_slice(&Self::TAG_ID);
        Self::push_padded(&mut tag, &self.title, 30, 0);
        Self::push_padded(&mut tag, &self.artist, 30, 0);
        Self::push_padded(&mut tag, &self.album, 30, 0);
        Self::push_padded(&mut tag, &self.year, 4, b' ');
        Self::push_padded(&mut tag, &self.comment, 29, 0);
        tag.push(self.track);
        tag.push(self.genre_code);

        <[u8; Self::TAG_SIZE]>::try_from(tag.as_slice()).map_err(|_| TagError::SizeMismatch {
            expected: Self::TAG_SIZE,
            actual: tag.len(),
        })
    }

    fn push_padded(tag: &mut Vec<u8>, text: &str, width: usize, pad: u8) {
        let bytes = encode_latin1(text);
        let fill = width.saturating_sub(bytes.len());
        tag.extend(bytes);
        tag.extend(std::iter::repeat(pad).take(fill));
    }

    /// Write the tag into the file at `path`
    ///
    /// A loaded tag overwrites the last 128 bytes, anything else is appended.
    /// The overwrite trusts `loaded`: using a tag read from another file will
    /// clobber whatever this file keeps in its last 128 bytes.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        self.write_bytes(&mut file, &bytes)
    }

    /// Write the tag into an open file
    pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        self.write_bytes(writer, &bytes)
    }

    fn write_bytes<W: Write + Seek>(&self, writer: &mut W, bytes: &[u8]) -> Result<()> {
        if self.loaded {
            writer.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        } else {
            writer.seek(SeekFrom::End(0))?;
        }
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Overwrite every field from an ID3v2 tag, keeping `loaded`
    pub fn copy_from_v2(&mut self, v2: &Id3v2Tag) {
        self.title = v2.fields.title.chars().take(30).collect();
        self.album = v2.fields.album.chars().take(30).collect();
        self.artist = v2.fields.artist.chars().take(30).collect();
        self.year = v2.fields.year.chars().take(4).collect();
        self.track = track_numerator(&v2.fields.tracknum)
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or(0);
        self.comment = CONVERTED_COMMENT.to_string();
        self.genre_code = genre_index(&v2.fields.content);
    }
}

impl fmt::Display for Id3v1Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Artist: {}, Album: {}, Song: {}, Year: {}, Trk: {}, Genre: {}, Comment: {}",
            self.artist,
            self.album,
            self.title,
            self.year,
            self.track,
            self.genre_code,
            self.comment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn trailer(fields: &[(usize, &[u8])]) -> [u8; 128] {
        let mut buffer = [0u8; 128];
        buffer[..3].copy_from_slice(b"TAG");
        for (offset, bytes) in fields {
            buffer[*offset..*offset + bytes.len()].copy_from_slice(bytes);
        }
        buffer
    }

    #[test]
    fn test_parse_fields() {
        let buffer = trailer(&[
            (3, b"Come Together  "),
            (33, b"The Beatles\t"),
            (63, b"Abbey Road"),
            (93, b"1969"),
            (97, b"remaster"),
            (127, &[17]),
        ]);
        let tag = Id3v1Tag::parse(&buffer);

        assert!(tag.loaded);
        assert_eq!(tag.title, "Come Together");
        assert_eq!(tag.artist, "The Beatles");
        assert_eq!(tag.album, "Abbey Road");
        assert_eq!(tag.year, "1969");
        assert_eq!(tag.comment, "remaster");
        assert_eq!(tag.track, 0);
        assert_eq!(tag.genre_code, 17);
    }

    #[test]
    fn test_v11_track_number() {
        let buffer = trailer(&[(97, b"note"), (125, &[0, 5])]);
        let tag = Id3v1Tag::parse(&buffer);
        assert_eq!(tag.track, 5);
        assert_eq!(tag.comment, "note");
    }

    #[test]
    fn test_full_comment_without_track() {
        let buffer = trailer(&[(97, &[b'x'; 28]), (125, b"AB")]);
        let tag = Id3v1Tag::parse(&buffer);
        assert_eq!(tag.track, 0);
        assert_eq!(tag.comment, format!("{}AB", "x".repeat(28)));
    }

    #[test]
    fn test_out_of_range_genre_preserved() {
        let tag = Id3v1Tag::parse(&trailer(&[(127, &[200])]));
        assert_eq!(tag.genre_code, 200);
    }

    #[test]
    fn test_missing_marker() {
        let mut buffer = [b' '; 128];
        buffer[..3].copy_from_slice(b"XYZ");
        let tag = Id3v1Tag::parse(&buffer);
        assert!(!tag.loaded);
        assert_eq!(tag.artist, NOT_AVAILABLE);
        assert_eq!(tag.album, NOT_AVAILABLE);
    }

    #[test]
    fn test_short_input_is_not_loaded() {
        let mut reader = Cursor::new(vec![0u8; 40]);
        let tag = Id3v1Tag::read_from(&mut reader, CodecOptions::default()).unwrap();
        assert!(!tag.loaded);
    }

    #[test]
    fn test_to_bytes_layout() {
        let tag = Id3v1Tag {
            title: "Help!".to_string(),
            year: "65".to_string(),
            comment: String::new(),
            track: 7,
            genre_code: 13,
            ..Id3v1Tag::default()
        };
        let bytes = tag.to_bytes().unwrap();

        assert_eq!(&bytes[..8], b"TAGHelp!");
        assert!(bytes[8..33].iter().all(|&b| b == 0));
        assert_eq!(&bytes[93..97], b"65  ");
        assert_eq!(bytes[125], 0);
        assert_eq!(bytes[126], 7);
        assert_eq!(bytes[127], 13);
    }

    #[test]
    fn test_oversized_field_is_rejected() {
        let tag = Id3v1Tag {
            title: "t".repeat(31),
            ..Id3v1Tag::default()
        };
        match tag.to_bytes() {
            Err(TagError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 128);
                assert_eq!(actual, 129);
            }
            other => panic!("expected a size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_append_then_overwrite() {
        let mut file = Cursor::new(vec![0xAAu8; 300]);
        let mut tag = Id3v1Tag {
            title: "Yesterday".to_string(),
            artist: "The Beatles".to_string(),
            album: "Help!".to_string(),
            year: "1965".to_string(),
            comment: "take 2".to_string(),
            track: 13,
            genre_code: 13,
            loaded: false,
        };

        tag.write_to(&mut file).unwrap();
        assert_eq!(file.get_ref().len(), 428);

        let mut read = Id3v1Tag::read_from(&mut file, CodecOptions::default()).unwrap();
        tag.loaded = true;
        assert_eq!(read, tag);

        read.title = "Yesterday (Remastered)".to_string();
        read.write_to(&mut file).unwrap();
        assert_eq!(file.get_ref().len(), 428);
        assert!(file.get_ref()[..300].iter().all(|&b| b == 0xAA));

        let reread = Id3v1Tag::read_from(&mut file, CodecOptions::default()).unwrap();
        assert_eq!(reread.title, "Yesterday (Remastered)");
    }
}
