// ID3v2 tag implementation

use crate::config::CodecOptions;
use crate::error::{Result, TagError};
use crate::field_mapping::FrameSlot;
use crate::id3::frames::{frame_ids, CommentFrame, FrameContent, HEADER_LEN};
use crate::id3::v1::NOT_AVAILABLE;
use crate::utils::encoding::decode_latin1;
use crate::utils::io::{decode_synchsafe, read_up_to, TagCursor};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Year used when neither TYER nor TDAT is present
pub const DEFAULT_YEAR: &str = "0000";
/// Date used when neither TYER nor TDAT is present
pub const DEFAULT_DATE: &str = "0000-00-00";
/// Track used when TRCK is absent
pub const DEFAULT_TRACK: &str = "1/1";

/// ID3v2 header structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    /// Length of the frame area, excluding this header
    pub size: u32,
}

impl Id3v2Header {
    const ID: [u8; 3] = [b'I', b'D', b'3'];
    pub const FLAG_EXTENDED: u8 = 0x40;
    pub const EXTENDED_HEADER_LEN: usize = 10;

    /// Parse the 10-byte tag header
    pub fn parse(buffer: &[u8; HEADER_LEN]) -> Result<Self> {
        if buffer[0..3] != Self::ID {
            return Err(TagError::FormatNotFound("ID3v2"));
        }

        Ok(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: decode_synchsafe([buffer[6], buffer[7], buffer[8], buffer[9]]),
        })
    }

    /// Read ID3v2 header from reader
    ///
    /// A header cut short after the marker is logged and zero-filled.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; HEADER_LEN];
        let n = read_up_to(reader, &mut buffer)?;
        if n < 3 {
            return Err(TagError::FormatNotFound("ID3v2"));
        }
        if n < HEADER_LEN && buffer[0..3] == Self::ID {
            log::warn!(
                "Error reading tag header: {}",
                TagError::TruncatedRead {
                    expected: HEADER_LEN,
                    actual: n,
                }
            );
        }
        Self::parse(&buffer)
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags & Self::FLAG_EXTENDED != 0
    }

    /// Full tag size including the 10-byte header
    pub fn full_size(&self) -> u64 {
        self.size as u64 + HEADER_LEN as u64
    }
}

/// Named values pulled out of well-known frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2Fields {
    pub album: String,
    pub composer: String,
    pub date: String,
    pub year: String,
    pub encoder: String,
    pub band: String,
    pub tracknum: String,
    pub publisher: String,
    pub artist: String,
    pub content: String,
    pub title: String,
    pub settings: String,
    pub comments: String,
}

impl Default for Id3v2Fields {
    fn default() -> Self {
        Self {
            album: NOT_AVAILABLE.to_string(),
            composer: String::new(),
            date: String::new(),
            year: String::new(),
            encoder: String::new(),
            band: String::new(),
            tracknum: String::new(),
            publisher: String::new(),
            artist: NOT_AVAILABLE.to_string(),
            content: String::new(),
            title: NOT_AVAILABLE.to_string(),
            settings: String::new(),
            comments: String::new(),
        }
    }
}

impl Id3v2Fields {
    pub fn get(&self, slot: FrameSlot) -> &str {
        match slot {
            FrameSlot::Album => &self.album,
            FrameSlot::Composer => &self.composer,
            FrameSlot::Date => &self.date,
            FrameSlot::Year => &self.year,
            FrameSlot::Encoder => &self.encoder,
            FrameSlot::Band => &self.band,
            FrameSlot::TrackNum => &self.tracknum,
            FrameSlot::Publisher => &self.publisher,
            FrameSlot::Artist => &self.artist,
            FrameSlot::Content => &self.content,
            FrameSlot::Title => &self.title,
            FrameSlot::Settings => &self.settings,
            FrameSlot::Comments => &self.comments,
        }
    }

    pub fn set(&mut self, slot: FrameSlot, value: impl Into<String>) {
        let field = match slot {
            FrameSlot::Album => &mut self.album,
            FrameSlot::Composer => &mut self.composer,
            FrameSlot::Date => &mut self.date,
            FrameSlot::Year => &mut self.year,
            FrameSlot::Encoder => &mut self.encoder,
            FrameSlot::Band => &mut self.band,
            FrameSlot::TrackNum => &mut self.tracknum,
            FrameSlot::Publisher => &mut self.publisher,
            FrameSlot::Artist => &mut self.artist,
            FrameSlot::Content => &mut self.content,
            FrameSlot::Title => &mut self.title,
            FrameSlot::Settings => &mut self.settings,
            FrameSlot::Comments => &mut self.comments,
        };
        *field = value.into();
    }
}

/// ID3v2 tag structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id3v2Tag {
    /// File the tag was read from, used by rewrite
    pub path: Option<PathBuf>,
    pub header: Id3v2Header,
    /// Frame id to content. A repeated id keeps its last occurrence.
    pub frames: BTreeMap<String, FrameContent>,
    pub fields: Id3v2Fields,
    pub loaded: bool,
}

impl Id3v2Tag {
    /// Read ID3v2 tag from reader
    pub fn read<R: Read>(reader: &mut R, options: CodecOptions) -> Result<Self> {
        let header = Id3v2Header::read(reader)?;
        if options.debug {
            log::debug!(
                "Tag version: 2.{}.{}, size: {}, flags: {:#x}",
                header.version.0,
                header.version.1,
                header.size,
                header.flags
            );
        }

        let mut tag = Id3v2Tag {
            header,
            ..Id3v2Tag::default()
        };
        let mut cursor = TagCursor::new(reader, header.size as u64, options);

        if header.has_extended_header() {
            cursor.read_chunk(Id3v2Header::EXTENDED_HEADER_LEN)?;
        }

        while !cursor.is_exhausted() {
            let frame_header = cursor.read_chunk(HEADER_LEN)?;
            if frame_header.len() < HEADER_LEN {
                break;
            }
            if frame_header[0] == 0 {
                if options.debug {
                    log::debug!("Found end of tag (NUL frame id)");
                }
                break;
            }

            let frame_id = decode_latin1(&frame_header[0..4]);
            let frame_size = u32::from_be_bytes([
                frame_header[4],
                frame_header[5],
                frame_header[6],
                frame_header[7],
            ]);
            if frame_size == 0 {
                break;
            }

            let data = cursor.read_chunk(frame_size as usize)?;
            if options.debug {
                log::debug!("{} {}", frame_id, frame_size);
            }

            let content = FrameContent::decode(&frame_id, data);
            let slot = FrameSlot::from_frame_id(&frame_id);
            if let (Some(slot), Some(text)) = (slot, content.as_text()) {
                if options.debug {
                    log::debug!("{} {}", slot.as_str(), text);
                }
                tag.fields.set(slot, text);
            }
            tag.frames.insert(frame_id, content);
        }

        if options.debug && cursor.is_exhausted() {
            log::debug!("End of tag, {} size bytes have been read in", cursor.consumed());
        }

        tag.apply_defaults();
        tag.loaded = true;
        Ok(tag)
    }

    /// Read ID3v2 tag from file
    pub fn read_from_path(path: impl AsRef<Path>, options: CodecOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let mut tag = Self::read(&mut reader, options)?;
        tag.path = Some(path.to_path_buf());
        Ok(tag)
    }

    /// Like [`Id3v2Tag::read_from_path`], but a missing tag yields an unloaded one
    pub fn read_from_path_lenient(path: impl AsRef<Path>, options: CodecOptions) -> Result<Self> {
        let path = path.as_ref();
        match Self::read_from_path(path, options) {
            Err(e) if e.is_not_found() => Ok(Id3v2Tag {
                path: Some(path.to_path_buf()),
                ..Id3v2Tag::default()
            }),
            other => other,
        }
    }

    fn apply_defaults(&mut self) {
        if !self.frames.contains_key(frame_ids::YEAR) {
            if self.frames.contains_key(frame_ids::DATE) {
                self.fields.year = self.fields.date.chars().take(4).collect();
            } else {
                self.fields.year = DEFAULT_YEAR.to_string();
                self.fields.date = DEFAULT_DATE.to_string();
            }
        }
        if !self.frames.contains_key(frame_ids::TRACK) {
            self.fields.tracknum = DEFAULT_TRACK.to_string();
        }
    }

    /// Version as "2.major.minor"
    pub fn version_string(&self) -> String {
        format!("2.{}.{}", self.header.version.0, self.header.version.1)
    }

    /// Text of a text or comment frame
    pub fn frame_text(&self, frame_id: &str) -> Option<&str> {
        self.frames.get(frame_id).and_then(FrameContent::as_text)
    }

    /// Replace a frame, keeping the named field in step
    pub fn set_frame(&mut self, frame_id: impl Into<String>, content: FrameContent) {
        let frame_id = frame_id.into();
        if let (Some(slot), Some(text)) = (FrameSlot::from_frame_id(&frame_id), content.as_text()) {
            self.fields.set(slot, text);
        }
        self.frames.insert(frame_id, content);
    }

    /// Set a text frame (or the comment frame) from a plain string
    ///
    /// An existing comment keeps its language and description.
    pub fn set_text(&mut self, frame_id: impl Into<String>, text: impl Into<String>) {
        let frame_id = frame_id.into();
        let content = if frame_id == frame_ids::COMMENT {
            let comment = match self.frames.get(&frame_id) {
                Some(FrameContent::Comment(existing)) => CommentFrame {
                    text: text.into(),
                    ..existing.clone()
                },
                _ => CommentFrame::new(text),
            };
            FrameContent::Comment(comment)
        } else {
            FrameContent::Text(text.into())
        };
        self.set_frame(frame_id, content);
    }

    /// Drop a frame, resetting its named field to the unread default
    pub fn remove_frame(&mut self, frame_id: &str) -> Option<FrameContent> {
        let removed = self.frames.remove(frame_id)?;
        if let Some(slot) = FrameSlot::from_frame_id(frame_id) {
            self.fields.set(slot, Id3v2Fields::default().get(slot));
        }
        Some(removed)
    }
}

impl fmt::Display for Id3v2Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Artist: {}, Album: {}, Song: {}",
            self.fields.artist, self.fields.album, self.fields.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::io::encode_synchsafe;
    use std::io::Cursor;

    fn frame(id: &str, body: &[u8]) -> Vec<u8> {
        let mut out = id.as_bytes().to_vec();
        out.extend((body.len() as u32).to_be_bytes());
        out.extend([0, 0]);
        out.extend_from_slice(body);
        out
    }

    fn tag_bytes(flags: u8, frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
        let mut area: Vec<u8> = frames.concat();
        area.extend(std::iter::repeat(0).take(padding));
        let mut out = b"ID3\x03\x00".to_vec();
        out.push(flags);
        out.extend(encode_synchsafe(area.len() as u32));
        out.extend(area);
        out
    }

    fn read(bytes: Vec<u8>) -> Id3v2Tag {
        Id3v2Tag::read(&mut Cursor::new(bytes), CodecOptions::default()).unwrap()
    }

    #[test]
    fn test_header_parse() {
        let header = Id3v2Header::parse(b"ID3\x04\x00\x40\x00\x00\x02\x01").unwrap();
        assert_eq!(header.version, (4, 0));
        assert!(header.has_extended_header());
        assert_eq!(header.size, 257);
        assert_eq!(header.full_size(), 267);
    }

    #[test]
    fn test_missing_marker() {
        let err = Id3v2Tag::read(&mut Cursor::new(vec![0xFFu8; 64]), CodecOptions::default())
            .unwrap_err();
        assert!(err.is_not_found());

        let err = Id3v2Tag::read(&mut Cursor::new(Vec::new()), CodecOptions::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reads_named_fields() {
        let tag = read(tag_bytes(
            0,
            &[
                frame("TPE1", b"\x00The Beatles"),
                frame("TALB", b"\x00Abbey Road\x00"),
                frame("TIT2", b"\x00Something"),
                frame("TYER", b"\x001969"),
                frame("TRCK", b"\x002/17"),
                frame("TCON", b"\x00Rock"),
            ],
            64,
        ));

        assert!(tag.loaded);
        assert_eq!(tag.version_string(), "2.3.0");
        assert_eq!(tag.fields.artist, "The Beatles");
        assert_eq!(tag.fields.album, "Abbey Road");
        assert_eq!(tag.fields.title, "Something");
        assert_eq!(tag.fields.year, "1969");
        assert_eq!(tag.fields.tracknum, "2/17");
        assert_eq!(tag.fields.content, "Rock");
        assert_eq!(tag.frame_text("TALB"), Some("Abbey Road"));
        assert_eq!(tag.to_string(), "Artist: The Beatles, Album: Abbey Road, Song: Something");
    }

    #[test]
    fn test_unknown_frames_stay_raw() {
        let tag = read(tag_bytes(
            0,
            &[frame("TXXX", b"\x00custom"), frame("PRIV", &[1, 2, 3])],
            0,
        ));
        assert_eq!(tag.frame_text("TXXX"), Some("custom"));
        assert_eq!(tag.frames.get("PRIV"), Some(&FrameContent::Binary(vec![1, 2, 3])));
        assert_eq!(tag.fields.artist, NOT_AVAILABLE);
    }

    #[test]
    fn test_defaults() {
        let tag = read(tag_bytes(0, &[frame("TIT2", b"\x00Intro")], 16));
        assert_eq!(tag.fields.year, DEFAULT_YEAR);
        assert_eq!(tag.fields.date, DEFAULT_DATE);
        assert_eq!(tag.fields.tracknum, DEFAULT_TRACK);

        let tag = read(tag_bytes(0, &[frame("TDAT", b"\x002003-05-01")], 16));
        assert_eq!(tag.fields.year, "2003");
        assert_eq!(tag.fields.date, "2003-05-01");
    }

    #[test]
    fn test_duplicate_frame_last_wins() {
        let tag = read(tag_bytes(
            0,
            &[frame("TPE1", b"\x00First"), frame("TPE1", b"\x00Second")],
            0,
        ));
        assert_eq!(tag.frames.len(), 1);
        assert_eq!(tag.fields.artist, "Second");
    }

    #[test]
    fn test_extended_header_skipped() {
        let mut frames = vec![vec![0u8; 10]];
        frames.push(frame("TALB", b"\x00Let It Be"));
        let tag = read(tag_bytes(Id3v2Header::FLAG_EXTENDED, &frames, 0));
        assert_eq!(tag.fields.album, "Let It Be");
    }

    #[test]
    fn test_stops_at_declared_size() {
        let mut bytes = tag_bytes(0, &[frame("TIT2", b"\x00Inside")], 0);
        // Audio that happens to look like another frame
        bytes.extend(frame("TPE1", b"\x00Outside"));

        let tag = read(bytes);
        assert_eq!(tag.fields.title, "Inside");
        assert_eq!(tag.fields.artist, NOT_AVAILABLE);
    }

    #[test]
    fn test_partial_frame_header_at_end_of_tag() {
        // Two stray bytes left in the frame area, then audio that continues them
        let mut bytes = tag_bytes(0, &[frame("TIT2", b"\x00Hi"), b"TP".to_vec()], 0);
        bytes.extend(b"E1\x00\x00\x00\x00\x00\x00audio");

        let tag = read(bytes);
        assert_eq!(tag.frames.keys().collect::<Vec<_>>(), ["TIT2"]);
        assert_eq!(tag.fields.title, "Hi");
        assert_eq!(tag.fields.artist, NOT_AVAILABLE);
    }

    #[test]
    fn test_frame_body_clamped_to_tag_size() {
        let mut body = frame("TIT2", b"\x00Hello");
        body[4..8].copy_from_slice(&40u32.to_be_bytes());
        let mut bytes = tag_bytes(0, &[body], 0);
        bytes.extend(b"AUDIOAUDIOAUDIOAUDIOAUDIOAUDIOAUDIO");

        let tag = read(bytes);
        assert_eq!(tag.fields.title, "Hello");
        assert_eq!(tag.frames.len(), 1);
    }

    #[test]
    fn test_zero_size_frame_ends_parse() {
        let mut empty = frame("TPE1", b"");
        empty.truncate(10);
        let tag = read(tag_bytes(0, &[empty, frame("TALB", b"\x00Hidden")], 0));
        assert!(tag.frames.is_empty());
        assert!(tag.loaded);
    }

    #[test]
    fn test_truncated_frame_is_kept() {
        let mut bytes = tag_bytes(0, &[frame("TIT2", b"\x00Cut short here")], 0);
        bytes.truncate(bytes.len() - 5);
        let tag = read(bytes);
        assert!(tag.loaded);
        assert_eq!(tag.fields.title, "Cut short");
    }

    #[test]
    fn test_set_text_updates_field() {
        let mut tag = read(tag_bytes(0, &[frame("TPE1", b"\x00Old")], 0));
        tag.set_text("TPE1", "New");
        tag.set_text("COMM", "edited");
        assert_eq!(tag.fields.artist, "New");
        assert_eq!(tag.fields.comments, "edited");
        assert_eq!(tag.frame_text("COMM"), Some("edited"));
    }

    #[test]
    fn test_set_comment_keeps_language_and_description() {
        let mut tag = read(tag_bytes(0, &[frame("COMM", b"\x00deuLiner\x00alt")], 0));
        tag.set_text("COMM", "neu");

        let Some(FrameContent::Comment(comment)) = tag.frames.get("COMM") else {
            panic!("expected a comment frame");
        };
        assert_eq!(&comment.language, b"deu");
        assert_eq!(comment.description, "Liner");
        assert_eq!(comment.text, "neu");
        assert_eq!(tag.fields.comments, "neu");
    }

    #[test]
    fn test_remove_frame_resets_field() {
        let mut tag = read(tag_bytes(
            0,
            &[frame("TPE1", b"\x00Fela Kuti"), frame("TCON", b"\x00Afrobeat")],
            0,
        ));
        assert!(tag.remove_frame("TPE1").is_some());
        assert!(tag.remove_frame("TCON").is_some());
        assert!(tag.remove_frame("TPE1").is_none());

        assert_eq!(tag.fields.artist, NOT_AVAILABLE);
        assert_eq!(tag.fields.content, "");
        assert_eq!(tag.to_string(), "Artist: N/A, Album: N/A, Song: N/A");
    }
}
