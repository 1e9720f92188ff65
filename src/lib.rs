//! Tagwright - ID3 tag codec
//!
//! Reads ID3v1 trailers and ID3v2 headers from audio files, writes ID3v1
//! tags, and replaces ID3v2 tags while carrying the audio over unchanged.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod album_db;
pub mod config;
pub mod error;
pub mod field_mapping;
pub mod genre;
pub mod id3;
pub mod selector;
pub mod utils;

pub use album_db::AlbumDb;
pub use config::CodecOptions;
pub use error::{Result, TagError};
pub use field_mapping::FrameSlot;
pub use id3::{FrameContent, Id3v1Tag, Id3v2Header, Id3v2Tag};
pub use selector::{Metadata, TagSelector, TagSource};

/// Which tag generations a file carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TagPresence {
    /// ID3v2 version as (major, minor), if a header is present
    pub id3v2: Option<(u8, u8)>,
    pub id3v1: bool,
}

impl TagPresence {
    pub fn is_untagged(&self) -> bool {
        self.id3v2.is_none() && !self.id3v1
    }
}

/// Audio file metadata handler
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    options: CodecOptions,
}

impl AudioFile {
    pub fn new(path: impl AsRef<Path>, options: CodecOptions) -> Self {
        AudioFile {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    /// Detect which tags are present without parsing frames
    pub fn detect(&self) -> Result<TagPresence> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        let id3v2 = match Id3v2Header::read(&mut reader) {
            Ok(header) => Some(header.version),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        let id3v1 = self.read_id3v1()?.loaded;
        Ok(TagPresence { id3v2, id3v1 })
    }

    /// Read the ID3v2 tag; an absent tag comes back unloaded
    pub fn read_id3v2(&self) -> Result<Id3v2Tag> {
        Id3v2Tag::read_from_path_lenient(&self.path, self.options)
    }

    /// Read the ID3v1 trailer; an absent tag comes back unloaded
    pub fn read_id3v1(&self) -> Result<Id3v1Tag> {
        Id3v1Tag::read_from_path(&self.path, self.options)
    }

    /// Read normalized metadata, preferring ID3v2
    pub fn read_metadata(&self) -> Result<Option<Metadata>> {
        TagSelector::new(self.options).select(&self.path)
    }
}
