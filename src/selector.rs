// Tag selection
//
// Resolution is two-step: the ID3v2 tag is preferred, and the ID3v1 trailer
// is consulted only when the ID3v2 tag is missing or lacks an artist or
// album. A file where neither generation names both has no selection.

use crate::config::CodecOptions;
use crate::error::Result;
use crate::field_mapping::track_numerator;
use crate::genre::genre_display;
use crate::id3::v1::NOT_AVAILABLE;
use crate::id3::{Id3v1Tag, Id3v2Tag};
use serde::Serialize;
use std::path::Path;

/// Which tag generation a [`Metadata`] record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    Id3v2,
    Id3v1,
}

/// Normalized fields, independent of tag generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub source: TagSource,
    pub artist: String,
    pub album: String,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub track: u32,
    pub comment: String,
}

impl From<&Id3v2Tag> for Metadata {
    fn from(tag: &Id3v2Tag) -> Self {
        let fields = &tag.fields;
        Metadata {
            source: TagSource::Id3v2,
            artist: fields.artist.clone(),
            album: fields.album.clone(),
            title: fields.title.clone(),
            year: fields.year.clone(),
            genre: fields.content.clone(),
            track: track_numerator(&fields.tracknum).unwrap_or(0),
            comment: fields.comments.clone(),
        }
    }
}

impl From<&Id3v1Tag> for Metadata {
    fn from(tag: &Id3v1Tag) -> Self {
        Metadata {
            source: TagSource::Id3v1,
            artist: tag.artist.clone(),
            album: tag.album.clone(),
            title: tag.title.clone(),
            year: tag.year.clone(),
            genre: genre_display(tag.genre_code).to_string(),
            track: tag.track as u32,
            comment: tag.comment.clone(),
        }
    }
}

/// Whether a tag names both an artist and an album
fn names_artist_and_album(artist: &str, album: &str) -> bool {
    artist != NOT_AVAILABLE && album != NOT_AVAILABLE
}

/// Picks the best available tag for a file
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSelector {
    options: CodecOptions,
}

impl TagSelector {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Select normalized fields for `path`
    ///
    /// A missing tag of either generation is not an error, I/O failures are.
    pub fn select(&self, path: impl AsRef<Path>) -> Result<Option<Metadata>> {
        let path = path.as_ref();

        let v2 = Id3v2Tag::read_from_path_lenient(path, self.options)?;
        if v2.loaded && names_artist_and_album(&v2.fields.artist, &v2.fields.album) {
            return Ok(Some(Metadata::from(&v2)));
        }
        if self.options.debug {
            log::debug!("{}: no usable ID3v2 tag, trying ID3v1", path.display());
        }

        let v1 = Id3v1Tag::read_from_path(path, self.options)?;
        if v1.loaded && names_artist_and_album(&v1.artist, &v1.album) {
            return Ok(Some(Metadata::from(&v1)));
        }

        Ok(None)
    }
}
