// Artist -> albums database built while scanning a library

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Artist names that say nothing about who made the album
pub const IGNORED_ARTISTS: [&str; 4] = ["Various Artists", "Soundtrack", "Unknown", ""];

/// Albums grouped by artist
///
/// Albums keep the order they were first seen and are never repeated.
/// Artists iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumDb {
    artists: BTreeMap<String, Vec<String>>,
}

impl AlbumDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an album. Returns false if the artist is ignored or the album known.
    pub fn add(&mut self, artist: &str, album: &str) -> bool {
        if IGNORED_ARTISTS.contains(&artist) {
            return false;
        }
        let albums = self.artists.entry(artist.to_string()).or_default();
        if albums.iter().any(|a| a == album) {
            return false;
        }
        albums.push(album.to_string());
        true
    }

    pub fn albums(&self, artist: &str) -> Option<&[String]> {
        self.artists.get(artist).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.artists.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn album_count(&self) -> usize {
        self.artists.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// One `"artist","album"` line per album
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (artist, albums) in self.iter() {
            for album in albums {
                writeln!(writer, "{},{}", csv_field(artist), csv_field(album))?;
            }
        }
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
