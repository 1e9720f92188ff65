// ID3v1 genre table
//
// ID3v1 stores the genre as an index into this list. ID3v2 stores the name
// itself in TCON, so both generations need the lookups in both directions.

/// The 80 canonical ID3v1 genres, in index order
pub const GENRES: [&str; 80] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz",
    "Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap", "Reggae", "Rock", "Techno",
    "Industrial", "Alternative", "Ska", "Death Metal", "Pranks", "Soundtrack", "Euro-Techno",
    "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical", "Instrumental",
    "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise", "AlternRock", "Bass", "Soul",
    "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic",
    "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap", "Pop/Funk", "Jungle",
    "Native American", "Cabaret", "New Wave", "Psychedelic", "Rave", "Showtunes", "Trailer",
    "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll",
    "Hard Rock",
];

/// Index of "Other", used for names with no exact match
pub const DEFAULT_GENRE_CODE: u8 = 12;

/// Display value for codes outside the table
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Map a genre name to its table index, falling back to "Other"
pub fn genre_index(name: &str) -> u8 {
    GENRES
        .iter()
        .position(|&g| g == name)
        .map(|i| i as u8)
        .unwrap_or(DEFAULT_GENRE_CODE)
}

/// Look up the name for a genre code
pub fn genre_name(code: u8) -> Option<&'static str> {
    GENRES.get(code as usize).copied()
}

/// Like [`genre_name`], with [`UNKNOWN_GENRE`] for out-of-range codes
pub fn genre_display(code: u8) -> &'static str {
    genre_name(code).unwrap_or(UNKNOWN_GENRE)
}
