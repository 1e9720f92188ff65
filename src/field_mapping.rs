// Frame id to named field mapping
//
// ID3v2 text frames are addressed by 4-character ids (TIT2, TPE1, TALB, ...).
// The handful that callers care about are given a fixed name here; every
// other frame stays reachable only through the raw frame map.

/// Named slots populated from well-known ID3v2 frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    Album,
    Composer,
    Date,
    Year,
    Encoder,
    Band,
    TrackNum,
    Publisher,
    Artist,
    Content,
    Title,
    Settings,
    Comments,
}

impl FrameSlot {
    pub const ALL: [FrameSlot; 13] = [
        FrameSlot::Album,
        FrameSlot::Composer,
        FrameSlot::Date,
        FrameSlot::Year,
        FrameSlot::Encoder,
        FrameSlot::Band,
        FrameSlot::TrackNum,
        FrameSlot::Publisher,
        FrameSlot::Artist,
        FrameSlot::Content,
        FrameSlot::Title,
        FrameSlot::Settings,
        FrameSlot::Comments,
    ];

    /// Get slot name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameSlot::Album => "album",
            FrameSlot::Composer => "composer",
            FrameSlot::Date => "date",
            FrameSlot::Year => "year",
            FrameSlot::Encoder => "encoder",
            FrameSlot::Band => "band",
            FrameSlot::TrackNum => "tracknum",
            FrameSlot::Publisher => "publisher",
            FrameSlot::Artist => "artist",
            FrameSlot::Content => "content",
            FrameSlot::Title => "title",
            FrameSlot::Settings => "settings",
            FrameSlot::Comments => "comments",
        }
    }

    /// Human readable frame description
    pub fn long_name(&self) -> &'static str {
        match self {
            FrameSlot::Album => "Album Title",
            FrameSlot::Composer => "Composer",
            FrameSlot::Date => "Date",
            FrameSlot::Year => "Year",
            FrameSlot::Encoder => "Encoded By",
            FrameSlot::Band => "Band/Accompaniment",
            FrameSlot::TrackNum => "Track No.",
            FrameSlot::Publisher => "Publisher",
            FrameSlot::Artist => "Lead Performer",
            FrameSlot::Content => "Content Type",
            FrameSlot::Title => "Title",
            FrameSlot::Settings => "SW/HW Settings",
            FrameSlot::Comments => "Comments",
        }
    }

    /// Get the ID3v2 frame id backing this slot
    pub fn frame_id(&self) -> &'static str {
        match self {
            FrameSlot::Album => "TALB",
            FrameSlot::Composer => "TCOM",
            FrameSlot::Date => "TDAT",
            FrameSlot::Year => "TYER",
            FrameSlot::Encoder => "TENC",
            FrameSlot::Band => "TPE2",
            FrameSlot::TrackNum => "TRCK",
            FrameSlot::Publisher => "TPUB",
            FrameSlot::Artist => "TPE1",
            FrameSlot::Content => "TCON",
            FrameSlot::Title => "TIT2",
            FrameSlot::Settings => "TSSE",
            FrameSlot::Comments => "COMM",
        }
    }

    /// Convert an ID3v2 frame id to its slot
    pub fn from_frame_id(frame_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.frame_id() == frame_id)
    }

    /// Parse from slot name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }
}

/// Numerator of an ID3v2 track fraction ("3/12" -> 3)
pub fn track_numerator(track: &str) -> Option<u32> {
    track.split('/').next()?.trim().parse().ok()
}
