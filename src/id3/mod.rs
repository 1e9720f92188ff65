// ID3 metadata handling module
pub mod frames;
pub mod v1;
pub mod v2;
pub mod writer;

pub use frames::{CommentFrame, FrameContent};
pub use v1::Id3v1Tag;
pub use v2::{Id3v2Fields, Id3v2Header, Id3v2Tag};
