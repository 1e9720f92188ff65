// Shared helpers for the tag codecs
pub mod encoding;
pub mod io;
