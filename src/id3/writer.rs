// ID3v2 tag writer
//
// Tags are always rendered from scratch as ID3v2.3.0 from the frame map.
// A rewrite puts the fresh tag in a new file and streams the original
// audio after it.

use crate::config::CodecOptions;
use crate::error::{Result, TagError};
use crate::id3::frames::HEADER_LEN;
use crate::id3::v2::{Id3v2Header, Id3v2Tag};
use crate::utils::io::{encode_synchsafe, read_up_to};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Zero bytes appended after the terminator frame
pub const PADDING_LEN: usize = 256;

/// Chunk size used when copying audio data
pub const COPY_CHUNK_LEN: usize = 1024;

/// Render the frame map as a complete tag, header included
pub fn render_tag(tag: &Id3v2Tag) -> Vec<u8> {
    let mut area = Vec::new();
    for (frame_id, content) in &tag.frames {
        let body = content.to_bytes();
        area.extend(frame_id_bytes(frame_id));
        area.extend((body.len() as u32).to_be_bytes());
        area.extend([0, 0]);
        area.extend(body);
    }

    // Empty frame as terminator, then some padding
    area.extend([0u8; HEADER_LEN]);
    area.extend([0u8; PADDING_LEN]);

    let mut out = Vec::with_capacity(HEADER_LEN + area.len());
    out.extend(b"ID3\x03\x00");
    // No extended header is ever emitted
    out.push(tag.header.flags & !Id3v2Header::FLAG_EXTENDED);
    out.extend(encode_synchsafe(area.len() as u32));
    out.extend(area);
    out
}

/// Frame ids are exactly four bytes on disk
fn frame_id_bytes(frame_id: &str) -> [u8; 4] {
    let mut id = [b' '; 4];
    for (slot, c) in id.iter_mut().zip(frame_id.chars()) {
        *slot = if (c as u32) <= 0xFF { c as u8 } else { b'?' };
    }
    id
}

/// Write the rendered tag, returning its length
pub fn write_tag<W: Write>(tag: &Id3v2Tag, writer: &mut W) -> Result<u64> {
    let bytes = render_tag(tag);
    writer.write_all(&bytes)?;
    Ok(bytes.len() as u64)
}

/// Write `tag` followed by everything in `source` after its original tag
///
/// `source` must be positioned at the start of the original file. Returns
/// the number of bytes written to `dest`.
pub fn rewrite_stream<R: Read, W: Write>(
    tag: &Id3v2Tag,
    source: &mut R,
    dest: &mut W,
    options: CodecOptions,
) -> Result<u64> {
    let header = Id3v2Header::read(source)?;
    let tag_len = write_tag(tag, dest)?;
    let mut written = tag_len;

    // Skip the remainder of the original tag
    let skipped = io::copy(&mut source.by_ref().take(header.size as u64), &mut io::sink())?;
    if skipped < header.size as u64 {
        log::warn!(
            "original tag declares {} bytes but only {} were present",
            header.size,
            skipped
        );
    }

    let mut buffer = [0u8; COPY_CHUNK_LEN];
    loop {
        let n = read_up_to(source, &mut buffer)?;
        dest.write_all(&buffer[..n])?;
        written += n as u64;
        if n < COPY_CHUNK_LEN {
            break;
        }
    }
    dest.flush()?;

    if options.debug {
        log::debug!(
            "rewrote tag: old {} bytes, new {} bytes, {} bytes total",
            header.full_size(),
            tag_len,
            written
        );
    }
    Ok(written)
}

/// Replace the tag of the file `tag` was read from, writing the result to `output`
///
/// Rejected before `output` is created if the tag never loaded, has no
/// source path, or `output` is the source file itself. The first two are
/// caller bugs and also panic in debug builds.
pub fn rewrite(tag: &Id3v2Tag, output: impl AsRef<Path>, options: CodecOptions) -> Result<u64> {
    let output = output.as_ref();
    debug_assert!(tag.loaded, "cannot rewrite a tag that was never loaded");
    if !tag.loaded {
        return Err(precondition("cannot rewrite a tag that was never loaded"));
    }
    debug_assert!(tag.path.is_some(), "tag has no source file");
    let Some(source_path) = tag.path.as_deref() else {
        return Err(precondition("tag has no source file"));
    };
    if same_file(source_path, output) {
        return Err(precondition("rewrite output must differ from the source file"));
    }

    let mut source = io::BufReader::new(File::open(source_path)?);
    let mut dest = BufWriter::new(File::create(output)?);
    rewrite_stream(tag, &mut source, &mut dest, options)
}

fn precondition(msg: &str) -> TagError {
    log::error!("{}", msg);
    TagError::PreconditionViolation(msg.to_string())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

impl Id3v2Tag {
    /// See [`render_tag`]
    pub fn render(&self) -> Vec<u8> {
        render_tag(self)
    }

    /// See [`rewrite`]
    pub fn rewrite(&self, output: impl AsRef<Path>, options: CodecOptions) -> Result<u64> {
        rewrite(self, output, options)
    }
}
