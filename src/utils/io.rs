// I/O utilities for reading tag data

use crate::config::CodecOptions;
use crate::error::{Result, TagError};
use std::io::Read;

/// Largest value a 4-byte synchsafe integer can hold
pub const SYNCHSAFE_MAX: u32 = 0x0FFF_FFFF;

/// Decode a synchsafe integer (7 bits per byte, high bit ignored)
pub fn decode_synchsafe(bytes: [u8; 4]) -> u32 {
    (bytes[3] as u32 & 0x7F)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[0] as u32 & 0x7F) << 21)
}

/// Encode the low 28 bits of `n` as a synchsafe integer
pub fn encode_synchsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

/// Read until `buf` is full or the reader is exhausted, returning the byte count
pub fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reader over the frame area of an ID3v2 tag
///
/// Reads are clamped to what is left of `limit`, so nothing past the
/// declared tag size is ever returned. Every request is charged in full,
/// even when the source comes up short. Once the limit is reached every
/// read returns an empty buffer.
pub struct TagCursor<'a, R> {
    reader: &'a mut R,
    limit: u64,
    consumed: u64,
    options: CodecOptions,
}

impl<'a, R: Read> TagCursor<'a, R> {
    pub fn new(reader: &'a mut R, limit: u64, options: CodecOptions) -> Self {
        Self {
            reader,
            limit,
            consumed: 0,
            options,
        }
    }

    /// Read `n` bytes. Short reads are logged and the partial data returned.
    pub fn read_chunk(&mut self, n: usize) -> Result<Vec<u8>> {
        if self.is_exhausted() {
            return Ok(Vec::new());
        }

        let allowed = (n as u64).min(self.limit - self.consumed);
        let mut data = Vec::new();
        self.reader.by_ref().take(allowed).read_to_end(&mut data)?;
        if data.len() != n {
            let err = TagError::TruncatedRead {
                expected: n,
                actual: data.len(),
            };
            log::warn!("Error reading tag data: {}", err);
        }

        self.consumed = (self.consumed + n as u64).min(self.limit);
        if self.options.trace_reads {
            log::trace!("read {} of {} tag bytes so far", self.consumed, self.limit);
        }

        Ok(data)
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}
