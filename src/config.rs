// Codec configuration
//
// Verbosity is carried by value into every reader and writer instead of
// living in process-wide switches.

use serde::{Deserialize, Serialize};

/// Options shared by the ID3v1/ID3v2 readers and the writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Log frame ids, sizes and end-of-tag events at `debug` level
    pub debug: bool,
    /// Log the running byte count of every bounded read at `trace` level
    pub trace_reads: bool,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_trace_reads(mut self, trace_reads: bool) -> Self {
        self.trace_reads = trace_reads;
        self
    }
}
