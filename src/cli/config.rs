// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use tagwright::CodecOptions;

/// Tagwright - ID3 tag tool
#[derive(Parser, Debug)]
#[command(name = "tagwright")]
#[command(about = "Read, convert and rewrite ID3 tags", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (log frame-level details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log every bounded tag read
    #[arg(long, global = true)]
    pub trace_reads: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the preferred tag of each file
    Read {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Dump the raw ID3v2 frames of a file
    Frames {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Report which tag generations are present
    Detect {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Build an artist/album list from a directory tree
    Scan {
        /// Directory path
        #[arg(value_name = "DIR")]
        directory: String,

        /// File pattern, relative to the directory
        #[arg(short, long, default_value = "**/*.mp3")]
        pattern: String,

        /// Skip the rest of a directory once its name matches the album read
        #[arg(long)]
        skip_album_dirs: bool,

        /// Write `artist,album` CSV lines instead of a listing
        #[arg(long)]
        csv: bool,
    },

    /// Change ID3v2 text frames and write the result to a new file
    Set {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Frame assignment by id or field name, e.g. TPE1="Various artists" (repeatable)
        #[arg(
            short = 'F',
            long = "frame",
            value_name = "ID=VALUE",
            required_unless_present = "remove"
        )]
        frames: Vec<String>,

        /// Frame id or field name to drop (repeatable)
        #[arg(long, value_name = "ID")]
        remove: Vec<String>,

        /// Destination file (must differ from FILE)
        #[arg(short, long)]
        output: String,
    },

    /// Write an ID3v1 tag built from the file's ID3v2 tag
    V1FromV2 {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Show file information
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },
}

impl Config {
    /// Codec options implied by the command line
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::new()
            .with_debug(self.verbose)
            .with_trace_reads(self.trace_reads)
    }

    /// Default log filter, overridable through `RUST_LOG`
    pub fn log_filter(&self) -> &'static str {
        if self.trace_reads {
            "trace"
        } else if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
