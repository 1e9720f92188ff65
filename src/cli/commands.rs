// CLI command implementations
use crate::cli::OutputFormatter;
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tagwright::{
    AlbumDb, AudioFile, CodecOptions, FrameContent, FrameSlot, Id3v1Tag, Id3v2Tag, TagSelector,
};

/// Files between progress reports during a scan
const PROGRESS_EVERY: usize = 100;

/// Read the preferred tag of each file
pub fn command_read(
    files: &[String],
    output: Option<&str>,
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    for file_path in files {
        match AudioFile::new(file_path, options).read_metadata() {
            Ok(Some(metadata)) => {
                let mut value = serde_json::to_value(&metadata)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("file".to_string(), json!(file_path));
                }
                formatter.output_value(&value, &mut writer)?;
            }
            Ok(None) => formatter.print_error(&format!("{}: no usable ID3 tag", file_path)),
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    writer.flush()?;
    Ok(())
}

/// Dump the raw ID3v2 frame map
pub fn command_frames(
    file: &str,
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let tag = Id3v2Tag::read_from_path(file, options)
        .with_context(|| format!("cannot read ID3v2 tag from {}", file))?;

    let mut frames = Map::new();
    for (frame_id, content) in &tag.frames {
        let value = match content {
            FrameContent::Text(text) => json!(text),
            FrameContent::Comment(comment) => json!({
                "language": String::from_utf8_lossy(&comment.language),
                "description": comment.description,
                "text": comment.text,
            }),
            FrameContent::Binary(data) => json!(format!("<{} bytes>", data.len())),
        };
        frames.insert(frame_id.clone(), value);
    }

    formatter.output_value(&Value::Object(frames), &mut io::stdout())
}

/// Report which tag generations each file carries
pub fn command_detect(
    files: &[String],
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    for file_path in files {
        match AudioFile::new(file_path, options).detect() {
            Ok(presence) => {
                let v2 = presence
                    .id3v2
                    .map(|(major, minor)| format!("ID3v2.{}.{}", major, minor));
                let v1 = presence.id3v1.then(|| "ID3v1".to_string());
                let found: Vec<String> = v2.into_iter().chain(v1).collect();
                if found.is_empty() {
                    formatter.print_info(&format!("{}: no ID3 tags", file_path));
                } else {
                    formatter.print_info(&format!("{}: {}", file_path, found.join(", ")));
                }
            }
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    Ok(())
}

/// Scan a directory tree and list albums by artist
pub fn command_scan(
    directory: &str,
    pattern: &str,
    skip_album_dirs: bool,
    csv: bool,
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let glob_pattern = format!("{}/{}", directory.trim_end_matches('/'), pattern);
    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).context("invalid glob pattern")? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    let total = files.len();
    if total == 0 {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }

    let selector = TagSelector::new(options);
    let mut db = AlbumDb::new();
    let mut untagged = Vec::new();
    let mut skip_dir: Option<&Path> = None;

    for (index, path) in files.iter().enumerate() {
        if (index + 1) % PROGRESS_EVERY == 0 {
            formatter.print_info(&format!("File {} of {}", index + 1, total));
        }

        let dir = path.parent();
        if skip_dir.is_some() && skip_dir == dir {
            continue;
        }
        skip_dir = None;

        match selector.select(path) {
            Ok(Some(metadata)) => {
                db.add(&metadata.artist, &metadata.album);
                let dir_name = dir.and_then(Path::file_name).and_then(|n| n.to_str());
                if skip_album_dirs && dir_name == Some(metadata.album.as_str()) {
                    skip_dir = dir;
                }
            }
            Ok(None) => {
                log::warn!("no usable ID3 tag in {}", path.display());
                untagged.push(path.display().to_string());
            }
            Err(e) => formatter.print_error(&format!("{}: {}", path.display(), e)),
        }
    }

    if csv {
        db.write_csv(&mut io::stdout().lock())?;
    } else {
        let mut listing = Map::new();
        for (artist, albums) in db.iter() {
            listing.insert(artist.to_string(), json!(albums));
        }
        formatter.output_value(&Value::Object(listing), &mut io::stdout())?;
    }

    formatter.print_info(&format!(
        "{} files, {} artists, {} albums, {} without usable tags",
        total,
        db.artist_count(),
        db.album_count(),
        untagged.len()
    ));
    Ok(())
}

/// Resolve a frame id or a field name (`artist`, `tracknum`, ...) to a frame id
fn resolve_frame_id(name: &str) -> Result<&str> {
    if let Some(slot) = FrameSlot::from_name(name) {
        return Ok(slot.frame_id());
    }
    if name.len() != 4 || !name.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        bail!("{:?} is neither a field name nor a four character frame id", name);
    }
    Ok(name)
}

/// Parse `ID=VALUE` into a frame id and text
fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("expected ID=VALUE, got {:?}", assignment);
    };
    let frame_id = resolve_frame_id(name)?;
    if !(frame_id.starts_with('T') || frame_id == "COMM") {
        bail!("{} is not a text frame", frame_id);
    }
    Ok((frame_id, value))
}

/// Edit text frames and rewrite the file to `output`
pub fn command_set(
    file: &str,
    assignments: &[String],
    removals: &[String],
    output: &str,
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let edits = assignments
        .iter()
        .map(|a| parse_assignment(a))
        .collect::<Result<Vec<_>>>()?;
    let removals = removals
        .iter()
        .map(|name| resolve_frame_id(name))
        .collect::<Result<Vec<_>>>()?;

    let mut tag = Id3v2Tag::read_from_path(file, options)
        .with_context(|| format!("cannot read ID3v2 tag from {}", file))?;
    for (frame_id, value) in edits {
        tag.set_text(frame_id, value);
    }
    for frame_id in removals {
        if tag.remove_frame(frame_id).is_none() {
            formatter.print_info(&format!("{} has no {} frame", file, frame_id));
        }
    }

    let written = tag
        .rewrite(output, options)
        .with_context(|| format!("cannot rewrite {} to {}", file, output))?;
    formatter.print_success(&format!("Wrote {} ({} bytes)", output, written));
    Ok(())
}

/// Copy each file's ID3v2 fields into its ID3v1 trailer
pub fn command_v1_from_v2(
    files: &[String],
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let mut failures = 0;
    for file_path in files {
        let result = (|| -> Result<()> {
            let v2 = Id3v2Tag::read_from_path(file_path, options)?;
            let mut v1 = Id3v1Tag::read_from_path(file_path, options)?;
            v1.copy_from_v2(&v2);
            v1.write_to_path(file_path)?;
            Ok(())
        })();

        match result {
            Ok(()) => formatter.print_success(&format!("Updated ID3v1 tag of {}", file_path)),
            Err(e) => {
                failures += 1;
                formatter.print_error(&format!("{}: {}", file_path, e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}

/// Size, modification time and tag summary of one file
fn file_info(file_path: &str, options: CodecOptions) -> Result<Map<String, Value>> {
    let metadata = std::fs::metadata(file_path)?;
    let modified = metadata.modified().ok().map(|t| {
        chrono::DateTime::<chrono::Utc>::from(t)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    });

    let audio = AudioFile::new(file_path, options);
    let v2 = audio.read_id3v2()?;
    let v1 = audio.read_id3v1()?;

    let mut info = Map::new();
    info.insert("file".to_string(), json!(file_path));
    info.insert("size".to_string(), json!(metadata.len()));
    info.insert("modified".to_string(), json!(modified));
    if v2.loaded {
        info.insert("id3v2".to_string(), json!(v2.version_string()));
        info.insert("id3v2_frames".to_string(), json!(v2.frames.len()));
        info.insert("id3v2_tag".to_string(), json!(v2.to_string()));
        let fields: Map<String, Value> = FrameSlot::ALL
            .into_iter()
            .filter(|slot| v2.frames.contains_key(slot.frame_id()))
            .map(|slot| (slot.long_name().to_string(), json!(v2.fields.get(slot))))
            .collect();
        info.insert("id3v2_fields".to_string(), Value::Object(fields));
    }
    if v1.loaded {
        info.insert("id3v1_tag".to_string(), json!(v1.to_string()));
    }
    Ok(info)
}

/// Show file size, modification time and tag summary
pub fn command_info(
    files: &[String],
    formatter: &OutputFormatter,
    options: CodecOptions,
) -> Result<()> {
    let mut failures = 0;
    for file_path in files {
        match file_info(file_path, options) {
            Ok(info) => formatter.output_value(&Value::Object(info), &mut io::stdout())?,
            Err(e) => {
                failures += 1;
                formatter.print_error(&format!("{}: {:#}", file_path, e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("TCON=Latin").unwrap(), ("TCON", "Latin"));
        assert_eq!(parse_assignment("TIT2=a=b").unwrap(), ("TIT2", "a=b"));
        assert_eq!(parse_assignment("COMM=").unwrap(), ("COMM", ""));
        assert!(parse_assignment("TCON").is_err());
        assert!(parse_assignment("APIC=x").is_err());
        assert!(parse_assignment("TIT=x").is_err());
    }

    #[test]
    fn test_field_names_resolve() {
        assert_eq!(
            parse_assignment("artist=Various artists").unwrap(),
            ("TPE1", "Various artists")
        );
        assert_eq!(parse_assignment("Comments=none").unwrap(), ("COMM", "none"));
        assert_eq!(resolve_frame_id("APIC").unwrap(), "APIC");
        assert!(resolve_frame_id("lyrics").is_err());
    }

    #[test]
    fn test_info_reports_tag_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.mp3");
        let mut tag = Id3v2Tag {
            loaded: true,
            ..Id3v2Tag::default()
        };
        tag.set_text("TPE1", "Tinariwen");
        std::fs::write(&path, tag.render()).unwrap();

        let info = file_info(path.to_str().unwrap(), CodecOptions::default()).unwrap();
        assert_eq!(info["id3v2"], "2.3.0");
        assert_eq!(info["id3v2_fields"]["Lead Performer"], "Tinariwen");
        assert!(!info.contains_key("id3v1_tag"));
    }

    #[test]
    fn test_info_continues_past_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.mp3");
        std::fs::write(&good, vec![0u8; 256]).unwrap();
        let files = vec![
            dir.path().join("missing.mp3").display().to_string(),
            dir.path().display().to_string(),
            good.display().to_string(),
        ];

        let formatter = OutputFormatter::new(OutputFormat::Json, true);
        let err = command_info(&files, &formatter, CodecOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 files failed");
    }
}
