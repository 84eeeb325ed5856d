use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use serde::Serialize;
use crate::errors::SubtitleError;

// @module: SRT subtitle parsing

// @const: SRT timecode line regex
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @const: Block separator, two or more newlines (blank lines may hold stray spaces)
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+").unwrap()
});

const UTF8_BOM: &str = "\u{feff}";

// @struct: One parsed caption cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleLine {
    // @field: Declared cue index, or synthetic when the source has none
    pub id: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Dialogue text, internal newlines collapsed to spaces
    pub text: String,
}

impl SubtitleLine {
    /// Creates a new subtitle line
    pub fn new(id: usize, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleLine {
            id,
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse a `HH:MM:SS,mmm --> HH:MM:SS,mmm` line into start and end milliseconds
pub fn parse_timecode_line(line: &str) -> Option<(u64, u64)> {
    let caps = TIMECODE_REGEX.captures(line.trim())?;
    Some((timestamp_to_ms(&caps, 1)?, timestamp_to_ms(&caps, 5)?))
}

fn timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
    let field = |offset: usize| -> Option<u64> {
        caps.get(start_idx + offset)?.as_str().parse().ok()
    };
    let hours = field(0)?;
    let minutes = field(1)?;
    let seconds = field(2)?;
    let millis = field(3)?;

    Some(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}

/// Parse SRT text into subtitle lines.
///
/// Parsing is lenient: blocks with too few lines, a missing timecode or no
/// text are dropped and the remaining blocks are returned in input order.
/// Declared indices are kept as-is, even when duplicated or out of order.
pub fn parse_srt_string(content: &str) -> Vec<SubtitleLine> {
    let normalized = content.replace("\r\n", "\n");
    let normalized = normalized.strip_prefix(UTF8_BOM).unwrap_or(normalized.as_str());

    let mut lines: Vec<SubtitleLine> = Vec::new();
    let mut dropped = 0usize;

    for block in BLOCK_SEPARATOR.split(normalized) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        match parse_block(block, lines.len() + 1) {
            Some(line) => lines.push(line),
            None => {
                dropped += 1;
                debug!("Dropping malformed subtitle block: {:?}", block.lines().next().unwrap_or(""));
            }
        }
    }

    if dropped > 0 {
        debug!("Parsed {} subtitle lines, dropped {} malformed blocks", lines.len(), dropped);
    }

    lines
}

fn parse_block(block: &str, synthetic_id: usize) -> Option<SubtitleLine> {
    let block_lines: Vec<&str> = block.split('\n').collect();
    if block_lines.len() < 2 {
        return None;
    }

    let (id, rest) = match block_lines[0].trim().parse::<usize>() {
        Ok(declared) => (declared, &block_lines[1..]),
        Err(_) => (synthetic_id, &block_lines[..]),
    };

    let (timecode, text_lines) = rest.split_first()?;
    let (start_time_ms, end_time_ms) = parse_timecode_line(timecode)?;

    let text = text_lines.join(" ").trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(SubtitleLine::new(id, start_time_ms, end_time_ms, text))
}

/// Decode raw bytes as UTF-8 and parse them as SRT.
///
/// This is the only parsing entry point that can fail: bytes that are not
/// text are reported to the caller and no partial result is produced.
pub fn parse_srt_bytes(bytes: &[u8]) -> Result<Vec<SubtitleLine>, SubtitleError> {
    let content = std::str::from_utf8(bytes)?;
    Ok(parse_srt_string(content))
}

/// Collection of subtitle lines parsed from one file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Parsed lines in file order
    pub lines: Vec<SubtitleLine>,
}

impl SubtitleCollection {
    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SubtitleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let lines = parse_srt_bytes(&bytes)?;

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            lines,
        })
    }

    /// Number of parsed lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line survived parsing
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Lines: {}", self.lines.len())?;
        Ok(())
    }
}
