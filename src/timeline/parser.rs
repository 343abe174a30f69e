/*!
 * Best-effort parser for SRT and WebVTT documents.
 *
 * The document is cut into blocks at blank lines. Each block is parsed on its
 * own; a bad block is skipped and reported, it never aborts the document.
 * The resulting cues are stable-sorted by start time.
 */

use anyhow::{Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{MalformedReason, TimelineWarning};
use crate::timeline::cue::Cue;
use crate::timeline::serializer::WEBVTT_HEADER;

// @const: Timing line, hours optional, ',' or '.' before the millis, trailing cue settings allowed
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(\d+):)?(\d{1,2}):(\d{2})[,.](\d{3})\s*-->\s*(?:(\d+):)?(\d{1,2}):(\d{2})[,.](\d{3})(?:\s+.*)?$",
    )
    .expect("timing regex is valid")
});

// @const: A single timestamp
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{2})[,.](\d{3})$").expect("timestamp regex is valid")
});

/// Outcome of a parse, with every block that was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Well-formed cues, sorted by start
    pub cues: Vec<Cue>,
    /// One `MalformedBlockSkipped` per dropped block
    pub skipped: Vec<TimelineWarning>,
}

impl ParseReport {
    /// True when every block parsed
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Document dialect, decided by the first non-blank line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Srt,
    WebVtt,
}

struct Block<'a> {
    number: usize,
    first_line: usize,
    lines: Vec<&'a str>,
}

/// Parse a document into cues sorted by start, skipping malformed blocks
pub fn parse(document: &str) -> Vec<Cue> {
    parse_with_report(document).cues
}

/// Parse a document and report skipped blocks
pub fn parse_with_report(document: &str) -> ParseReport {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let dialect = detect_dialect(document);

    let mut report = ParseReport::default();
    let mut cue_ordinal = 0usize;

    for (position, block) in split_blocks(document).into_iter().enumerate() {
        if dialect == Dialect::WebVtt && is_vtt_metadata_block(&block, position) {
            continue;
        }

        cue_ordinal += 1;
        match parse_block(&block, dialect, cue_ordinal) {
            Ok(cue) => report.cues.push(cue),
            Err(reason) => {
                warn!(
                    "Skipping malformed subtitle block {} at line {}: {}",
                    block.number, block.first_line, reason
                );
                report.skipped.push(TimelineWarning::MalformedBlockSkipped {
                    block: block.number,
                    line: block.first_line,
                    reason,
                });
            }
        }
    }

    // Vec::sort_by_key is stable: simultaneous cues keep document order
    report.cues.sort_by_key(|cue| cue.start_ms);

    debug!(
        "Parsed {} cues ({} blocks skipped)",
        report.cues.len(),
        report.skipped.len()
    );
    report
}

/// Parse `HH:MM:SS,mmm` / `HH:MM:SS.mmm` / `MM:SS.mmm` to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let caps = TIMESTAMP_REGEX
        .captures(timestamp.trim())
        .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;
    timestamp_from_captures(&caps, 1).ok_or_else(|| anyhow!("Invalid time components in timestamp: {}", timestamp))
}

/// Parse a timing line into `(start_ms, end_ms)`
pub fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let caps = TIMING_REGEX.captures(line.trim())?;
    let start = timestamp_from_captures(&caps, 1)?;
    let end = timestamp_from_captures(&caps, 5)?;
    Some((start, end))
}

fn timestamp_from_captures(caps: &regex::Captures, first: usize) -> Option<u64> {
    let field = |i: usize| -> Option<u64> {
        match caps.get(first + i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let hours = field(0)?;
    let minutes = field(1)?;
    let seconds = field(2)?;
    let millis = field(3)?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
}

fn detect_dialect(document: &str) -> Dialect {
    let first = document.lines().map(str::trim).find(|line| !line.is_empty());
    match first {
        Some(line) if is_webvtt_signature(line) => Dialect::WebVtt,
        _ => Dialect::Srt,
    }
}

fn is_webvtt_signature(line: &str) -> bool {
    match line.strip_prefix(WEBVTT_HEADER) {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

// Header, NOTE, STYLE and REGION blocks carry no cue
fn is_vtt_metadata_block(block: &Block, position: usize) -> bool {
    let first = block.lines[0].trim();
    if position == 0 && is_webvtt_signature(first) {
        return true;
    }
    let keyword = first.split_whitespace().next().unwrap_or("");
    matches!(keyword, "NOTE" | "STYLE" | "REGION") && !first.contains("-->")
}

// Blank lines (whitespace-only) separate blocks; runs of them count once
fn split_blocks(document: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (i, raw) in document.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        match current.as_mut() {
            Some(block) => block.lines.push(line),
            None => {
                current = Some(Block {
                    number: blocks.len() + 1,
                    first_line: i + 1,
                    lines: vec![line],
                })
            }
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

fn parse_block(block: &Block, dialect: Dialect, ordinal: usize) -> Result<Cue, MalformedReason> {
    let lines = &block.lines;

    // WebVTT cues may omit the identifier line
    let (index, timing_at) = match dialect {
        Dialect::WebVtt if lines[0].contains("-->") => (ordinal, 0),
        Dialect::WebVtt => {
            if lines.len() < 2 {
                return Err(MalformedReason::TooFewLines);
            }
            let index = parse_index(lines[0]).unwrap_or(ordinal);
            (index, 1)
        }
        Dialect::Srt => {
            if lines.len() < 2 {
                return Err(MalformedReason::TooFewLines);
            }
            let index = parse_index(lines[0])
                .ok_or_else(|| MalformedReason::InvalidIndex(lines[0].trim().to_string()))?;
            (index, 1)
        }
    };

    let timing = lines[timing_at];
    let (start_ms, end_ms) =
        parse_timing_line(timing).ok_or_else(|| MalformedReason::InvalidTiming(timing.trim().to_string()))?;

    if start_ms >= end_ms {
        return Err(MalformedReason::InvalidTimeRange { start_ms, end_ms });
    }

    let text = lines[timing_at + 1..].join("\n");
    Ok(Cue::new(index, start_ms, end_ms, text))
}

// Digits only; `usize::from_str` would also take a leading `+`
fn parse_index(line: &str) -> Option<usize> {
    let digits = line.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(index) => Some(index),
    }
}
