/*!
 * Cue serialization to SRT and WebVTT.
 *
 * Output of `serialize` parses back to the same cues with `parser::parse`
 * (index, timing to the millisecond, text), provided no cue text contains a
 * blank line and no text line ends in `\r`. The parser reads `\r\n` as a
 * line break, so a trailing carriage return does not survive the trip.
 */

use std::fmt::{self, Write};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::timeline::cue::Cue;

/// WebVTT file signature
pub const WEBVTT_HEADER: &str = "WEBVTT";

/// Supported text subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip
    #[default]
    Srt,
    /// WebVTT
    Vtt,
}

impl SubtitleFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    /// Separator between seconds and milliseconds
    pub fn millis_separator(&self) -> char {
        match self {
            Self::Srt => ',',
            Self::Vtt => '.',
        }
    }

    /// All formats, in export order
    pub fn all() -> [SubtitleFormat; 2] {
        [Self::Srt, Self::Vtt]
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            _ => Err(anyhow!("Unsupported subtitle format: {}", s)),
        }
    }
}

/// Knobs for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Emit the cue index as a WebVTT cue identifier
    pub vtt_cue_identifiers: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            vtt_cue_identifiers: true,
        }
    }
}

/// Format milliseconds as `HH:MM:SS,mmm` (SRT) or `HH:MM:SS.mmm` (WebVTT)
pub fn format_timestamp(ms: u64, format: SubtitleFormat) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        seconds,
        format.millis_separator(),
        millis
    )
}

/// Serialize cues with default options
pub fn serialize(cues: &[Cue], format: SubtitleFormat) -> String {
    serialize_with(cues, format, &SerializeOptions::default())
}

/// Serialize cues into the given format
pub fn serialize_with(cues: &[Cue], format: SubtitleFormat, options: &SerializeOptions) -> String {
    let mut out = String::with_capacity(cues.len() * 64);

    if format == SubtitleFormat::Vtt {
        out.push_str(WEBVTT_HEADER);
        out.push_str("\n\n");
    }

    let emit_index = match format {
        SubtitleFormat::Srt => true,
        SubtitleFormat::Vtt => options.vtt_cue_identifiers,
    };

    for (i, cue) in cues.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail
        let _ = write_block(&mut out, cue, format, emit_index);
    }

    out
}

fn write_block(out: &mut String, cue: &Cue, format: SubtitleFormat, emit_index: bool) -> fmt::Result {
    if emit_index {
        writeln!(out, "{}", cue.index)?;
    }
    writeln!(
        out,
        "{} --> {}",
        format_timestamp(cue.start_ms, format),
        format_timestamp(cue.end_ms, format)
    )?;
    writeln!(out, "{}", cue.text)
}
