use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;
use crate::timeline::serializer::{SubtitleFormat, format_timestamp};

// @module: Cue data model

/// One timed subtitle entry.
///
/// Times are held as integer milliseconds so that a parse/serialize round
/// trip is exact; `start()` and `end()` expose them in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cue {
    // @field: Ordinal as written in the source document, never renumbered
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Opaque text, lines joined with '\n'
    pub text: String,
}

impl Cue {
    /// Creates a cue without checking the invariants
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    // @creates: Validated cue
    // @validates: Positive index, start < end
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Result<Self, TimelineError> {
        if index == 0 {
            return Err(TimelineError::InvalidCue {
                index,
                reason: "index must be positive".to_string(),
            });
        }
        if end_ms <= start_ms {
            return Err(TimelineError::InvalidCue {
                index,
                reason: format!("end time {}ms <= start time {}ms", end_ms, start_ms),
            });
        }
        Ok(Self::new(index, start_ms, end_ms, text))
    }

    /// Creates a validated cue from times in seconds, rounded to the millisecond
    pub fn from_seconds(index: usize, start: f64, end: f64, text: impl Into<String>) -> Result<Self, TimelineError> {
        let start_ms = seconds_to_ms(start).ok_or_else(|| TimelineError::InvalidCue {
            index,
            reason: format!("invalid start time {}", start),
        })?;
        let end_ms = seconds_to_ms(end).ok_or_else(|| TimelineError::InvalidCue {
            index,
            reason: format!("invalid end time {}", end),
        })?;
        Self::new_validated(index, start_ms, end_ms, text)
    }

    /// Start time in seconds
    pub fn start(&self) -> f64 {
        ms_to_seconds(self.start_ms)
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        ms_to_seconds(self.end_ms)
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether `t` (seconds) falls inside `[start, end]`, both ends inclusive
    pub fn contains(&self, t: f64) -> bool {
        self.start() <= t && t <= self.end()
    }

    /// Whether two cues share the same `(index, start, end)` triple
    pub fn same_timing(&self, other: &Cue) -> bool {
        self.index == other.index && self.start_ms == other.start_ms && self.end_ms == other.end_ms
    }

    /// Text lines of the cue
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            format_timestamp(self.start_ms, SubtitleFormat::Srt),
            format_timestamp(self.end_ms, SubtitleFormat::Srt)
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Milliseconds to seconds. Division keeps `1001 -> 1.001` exactly equal to
/// the literal, which multiplication of the other side would not.
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Seconds to milliseconds, rounded. `None` for negative, non-finite or
/// out-of-range input.
pub fn seconds_to_ms(seconds: f64) -> Option<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let ms = (seconds * 1000.0).round();
    if ms >= u64::MAX as f64 {
        return None;
    }
    Some(ms as u64)
}
