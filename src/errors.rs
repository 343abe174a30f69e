/*!
 * Error types for the subtimeline engine.
 *
 * Registry and cue construction failures are returned as `TimelineError`.
 * Non-fatal conditions the host should surface to the user (skipped blocks,
 * tracks without cues) are `TimelineWarning`s. Both use thiserror; the
 * application layer wraps them in `AppError`.
 */

use thiserror::Error;

use crate::timeline::alignment::AlignmentIssue;

/// Why the parser dropped a block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Block has fewer than the index and timing lines
    #[error("block has fewer than two lines")]
    TooFewLines,

    /// The index line is not a positive integer
    #[error("non-numeric index '{0}'")]
    InvalidIndex(String),

    /// The timing line could not be parsed
    #[error("unparsable timing line '{0}'")]
    InvalidTiming(String),

    /// The cue ends before (or when) it starts
    #[error("invalid time range: start {start_ms}ms >= end {end_ms}ms")]
    InvalidTimeRange { start_ms: u64, end_ms: u64 },
}

/// Non-fatal conditions reported alongside a successful result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineWarning {
    /// A block was dropped during parsing
    #[error("Skipped malformed block {block} at line {line}: {reason}")]
    MalformedBlockSkipped {
        /// 1-based block number in the document
        block: usize,
        /// 1-based line number where the block starts
        line: usize,
        /// What was wrong with it
        reason: MalformedReason,
    },

    /// A track parsed to zero cues
    #[error("Track '{label}' has no subtitles")]
    EmptyTimeline { label: String },
}

/// Errors raised by the timeline engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A translation does not line up with the original track.
    /// The track is still stored, flagged as unaligned.
    #[error("Track '{label}' is not aligned with the original: {issue}")]
    MisalignedTrack {
        label: String,
        issue: AlignmentIssue,
    },

    /// The label was never added to the registry
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// A cue violates the cue invariants
    #[error("Invalid cue {index}: {reason}")]
    InvalidCue { index: usize, reason: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the timeline engine
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
