/*!
 * Positional alignment between a translation and the original track.
 *
 * A translation is aligned when it has the same number of cues as the
 * original and the same `(index, start, end)` at every position. Only the
 * text may differ. Misalignment is reported, never repaired.
 */

use std::fmt;

use crate::timeline::cue::Cue;
use crate::timeline::serializer::{SubtitleFormat, format_timestamp};

/// A single way in which a translation disagrees with the original
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentIssue {
    /// Different number of cues
    CueCountMismatch { expected: usize, actual: usize },
    /// Same position, different index
    IndexMismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },
    /// Same position, different start or end
    TimingMismatch {
        position: usize,
        index: usize,
        expected: (u64, u64),
        actual: (u64, u64),
    },
}

impl fmt::Display for AlignmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentIssue::CueCountMismatch { expected, actual } => {
                write!(f, "expected {} cues, found {}", expected, actual)
            }
            AlignmentIssue::IndexMismatch { position, expected, actual } => {
                write!(
                    f,
                    "cue #{} has index {} (original: {})",
                    position + 1,
                    actual,
                    expected
                )
            }
            AlignmentIssue::TimingMismatch { position, index, expected, actual } => {
                write!(
                    f,
                    "cue #{} (index {}) is timed {} --> {} (original: {} --> {})",
                    position + 1,
                    index,
                    format_timestamp(actual.0, SubtitleFormat::Srt),
                    format_timestamp(actual.1, SubtitleFormat::Srt),
                    format_timestamp(expected.0, SubtitleFormat::Srt),
                    format_timestamp(expected.1, SubtitleFormat::Srt)
                )
            }
        }
    }
}

/// Result of comparing a candidate track with the original
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Issues in the order found; a count mismatch, if any, comes first
    pub issues: Vec<AlignmentIssue>,
}

impl AlignmentReport {
    pub fn is_aligned(&self) -> bool {
        self.issues.is_empty()
    }

    /// The issue reported to callers when a single one is needed
    pub fn first_issue(&self) -> Option<&AlignmentIssue> {
        self.issues.first()
    }
}

/// First disagreement between the two tracks, if any
pub fn check_alignment(original: &[Cue], candidate: &[Cue]) -> Result<(), AlignmentIssue> {
    if original.len() != candidate.len() {
        return Err(AlignmentIssue::CueCountMismatch {
            expected: original.len(),
            actual: candidate.len(),
        });
    }
    match original
        .iter()
        .zip(candidate)
        .enumerate()
        .find_map(|(position, (a, b))| compare_position(position, a, b))
    {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Every disagreement, comparing positions up to the shorter track
pub fn alignment_report(original: &[Cue], candidate: &[Cue]) -> AlignmentReport {
    let mut issues = Vec::new();
    if original.len() != candidate.len() {
        issues.push(AlignmentIssue::CueCountMismatch {
            expected: original.len(),
            actual: candidate.len(),
        });
    }
    issues.extend(
        original
            .iter()
            .zip(candidate)
            .enumerate()
            .filter_map(|(position, (a, b))| compare_position(position, a, b)),
    );
    AlignmentReport { issues }
}

fn compare_position(position: usize, original: &Cue, candidate: &Cue) -> Option<AlignmentIssue> {
    if original.same_timing(candidate) {
        return None;
    }
    if original.index != candidate.index {
        return Some(AlignmentIssue::IndexMismatch {
            position,
            expected: original.index,
            actual: candidate.index,
        });
    }
    if original.start_ms != candidate.start_ms || original.end_ms != candidate.end_ms {
        return Some(AlignmentIssue::TimingMismatch {
            position,
            index: candidate.index,
            expected: (original.start_ms, original.end_ms),
            actual: (candidate.start_ms, candidate.end_ms),
        });
    }
    None
}
