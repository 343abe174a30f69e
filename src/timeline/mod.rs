/*!
 * Subtitle timeline engine.
 *
 * - `cue`: the cue data model
 * - `parser`: SRT/WebVTT text to an ordered cue sequence
 * - `index`: "which cue is active at time t" lookups for one track
 * - `alignment`: positional comparison of a translation with the original
 * - `registry`: per-session set of tracks with the active selection
 * - `serializer`: cue sequence back to SRT/WebVTT text
 *
 * Everything here is synchronous and in-memory.
 */

pub mod alignment;
pub mod cue;
pub mod index;
pub mod parser;
pub mod registry;
pub mod serializer;

// Re-export main types
pub use alignment::{AlignmentIssue, AlignmentReport};
pub use cue::Cue;
pub use index::{LookupStats, TimelineIndex};
pub use parser::{ParseReport, parse, parse_with_report};
pub use registry::{ORIGINAL_LABEL, Track, TrackAlignment, TrackRegistry};
pub use serializer::{SerializeOptions, SubtitleFormat, serialize, serialize_with};
