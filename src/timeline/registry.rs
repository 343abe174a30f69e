/*!
 * Track registry for one generation session.
 *
 * Holds one `TimelineIndex` per track label ("original" plus any number of
 * translations), remembers which one is selected and keeps every translation
 * checked against the original. The registry is an ordinary owned value: the
 * playback surface creates it for a session and drops it on reset.
 */

use log::{debug, info, warn};

use crate::errors::{TimelineError, TimelineWarning};
use crate::timeline::alignment::{self, AlignmentIssue};
use crate::timeline::cue::Cue;
use crate::timeline::index::{DEFAULT_FORWARD_SCAN_LIMIT, TimelineIndex};
use crate::timeline::parser;
use crate::timeline::serializer::{self, SerializeOptions, SubtitleFormat};

/// Label of the transcription track
pub const ORIGINAL_LABEL: &str = "original";

/// Alignment state of a stored track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackAlignment {
    /// The track is the original
    Original,
    /// Matches the original, or no original has arrived yet
    Aligned,
    /// Stored in degraded mode
    Misaligned(AlignmentIssue),
}

impl TrackAlignment {
    pub fn is_aligned(&self) -> bool {
        !matches!(self, TrackAlignment::Misaligned(_))
    }
}

/// A labelled, indexed cue sequence
#[derive(Debug)]
pub struct Track {
    label: String,
    index: TimelineIndex,
    alignment: TrackAlignment,
}

impl Track {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cues in start order
    pub fn cues(&self) -> &[Cue] {
        self.index.cues()
    }

    pub fn index(&self) -> &TimelineIndex {
        &self.index
    }

    pub fn alignment(&self) -> &TrackAlignment {
        &self.alignment
    }

    pub fn is_original(&self) -> bool {
        self.label == ORIGINAL_LABEL
    }
}

/// Session-scoped set of tracks with one active selection
#[derive(Debug)]
pub struct TrackRegistry {
    // Original, when present, is always at position 0
    tracks: Vec<Track>,
    active: Option<usize>,
    scan_limit: usize,
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_scan_limit(DEFAULT_FORWARD_SCAN_LIMIT)
    }

    /// Create an empty registry whose indexes use the given forward scan limit
    pub fn with_scan_limit(scan_limit: usize) -> Self {
        Self {
            tracks: Vec::new(),
            active: None,
            scan_limit,
        }
    }

    /// Store a track under `label`, replacing any track with the same label.
    ///
    /// Returns `Ok(Some(EmptyTimeline))` when the track has no cues. A
    /// translation that disagrees with the original returns
    /// `Err(MisalignedTrack)`; the track is stored anyway and flagged.
    pub fn add_track(&mut self, label: &str, cues: Vec<Cue>) -> Result<Option<TimelineWarning>, TimelineError> {
        let index = TimelineIndex::with_scan_limit(cues, self.scan_limit);
        let is_original = label == ORIGINAL_LABEL;

        let alignment = if is_original {
            TrackAlignment::Original
        } else {
            match self.original() {
                Some(original) => match alignment::check_alignment(original.cues(), index.cues()) {
                    Ok(()) => TrackAlignment::Aligned,
                    Err(issue) => TrackAlignment::Misaligned(issue),
                },
                None => TrackAlignment::Aligned,
            }
        };

        let cue_count = index.len();
        let track = Track {
            label: label.to_string(),
            index,
            alignment: alignment.clone(),
        };
        let position = self.store(track);
        debug!("Stored track '{}' ({} cues) at position {}", label, cue_count, position);

        if is_original {
            self.recheck_translations();
        }

        if let TrackAlignment::Misaligned(issue) = alignment {
            warn!("Track '{}' is not aligned with the original: {}", label, issue);
            return Err(TimelineError::MisalignedTrack {
                label: label.to_string(),
                issue,
            });
        }

        if cue_count == 0 {
            warn!("Track '{}' has no subtitles", label);
            return Ok(Some(TimelineWarning::EmptyTimeline {
                label: label.to_string(),
            }));
        }

        Ok(None)
    }

    /// Parse `document` and store it under `label`. Skipped blocks are logged
    /// by the parser; registry errors are returned as for `add_track`.
    pub fn add_document(&mut self, label: &str, document: &str) -> Result<Option<TimelineWarning>, TimelineError> {
        let report = parser::parse_with_report(document);
        if !report.is_clean() {
            info!(
                "Track '{}': {} malformed block(s) skipped",
                label,
                report.skipped.len()
            );
        }
        self.add_track(label, report.cues)
    }

    /// Make `label` the active track. Idempotent.
    pub fn select_track(&mut self, label: &str) -> Result<(), TimelineError> {
        let position = self
            .position_of(label)
            .ok_or_else(|| TimelineError::UnknownTrack(label.to_string()))?;
        self.active = Some(position);
        Ok(())
    }

    /// Label of the active track
    pub fn active_label(&self) -> Option<&str> {
        self.active_track().map(Track::label)
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active.and_then(|position| self.tracks.get(position))
    }

    /// Active cue of the active track at `t` seconds; none if nothing is loaded
    pub fn active_cue_at(&self, t: f64) -> Option<&Cue> {
        self.active_track().and_then(|track| track.index.active_at(t))
    }

    /// All labels, "original" first, then in the order they were added
    pub fn labels(&self) -> Vec<&str> {
        self.tracks.iter().map(Track::label).collect()
    }

    pub fn track(&self, label: &str) -> Option<&Track> {
        self.position_of(label).map(|position| &self.tracks[position])
    }

    pub fn original(&self) -> Option<&Track> {
        self.tracks.first().filter(|track| track.is_original())
    }

    /// Alignment flag for `label`, `None` if unknown
    pub fn is_aligned(&self, label: &str) -> Option<bool> {
        self.track(label).map(|track| track.alignment.is_aligned())
    }

    /// Labels stored in degraded mode
    pub fn misaligned_labels(&self) -> Vec<&str> {
        self.tracks
            .iter()
            .filter(|track| !track.alignment.is_aligned())
            .map(Track::label)
            .collect()
    }

    /// Serialize the track stored under `label`
    pub fn export(&self, label: &str, format: SubtitleFormat) -> Result<String, TimelineError> {
        self.export_with(label, format, &SerializeOptions::default())
    }

    pub fn export_with(
        &self,
        label: &str,
        format: SubtitleFormat,
        options: &SerializeOptions,
    ) -> Result<String, TimelineError> {
        let track = self
            .track(label)
            .ok_or_else(|| TimelineError::UnknownTrack(label.to_string()))?;
        Ok(serializer::serialize_with(track.cues(), format, options))
    }

    /// Drop every track, back to the empty state
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn position_of(&self, label: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.label == label)
    }

    // Replace in place, or insert (original at the front); keeps the selection
    // pointing at the same track
    fn store(&mut self, track: Track) -> usize {
        if let Some(position) = self.position_of(&track.label) {
            self.tracks[position] = track;
            return position;
        }

        let position = if track.is_original() { 0 } else { self.tracks.len() };
        self.tracks.insert(position, track);

        self.active = match self.active {
            None => Some(position),
            Some(active) if active >= position => Some(active + 1),
            keep => keep,
        };
        position
    }

    fn recheck_translations(&mut self) {
        let Some((original, translations)) = self.tracks.split_first_mut() else {
            return;
        };
        for track in translations {
            track.alignment = match alignment::check_alignment(original.cues(), track.cues()) {
                Ok(()) => TrackAlignment::Aligned,
                Err(issue) => {
                    warn!(
                        "Track '{}' is not aligned with the new original: {}",
                        track.label, issue
                    );
                    TrackAlignment::Misaligned(issue)
                }
            };
        }
    }
}
