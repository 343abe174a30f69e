/*!
 * Builds cues from a word-level transcription result.
 *
 * The transcription collaborator returns timed words, optionally tagged with a
 * speaker. Words are grouped into cues of bounded size and duration, and a new
 * cue starts whenever the speaker changes.
 */

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::SegmentationConfig;
use crate::timeline::cue::{Cue, seconds_to_ms};

/// Kind of a transcription token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    #[default]
    Word,
    Spacing,
    AudioEvent,
    #[serde(other)]
    Other,
}

/// One timed token from the transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribedWord {
    pub text: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub speaker_id: Option<String>,
}

/// The part of a transcription result the segmenter reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub words: Vec<TranscribedWord>,
}

impl Transcription {
    /// Parse a transcription JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse transcription JSON")
    }
}

struct Segment<'a> {
    start_ms: u64,
    end_ms: u64,
    speaker: &'a str,
    words: Vec<&'a str>,
}

/// Groups transcribed words into cues
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Segment a parsed transcription
    pub fn segment(&self, transcription: &Transcription) -> Vec<Cue> {
        self.segment_words(&transcription.words)
    }

    /// Segment words into cues numbered from 1
    pub fn segment_words(&self, words: &[TranscribedWord]) -> Vec<Cue> {
        let max_words = self.config.max_words_per_cue.max(1);
        let max_span_ms = seconds_to_ms(self.config.max_cue_duration_secs).unwrap_or(0);

        let mut segments: Vec<Segment> = Vec::new();
        let mut current: Option<Segment> = None;

        for word in words.iter().filter(|word| self.is_spoken(word)) {
            let Some(start_ms) = seconds_to_ms(word.start) else {
                warn!("Skipping word '{}' with invalid start {}", word.text, word.start);
                continue;
            };
            let end_ms = word
                .end
                .and_then(seconds_to_ms)
                .unwrap_or(start_ms)
                .max(start_ms);
            let speaker = word
                .speaker_id
                .as_deref()
                .unwrap_or(self.config.default_speaker.as_str());
            let text = word.text.trim();
            if text.is_empty() {
                continue;
            }

            let should_break = match &current {
                Some(segment) => {
                    segment.words.len() >= max_words
                        || start_ms.saturating_sub(segment.start_ms) > max_span_ms
                        || segment.speaker != speaker
                }
                None => true,
            };

            if should_break {
                if let Some(done) = current.take() {
                    segments.push(done);
                }
                current = Some(Segment {
                    start_ms,
                    end_ms,
                    speaker,
                    words: vec![text],
                });
            } else if let Some(segment) = current.as_mut() {
                segment.words.push(text);
                segment.end_ms = segment.end_ms.max(end_ms);
            }
        }
        if let Some(done) = current {
            segments.push(done);
        }

        let cues = self.to_cues(&segments);
        debug!("Segmented {} words into {} cues", words.len(), cues.len());
        cues
    }

    fn is_spoken(&self, word: &TranscribedWord) -> bool {
        match word.kind {
            TokenKind::Word => true,
            TokenKind::AudioEvent => self.config.include_audio_events,
            TokenKind::Spacing | TokenKind::Other => false,
        }
    }

    // End times are clamped to the next start and kept at least 1ms past
    // their own start
    fn to_cues(&self, segments: &[Segment]) -> Vec<Cue> {
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let mut end_ms = segment.end_ms;
                if let Some(next) = segments.get(i + 1) {
                    end_ms = end_ms.min(next.start_ms);
                }
                end_ms = end_ms.max(segment.start_ms.saturating_add(1));

                Cue::new(i + 1, segment.start_ms, end_ms, self.cue_text(segment))
            })
            .collect()
    }

    fn cue_text(&self, segment: &Segment) -> String {
        let text = segment.words.join(" ");
        if self.config.speaker_labels && segment.speaker != self.config.default_speaker {
            format!("[{}] {}", segment.speaker, text)
        } else {
            text
        }
    }
}
