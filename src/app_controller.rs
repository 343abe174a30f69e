use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_config::Config;
use crate::errors::{AppError, TimelineError, TimelineWarning};
use crate::export::{self, Exporter};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::segmenter::{Segmenter, Transcription};
use crate::timeline::alignment::{self, AlignmentReport};
use crate::timeline::serializer::{self, SubtitleFormat};
use crate::timeline::{Cue, LookupStats, ORIGINAL_LABEL, ParseReport, TrackRegistry, parser};

// @module: Application controller driving the timeline engine from the CLI

/// Smallest playback step, one millisecond
const MIN_PLAYBACK_STEP_SECS: f64 = 0.001;

/// Upper bound on ticks fed by one playback simulation
const MAX_PLAYBACK_TICKS: f64 = 10_000_000.0;

/// A translation given on the command line as `label=path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSource {
    pub label: String,
    pub path: PathBuf,
}

impl FromStr for TrackSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, path) = s
            .split_once('=')
            .ok_or_else(|| AppError::Config(format!("expected label=path, got '{}'", s)))?;
        let label = label.trim();
        if label.is_empty() || path.trim().is_empty() {
            return Err(AppError::Config(format!("expected label=path, got '{}'", s)));
        }
        if label == ORIGINAL_LABEL {
            return Err(AppError::Config(format!("'{}' is reserved for the original track", ORIGINAL_LABEL)));
        }
        Ok(Self {
            label: label.to_string(),
            path: PathBuf::from(path.trim()),
        })
    }
}

/// Parse statistics for one subtitle file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub format: SubtitleFormat,
    pub cue_count: usize,
    pub skipped_blocks: usize,
    pub first_start_ms: Option<u64>,
    pub duration_ms: u64,
    pub overlapping_pairs: usize,
}

/// A registry loaded from files, with everything that went wrong on the way
#[derive(Debug)]
pub struct LoadedSession {
    pub registry: TrackRegistry,
    /// Misaligned translations (stored anyway)
    pub errors: Vec<TimelineError>,
    /// Skipped blocks and empty tracks
    pub warnings: Vec<TimelineWarning>,
}

/// A change of the displayed cue during simulated playback
#[derive(Debug, Clone, PartialEq)]
pub struct CueTransition {
    pub at: f64,
    pub cue_index: Option<usize>,
}

/// Outcome of a simulated playback run
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSummary {
    pub ticks: usize,
    pub transitions: Vec<CueTransition>,
    pub stats: LookupStats,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and parse one subtitle file
    pub fn load_document(&self, path: &Path) -> Result<ParseReport> {
        let content = FileManager::read_to_string(path)?;
        Ok(parser::parse_with_report(&content))
    }

    /// Parse a file and summarize it
    pub fn inspect(&self, path: &Path) -> Result<TrackSummary> {
        let format = FileManager::detect_format(path)?;
        let report = self.load_document(path)?;
        let cues = &report.cues;

        let overlapping_pairs = cues
            .windows(2)
            .filter(|pair| pair[0].end_ms > pair[1].start_ms)
            .count();
        if overlapping_pairs > 0 {
            warn!("Found {} overlapping subtitle entries", overlapping_pairs);
        }

        Ok(TrackSummary {
            format,
            cue_count: cues.len(),
            skipped_blocks: report.skipped.len(),
            first_start_ms: cues.first().map(|cue| cue.start_ms),
            duration_ms: cues.iter().map(|cue| cue.end_ms).max().unwrap_or(0),
            overlapping_pairs,
        })
    }

    /// Load the original and every translation into a fresh registry
    pub fn load_session(&self, original: &Path, translations: &[TrackSource]) -> Result<LoadedSession> {
        let mut registry = TrackRegistry::with_scan_limit(self.config.playback.forward_scan_limit);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let sources = std::iter::once((ORIGINAL_LABEL, original))
            .chain(translations.iter().map(|source| (source.label.as_str(), source.path.as_path())));

        for (label, path) in sources {
            let report = self
                .load_document(path)
                .with_context(|| format!("Failed to load track '{}'", label))?;
            warnings.extend(report.skipped);

            match registry.add_track(label, report.cues) {
                Ok(Some(warning)) => warnings.push(warning),
                Ok(None) => {}
                Err(error @ TimelineError::MisalignedTrack { .. }) => errors.push(error),
                Err(error) => return Err(error.into()),
            }
        }

        info!(
            "Loaded {} track(s): {}",
            registry.len(),
            registry.labels().join(", ")
        );
        Ok(LoadedSession {
            registry,
            errors,
            warnings,
        })
    }

    /// Map a user-supplied label ("fr", "French", exact label) to a stored one
    pub fn resolve_label(&self, registry: &TrackRegistry, query: &str) -> Result<String, AppError> {
        if registry.track(query).is_some() {
            return Ok(query.to_string());
        }
        registry
            .labels()
            .into_iter()
            .find(|label| language_utils::labels_match(label, query))
            .map(str::to_string)
            .ok_or_else(|| AppError::Timeline(TimelineError::UnknownTrack(query.to_string())))
    }

    /// Select `label` (language-aware) and return the cue active at `t`
    pub fn active_cue(&self, registry: &mut TrackRegistry, select: Option<&str>, t: f64) -> Result<Option<Cue>> {
        if let Some(query) = select {
            let label = self.resolve_label(registry, query)?;
            registry.select_track(&label)?;
        }
        debug!(
            "Looking up {}s on track '{}'",
            t,
            registry.active_label().unwrap_or("-")
        );
        Ok(registry.active_cue_at(t).cloned())
    }

    /// Feed the active track playback ticks from `from` to `to`
    pub fn simulate_playback(&self, registry: &TrackRegistry, from: f64, to: f64, step: f64) -> Result<PlaybackSummary> {
        if !(step.is_finite() && step >= MIN_PLAYBACK_STEP_SECS) {
            return Err(anyhow!(
                "Playback step must be at least {}s, got {}",
                MIN_PLAYBACK_STEP_SECS,
                step
            ));
        }
        if !(from.is_finite() && to.is_finite()) || to < from {
            return Err(anyhow!("Invalid playback range {}..{}", from, to));
        }
        if (to - from) / step >= MAX_PLAYBACK_TICKS {
            return Err(anyhow!(
                "Playback of {}..{} in {}s steps exceeds {} ticks",
                from,
                to,
                step,
                MAX_PLAYBACK_TICKS
            ));
        }
        let track = registry
            .active_track()
            .ok_or_else(|| anyhow!("No track loaded"))?;
        track.index().reset_stats();

        let mut transitions = Vec::new();
        let mut shown: Option<Option<usize>> = None;
        let mut ticks = 0usize;

        loop {
            let t = from + step * ticks as f64;
            if t > to {
                break;
            }
            let current = registry.active_cue_at(t).map(|cue| cue.index);
            if shown != Some(current) {
                transitions.push(CueTransition { at: t, cue_index: current });
                shown = Some(current);
            }
            ticks += 1;
        }

        Ok(PlaybackSummary {
            ticks,
            transitions,
            stats: track.index().stats(),
        })
    }

    /// Compare each translation with the original
    pub fn check_alignment(&self, original: &Path, translations: &[TrackSource]) -> Result<Vec<(String, AlignmentReport)>> {
        let original_cues = self.load_document(original)?.cues;
        translations
            .iter()
            .map(|source| {
                let cues = self
                    .load_document(&source.path)
                    .with_context(|| format!("Failed to load track '{}'", source.label))?
                    .cues;
                Ok((source.label.clone(), alignment::alignment_report(&original_cues, &cues)))
            })
            .collect()
    }

    /// Convert a subtitle file; writes next to the input unless `output` is given
    pub fn convert(&self, input: &Path, to: SubtitleFormat, output: Option<&Path>) -> Result<PathBuf> {
        let report = self.load_document(input)?;
        if report.cues.is_empty() {
            return Err(anyhow!("No subtitles found in {:?}", input));
        }

        let content = serializer::serialize_with(&report.cues, to, &self.config.export.serialize_options());
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => input.with_extension(to.extension()),
        };
        if output == input {
            return Err(anyhow!("Refusing to overwrite the input file {:?}", input));
        }
        self.write_output(&output, &content)?;
        Ok(output)
    }

    /// Segment a word-level transcription JSON file into subtitles
    pub fn segment(&self, words_json: &Path, format: SubtitleFormat, output: Option<&Path>) -> Result<(Vec<Cue>, PathBuf)> {
        let json = FileManager::read_to_string(words_json)?;
        let transcription = Transcription::from_json(&json)
            .with_context(|| format!("Invalid transcription file {:?}", words_json))?;

        let cues = Segmenter::new(self.config.segmentation.clone()).segment(&transcription);
        if cues.is_empty() {
            warn!("Transcription {:?} contains no words", words_json);
        }

        let content = serializer::serialize_with(&cues, format, &self.config.export.serialize_options());
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => words_json.with_extension(format.extension()),
        };
        self.write_output(&output, &content)?;
        Ok((cues, output))
    }

    /// Write every track of a session in the configured formats
    pub fn export(&self, original: &Path, translations: &[TrackSource], discover: bool, out_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let mut sources = translations.to_vec();
        if discover {
            for found in export::discover_translations(original)? {
                if sources.iter().any(|source| source.label == found.label) {
                    continue;
                }
                debug!("Using discovered translation '{}' from {:?}", found.label, found.path);
                sources.push(TrackSource {
                    label: found.label,
                    path: found.path,
                });
            }
        }

        let session = self.load_session(original, &sources)?;
        for error in &session.errors {
            warn!("{}", error);
        }

        let out_dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.export.output_dir.clone())
            .or_else(|| original.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Exporter::new(self.config.export.clone()).write_all(&session.registry, &export::base_name(original), &out_dir)
    }

    fn write_output(&self, path: &Path, content: &str) -> Result<()> {
        if path.exists() && !self.config.export.force_overwrite {
            return Err(anyhow!("Output file already exists: {:?}. Use -f to force overwrite.", path));
        }
        FileManager::write_to_file(path, content)
    }
}
