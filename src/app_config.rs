use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::timeline::SerializeOptions;
use crate::timeline::index::DEFAULT_FORWARD_SCAN_LIMIT;
use crate::timeline::serializer::SubtitleFormat;

/// Application configuration module
/// This module handles loading, validating and saving the settings that
/// shape segmentation, export and playback lookups.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Word-to-cue segmentation settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Playback lookup settings
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// How word-level transcription results are grouped into cues
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Maximum words in a single cue
    #[serde(default = "default_max_words_per_cue")]
    pub max_words_per_cue: usize,

    /// A word starting later than this after the cue start opens a new cue
    #[serde(default = "default_max_cue_duration_secs")]
    pub max_cue_duration_secs: f64,

    /// Prefix cue text with `[speaker]` for non-default speakers
    #[serde(default = "default_true")]
    pub speaker_labels: bool,

    /// Speaker id that never gets a label
    #[serde(default = "default_speaker")]
    pub default_speaker: String,

    /// Keep audio events such as "(laughs)" as cue text
    #[serde(default)]
    pub include_audio_events: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_words_per_cue: default_max_words_per_cue(),
            max_cue_duration_secs: default_max_cue_duration_secs(),
            speaker_labels: true,
            default_speaker: default_speaker(),
            include_audio_events: false,
        }
    }
}

/// Export settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Formats written by the export command
    #[serde(default = "default_export_formats")]
    pub formats: Vec<SubtitleFormat>,

    /// Emit cue indexes as WebVTT cue identifiers
    #[serde(default = "default_true")]
    pub vtt_cue_identifiers: bool,

    /// Output directory; next to the original subtitle file when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing files
    #[serde(default)]
    pub force_overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            formats: default_export_formats(),
            vtt_cue_identifiers: true,
            output_dir: None,
            force_overwrite: false,
        }
    }
}

impl ExportConfig {
    /// Serializer options derived from these settings
    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            vtt_cue_identifiers: self.vtt_cue_identifiers,
        }
    }
}

/// Playback lookup settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Forward steps the lookup cursor may take before a binary search
    #[serde(default = "default_forward_scan_limit")]
    pub forward_scan_limit: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            forward_scan_limit: default_forward_scan_limit(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_words_per_cue() -> usize {
    8
}

fn default_max_cue_duration_secs() -> f64 {
    5.0
}

fn default_speaker() -> String {
    "speaker_0".to_string()
}

fn default_export_formats() -> Vec<SubtitleFormat> {
    SubtitleFormat::all().to_vec()
}

fn default_forward_scan_limit() -> usize {
    DEFAULT_FORWARD_SCAN_LIMIT
}

fn default_true() -> bool {
    true
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            segmentation: SegmentationConfig::default(),
            export: ExportConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.segmentation.max_words_per_cue == 0 {
            return Err(anyhow!("segmentation.max_words_per_cue must be at least 1"));
        }

        let duration = self.segmentation.max_cue_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(anyhow!(
                "segmentation.max_cue_duration_secs must be a positive number, got {}",
                duration
            ));
        }

        if self.export.formats.is_empty() {
            return Err(anyhow!("export.formats must name at least one format"));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration, writing the defaults first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}
