// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use subtimeline::app_config::{Config, LogLevel};
use subtimeline::app_controller::{Controller, TrackSource};
use subtimeline::language_utils;
use subtimeline::timeline::cue::ms_to_seconds;
use subtimeline::timeline::parser::parse_timestamp;
use subtimeline::timeline::serializer::{SubtitleFormat, format_timestamp};

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Vtt,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Srt => SubtitleFormat::Srt,
            CliFormat::Vtt => SubtitleFormat::Vtt,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a subtitle file and print statistics
    Inspect {
        /// SRT or WebVTT file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the cue showing at a given time
    At {
        /// Original subtitle file
        original: PathBuf,

        /// Playback position, in seconds or as HH:MM:SS,mmm
        #[arg(value_parser = parse_time_arg)]
        time: f64,

        /// Translation track as label=path (repeatable)
        #[arg(short = 't', long = "translation")]
        translations: Vec<TrackSource>,

        /// Track to look up (label, ISO code or language name)
        #[arg(long)]
        select: Option<String>,
    },

    /// Simulate playback and print every cue change
    Play {
        /// Original subtitle file
        original: PathBuf,

        /// Translation track as label=path (repeatable)
        #[arg(short = 't', long = "translation")]
        translations: Vec<TrackSource>,

        /// Track to play (label, ISO code or language name)
        #[arg(long)]
        select: Option<String>,

        /// Start position
        #[arg(long, default_value = "0", value_parser = parse_time_arg)]
        from: f64,

        /// End position (defaults to the end of the track)
        #[arg(long, value_parser = parse_time_arg)]
        to: Option<f64>,

        /// Seconds between playback ticks
        #[arg(long, default_value_t = 0.25)]
        step: f64,
    },

    /// Check that translations line up with the original
    Check {
        /// Original subtitle file
        original: PathBuf,

        /// Translation tracks as label=path
        #[arg(required = true)]
        translations: Vec<TrackSource>,
    },

    /// Convert between SRT and WebVTT
    Convert {
        /// Input subtitle file
        input: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: CliFormat,

        /// Output file (defaults to the input with the new extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Build subtitles from a word-level transcription JSON file
    Segment {
        /// Transcription JSON with a "words" array
        words: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "srt")]
        format: CliFormat,

        /// Output file (defaults to the input with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Write the original and all translations in every configured format
    Export {
        /// Original subtitle file
        original: PathBuf,

        /// Translation track as label=path (repeatable)
        #[arg(short = 't', long = "translation")]
        translations: Vec<TrackSource>,

        /// Also pick up <name>_<label>.srt/.vtt files next to the original
        #[arg(long)]
        discover: bool,

        /// Output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Formats to write (repeatable, overrides the config)
        #[arg(long = "format", value_enum)]
        formats: Vec<CliFormat>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate shell completions for subtimeline
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtimeline - subtitle timeline engine
///
/// Parses generated subtitles and their translations, answers "what is on
/// screen at time t" and exports SRT/WebVTT files.
#[derive(Parser, Debug)]
#[command(name = "subtimeline")]
#[command(version)]
#[command(about = "Subtitle timeline engine: playback lookup, alignment checks and export")]
#[command(long_about = "subtimeline loads an original subtitle track plus any number of translations,
resolves the cue showing at any playback position and exports SRT/WebVTT files.

EXAMPLES:
    subtimeline inspect movie.srt
    subtimeline at movie.srt 00:01:02,500 -t fr=movie_fr.srt --select French
    subtimeline play movie.srt --from 60 --to 90 --step 0.1
    subtimeline check movie.srt fr=movie_fr.srt es=movie_es.srt
    subtimeline convert movie.srt --to vtt
    subtimeline segment transcription.json --format vtt
    subtimeline export movie.srt --discover --out-dir out/
    subtimeline completions bash > subtimeline.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering is left to log::max_level so it can be changed later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subtimeline", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    run(cli.command, config)
}

fn run(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Inspect { file, json } => {
            let controller = Controller::with_config(config)?;
            let summary = controller.inspect(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("File:      {}", file.display());
                println!("Format:    {}", summary.format);
                println!("Cues:      {}", summary.cue_count);
                println!("Skipped:   {}", summary.skipped_blocks);
                println!("Overlaps:  {}", summary.overlapping_pairs);
                println!("Duration:  {}", format_timestamp(summary.duration_ms, SubtitleFormat::Srt));
            }
        }

        Commands::At { original, time, translations, select } => {
            let controller = Controller::with_config(config)?;
            let mut session = controller.load_session(&original, &translations)?;
            report_session_problems(&session.errors);

            match controller.active_cue(&mut session.registry, select.as_deref(), time)? {
                Some(cue) => print!("{}", cue),
                None => info!("No subtitle at {}s", time),
            }
        }

        Commands::Play { original, translations, select, from, to, step } => {
            let controller = Controller::with_config(config)?;
            let mut session = controller.load_session(&original, &translations)?;
            report_session_problems(&session.errors);

            if let Some(query) = select.as_deref() {
                let label = controller.resolve_label(&session.registry, query)?;
                session.registry.select_track(&label)?;
            }
            let label = session.registry.active_label().unwrap_or("-").to_string();
            let end = match to {
                Some(to) => to,
                None => session
                    .registry
                    .active_track()
                    .map(|track| ms_to_seconds(track.index().duration_ms()))
                    .unwrap_or(from),
            };

            let summary = controller.simulate_playback(&session.registry, from, end, step)?;
            info!("Playing '{}' ({})", label, language_utils::display_label(&label));
            for transition in &summary.transitions {
                match transition.cue_index {
                    Some(index) => println!("{:>10.3}s  cue {}", transition.at, index),
                    None => println!("{:>10.3}s  -", transition.at),
                }
            }
            info!(
                "{} ticks, {} cursor hits, {} binary searches, {} probes",
                summary.ticks, summary.stats.cursor_hits, summary.stats.binary_searches, summary.stats.probes
            );
        }

        Commands::Check { original, translations } => {
            let controller = Controller::with_config(config)?;
            let reports = controller.check_alignment(&original, &translations)?;
            let mut misaligned = 0;
            for (label, report) in &reports {
                if report.is_aligned() {
                    println!("{}: aligned", label);
                    continue;
                }
                misaligned += 1;
                println!("{}: {} issue(s)", label, report.issues.len());
                for issue in &report.issues {
                    println!("  - {}", issue);
                }
            }
            if misaligned > 0 {
                return Err(anyhow!("{} of {} track(s) are not aligned", misaligned, reports.len()));
            }
        }

        Commands::Convert { input, to, output, force_overwrite } => {
            config.export.force_overwrite |= force_overwrite;
            let controller = Controller::with_config(config)?;
            let written = controller.convert(&input, to.into(), output.as_deref())?;
            info!("Success: {:?}", written);
        }

        Commands::Segment { words, format, output, force_overwrite } => {
            config.export.force_overwrite |= force_overwrite;
            let controller = Controller::with_config(config)?;
            let (cues, written) = controller.segment(&words, format.into(), output.as_deref())?;
            info!("Success: {} cues written to {:?}", cues.len(), written);
        }

        Commands::Export { original, translations, discover, out_dir, formats, force_overwrite } => {
            config.export.force_overwrite |= force_overwrite;
            if !formats.is_empty() {
                config.export.formats = formats.into_iter().map(SubtitleFormat::from).collect();
            }
            let controller = Controller::with_config(config)?;
            let written = controller.export(&original, &translations, discover, out_dir.as_deref())?;
            if written.is_empty() {
                warn!("Nothing written");
            }
            for path in written {
                println!("{}", path.display());
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn report_session_problems(errors: &[subtimeline::TimelineError]) {
    for problem in errors {
        error!("{}", problem);
    }
}

// Seconds ("62.5") or a timestamp ("00:01:02,500")
fn parse_time_arg(value: &str) -> Result<f64, String> {
    if let Ok(seconds) = value.trim().parse::<f64>() {
        if seconds.is_finite() && seconds >= 0.0 {
            return Ok(seconds);
        }
        return Err(format!("invalid time: {}", value));
    }
    parse_timestamp(value)
        .map(ms_to_seconds)
        .map_err(|e| e.to_string())
}
