/*!
 * Tests for the application controller
 */

use std::path::PathBuf;
use anyhow::Result;
use subtimeline::app_config::Config;
use subtimeline::app_controller::{Controller, TrackSource};
use subtimeline::timeline::{AlignmentIssue, SubtitleFormat};
use crate::common;

/// Test that an invalid configuration is rejected
#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.segmentation.max_words_per_cue = 0;
    assert!(Controller::with_config(config).is_err());
}

/// Test parsing label=path arguments
#[test]
fn test_trackSource_fromStr_shouldSplitLabelAndPath() {
    let source: TrackSource = "fr=subs/movie_fr.srt".parse().unwrap();
    assert_eq!(source.label, "fr");
    assert_eq!(source.path, PathBuf::from("subs/movie_fr.srt"));

    let with_equals: TrackSource = "es=a=b.srt".parse().unwrap();
    assert_eq!(with_equals.path, PathBuf::from("a=b.srt"));

    assert!("movie_fr.srt".parse::<TrackSource>().is_err());
    assert!("=movie.srt".parse::<TrackSource>().is_err());
    assert!("fr=".parse::<TrackSource>().is_err());
    assert!("original=movie.srt".parse::<TrackSource>().is_err());
}

/// Test file statistics
#[test]
fn test_inspect_withOverlappingCues_shouldCountThem() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:05,000\nA\n\n2\n00:00:04,000 --> 00:00:06,000\nB\n\nbad\n\n3\n00:00:07,000 --> 00:00:08,000\nC\n";
    let path = common::create_test_file(temp_dir.path(), "overlap.srt", content)?;

    let controller = Controller::with_config(Config::default())?;
    let summary = controller.inspect(&path)?;

    assert_eq!(summary.format, SubtitleFormat::Srt);
    assert_eq!(summary.cue_count, 3);
    assert_eq!(summary.skipped_blocks, 1);
    assert_eq!(summary.first_start_ms, Some(1000));
    assert_eq!(summary.duration_ms, 8000);
    assert_eq!(summary.overlapping_pairs, 1);
    Ok(())
}

/// Test that WebVTT files are inspected too
#[test]
fn test_inspect_withVttFile_shouldDetectFormat() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.vtt", common::SAMPLE_VTT)?;

    let summary = Controller::with_config(Config::default())?.inspect(&path)?;

    assert_eq!(summary.format, SubtitleFormat::Vtt);
    assert_eq!(summary.cue_count, 3);
    assert_eq!(summary.duration_ms, 14_000);
    Ok(())
}

/// Test language-aware label resolution
#[test]
fn test_resolveLabel_withLanguageNames_shouldFindTrack() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_subtitle(dir, "movie.srt")?;
    let french = common::create_test_file(dir, "movie_fr.srt", common::SAMPLE_SRT_FR)?;

    let controller = Controller::with_config(Config::default())?;
    let session = controller.load_session(
        &original,
        &[TrackSource {
            label: "fr".to_string(),
            path: french,
        }],
    )?;

    assert_eq!(controller.resolve_label(&session.registry, "fr")?, "fr");
    assert_eq!(controller.resolve_label(&session.registry, "fre")?, "fr");
    assert_eq!(controller.resolve_label(&session.registry, "FRENCH")?, "fr");
    assert_eq!(controller.resolve_label(&session.registry, "original")?, "original");
    assert!(controller.resolve_label(&session.registry, "de").is_err());
    Ok(())
}

/// Test the alignment report for several translations
#[test]
fn test_checkAlignment_shouldReportEachTranslation() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_subtitle(dir, "movie.srt")?;
    let french = common::create_test_file(dir, "movie_fr.srt", common::SAMPLE_SRT_FR)?;
    let german = common::create_test_file(
        dir,
        "movie_de.srt",
        "1\n00:00:01,000 --> 00:00:04,000\nEins\n\n2\n00:00:05,000 --> 00:00:09,500\nZwei\n",
    )?;

    let controller = Controller::with_config(Config::default())?;
    let reports = controller.check_alignment(
        &original,
        &[
            TrackSource {
                label: "fr".to_string(),
                path: french,
            },
            TrackSource {
                label: "de".to_string(),
                path: german,
            },
        ],
    )?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].0, "fr");
    assert!(reports[0].1.is_aligned());
    assert_eq!(reports[1].0, "de");
    assert_eq!(
        reports[1].1.issues,
        vec![
            AlignmentIssue::CueCountMismatch { expected: 3, actual: 2 },
            AlignmentIssue::TimingMismatch {
                position: 1,
                index: 2,
                expected: (5000, 9000),
                actual: (5000, 9500),
            },
        ]
    );
    Ok(())
}

/// Test that a missing translation file is an error
#[test]
fn test_loadSession_withMissingFile_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let controller = Controller::with_config(Config::default())?;
    let result = controller.load_session(
        &original,
        &[TrackSource {
            label: "fr".to_string(),
            path: temp_dir.path().join("missing.srt"),
        }],
    );
    assert!(result.is_err());
    Ok(())
}
