/*!
 * Integration tests for writing subtitles to disk
 */

use anyhow::Result;
use subtimeline::app_config::Config;
use subtimeline::app_controller::{Controller, TrackSource};
use subtimeline::file_utils::FileManager;
use subtimeline::timeline::{SubtitleFormat, parse};
use crate::common;

/// Test converting SRT to WebVTT and back
#[test]
fn test_convert_srtToVttAndBack_shouldPreserveCues() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let srt = common::create_test_subtitle(dir, "movie.srt")?;

    let controller = Controller::with_config(Config::default())?;
    let vtt = controller.convert(&srt, SubtitleFormat::Vtt, None)?;

    assert_eq!(vtt, dir.join("movie.vtt"));
    let vtt_text = FileManager::read_to_string(&vtt)?;
    assert!(vtt_text.starts_with("WEBVTT\n\n"));
    assert!(vtt_text.contains("00:00:05.000 --> 00:00:09.000"));

    let back = controller.convert(&vtt, SubtitleFormat::Srt, Some(&dir.join("back.srt")))?;
    assert_eq!(FileManager::read_to_string(back)?, common::SAMPLE_SRT);
    Ok(())
}

/// Test that convert refuses to clobber files
#[test]
fn test_convert_withExistingOutput_shouldRequireForce() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let srt = common::create_test_subtitle(dir, "movie.srt")?;
    common::create_test_file(dir, "movie.vtt", "old")?;

    let controller = Controller::with_config(Config::default())?;
    assert!(controller.convert(&srt, SubtitleFormat::Vtt, None).is_err());
    assert!(controller.convert(&srt, SubtitleFormat::Srt, None).is_err());

    let mut config = Config::default();
    config.export.force_overwrite = true;
    let controller = Controller::with_config(config)?;
    controller.convert(&srt, SubtitleFormat::Vtt, None)?;
    assert_ne!(FileManager::read_to_string(dir.join("movie.vtt"))?, "old");
    Ok(())
}

/// Test that a document without cues is not converted
#[test]
fn test_convert_withNoCues_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let empty = common::create_test_file(temp_dir.path(), "empty.srt", "\n\n")?;

    let controller = Controller::with_config(Config::default())?;
    assert!(controller.convert(&empty, SubtitleFormat::Vtt, None).is_err());
    Ok(())
}

/// Test segmenting a transcription file into subtitles
#[test]
fn test_segment_withTranscriptionFile_shouldWriteSubtitles() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let json = r#"{
        "language_code": "en",
        "words": [
            {"text": "Good", "start": 0.0, "end": 0.3, "type": "word", "speaker_id": "speaker_0"},
            {"text": "morning", "start": 0.4, "end": 0.9, "type": "word", "speaker_id": "speaker_0"},
            {"text": "Hi", "start": 1.2, "end": 1.5, "type": "word", "speaker_id": "speaker_1"}
        ]
    }"#;
    let words = common::create_test_file(temp_dir.path(), "interview.json", json)?;

    let controller = Controller::with_config(Config::default())?;
    let (cues, written) = controller.segment(&words, SubtitleFormat::Srt, None)?;

    assert_eq!(written, temp_dir.path().join("interview.srt"));
    assert_eq!(cues.len(), 2);
    assert_eq!(
        FileManager::read_to_string(&written)?,
        "1\n00:00:00,000 --> 00:00:00,900\nGood morning\n\n2\n00:00:01,200 --> 00:00:01,500\n[speaker_1] Hi\n"
    );
    Ok(())
}

/// Test exporting a session with discovered translations
#[test]
fn test_export_withDiscovery_shouldWriteEveryTrack() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_subtitle(dir, "movie.srt")?;
    common::create_test_file(dir, "movie_fr.srt", common::SAMPLE_SRT_FR)?;
    let spanish = common::create_test_file(dir, "spanish.srt", common::SAMPLE_SRT_FR)?;
    let out_dir = dir.join("export");

    let controller = Controller::with_config(Config::default())?;
    let written = controller.export(
        &original,
        &[TrackSource {
            label: "es".to_string(),
            path: spanish,
        }],
        true,
        Some(&out_dir),
    )?;

    assert_eq!(written.len(), 6);
    for name in ["movie.srt", "movie.vtt", "movie_es.srt", "movie_es.vtt", "movie_fr.srt", "movie_fr.vtt"] {
        assert!(out_dir.join(name).is_file(), "missing {}", name);
    }
    let french = parse(&FileManager::read_to_string(out_dir.join("movie_fr.vtt"))?);
    assert_eq!(french, parse(common::SAMPLE_SRT_FR));
    Ok(())
}

/// Test that configured formats and identifiers are honoured
#[test]
fn test_export_withVttOnlyConfig_shouldWriteVttWithoutIdentifiers() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_subtitle(dir, "movie.srt")?;

    let mut config = Config::default();
    config.export.formats = vec![SubtitleFormat::Vtt];
    config.export.vtt_cue_identifiers = false;
    config.export.output_dir = Some(dir.join("configured"));

    let controller = Controller::with_config(config)?;
    let written = controller.export(&original, &[], false, None)?;

    assert_eq!(written, vec![dir.join("configured").join("movie.vtt")]);
    let text = FileManager::read_to_string(&written[0])?;
    assert!(text.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\n"));
    Ok(())
}
