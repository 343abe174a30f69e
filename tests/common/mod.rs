/*!
 * Common test utilities for the subtimeline test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use subtimeline::timeline::Cue;

/// Three back-to-back cues in SRT
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Same timings as `SAMPLE_SRT`, in French
pub const SAMPLE_SRT_FR: &str = "1
00:00:01,000 --> 00:00:04,000
Ceci est un sous-titre de test.

2
00:00:05,000 --> 00:00:09,000
Il contient plusieurs entrées.

3
00:00:10,000 --> 00:00:14,000
Pour les tests.
";

/// Same cues as `SAMPLE_SRT` in WebVTT, with a note and cue settings
pub const SAMPLE_VTT: &str = "WEBVTT - sample

NOTE generated for tests

1
00:00:01.000 --> 00:00:04.000 align:start
This is a test subtitle.

2
00:00:05.000 --> 00:00:09.000
It contains multiple entries.

00:10.000 --> 00:14.000
For testing purposes.
";

/// Routes library log output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample SRT subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Shorthand for building a cue
pub fn cue(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Cue {
    Cue::new(index, start_ms, end_ms, text)
}

/// Reference lookup: earliest start, then lowest index, among covering cues
pub fn linear_active_at(cues: &[Cue], t: f64) -> Option<&Cue> {
    cues.iter()
        .filter(|cue| cue.contains(t))
        .min_by(|a, b| a.start_ms.cmp(&b.start_ms).then(a.index.cmp(&b.index)))
}
