/*!
 * Tests for the cue data model
 */

use subtimeline::errors::TimelineError;
use subtimeline::timeline::Cue;
use subtimeline::timeline::cue::{ms_to_seconds, seconds_to_ms};

/// Test that both interval ends count as covered
#[test]
fn test_contains_atBoundaries_shouldBeInclusive() {
    let cue = Cue::new(1, 1000, 3500, "Hello world");

    assert!(cue.contains(1.0));
    assert!(cue.contains(3.5));
    assert!(cue.contains(2.0));
    assert!(!cue.contains(0.999));
    assert!(!cue.contains(3.501));
}

/// Test that seconds accessors agree with the millisecond fields
#[test]
fn test_startEnd_shouldConvertMillisToSeconds() {
    let cue = Cue::new(7, 61_001, 62_250, "x");

    assert_eq!(cue.start(), 61.001);
    assert_eq!(cue.end(), 62.25);
    assert_eq!(cue.duration_ms(), 1249);
}

/// Test that validated construction rejects index 0
#[test]
fn test_newValidated_withZeroIndex_shouldFail() {
    let result = Cue::new_validated(0, 0, 1000, "x");
    assert!(matches!(result, Err(TimelineError::InvalidCue { index: 0, .. })));
}

/// Test that validated construction rejects empty and inverted intervals
#[test]
fn test_newValidated_withEndNotAfterStart_shouldFail() {
    assert!(Cue::new_validated(1, 1000, 1000, "x").is_err());
    assert!(Cue::new_validated(1, 2000, 1000, "x").is_err());
    assert!(Cue::new_validated(1, 1000, 1001, "x").is_ok());
}

/// Test construction from seconds
#[test]
fn test_fromSeconds_withValidTimes_shouldRoundToMillis() {
    let cue = Cue::from_seconds(3, 1.25, 4.0, "Third").unwrap();
    assert_eq!(cue.start_ms, 1250);
    assert_eq!(cue.end_ms, 4000);
    assert_eq!(cue.text, "Third");
}

/// Test that negative or non-finite times are rejected
#[test]
fn test_fromSeconds_withNegativeStart_shouldFail() {
    assert!(Cue::from_seconds(1, -1.0, 2.0, "x").is_err());
    assert!(Cue::from_seconds(1, 0.0, f64::NAN, "x").is_err());
}

/// Test seconds/millis conversions
#[test]
fn test_secondsToMs_shouldRoundAndRejectInvalid() {
    assert_eq!(seconds_to_ms(3.5), Some(3500));
    assert_eq!(seconds_to_ms(0.0), Some(0));
    assert_eq!(seconds_to_ms(-0.5), None);
    assert_eq!(seconds_to_ms(f64::INFINITY), None);
    assert_eq!(ms_to_seconds(1001), 1.001);
}

/// Test that times too large for millisecond storage are rejected as invalid
#[test]
fn test_fromSeconds_withOutOfRangeTimes_shouldReportInvalidStart() {
    assert_eq!(seconds_to_ms(1e20), None);
    assert_eq!(seconds_to_ms(1.8e16), Some(18_000_000_000_000_000_000));

    let result = Cue::from_seconds(1, 1e20, 2e20, "x");
    match result {
        Err(TimelineError::InvalidCue { index, reason }) => {
            assert_eq!(index, 1);
            assert!(reason.starts_with("invalid start time"), "{}", reason);
        }
        other => panic!("expected InvalidCue, got {:?}", other),
    }
}

/// Test that timing comparison ignores text
#[test]
fn test_sameTiming_withDifferentText_shouldMatch() {
    let original = Cue::new(1, 1000, 2000, "Hello");
    let translated = Cue::new(1, 1000, 2000, "Bonjour");
    let shifted = Cue::new(1, 1000, 2100, "Hello");

    assert!(original.same_timing(&translated));
    assert!(!original.same_timing(&shifted));
}

/// Test that Display renders an SRT block
#[test]
fn test_display_shouldRenderSrtBlock() {
    let cue = Cue::new(2, 4000, 6000, "Second line\nwith two lines");
    assert_eq!(
        cue.to_string(),
        "2\n00:00:04,000 --> 00:00:06,000\nSecond line\nwith two lines\n"
    );
    assert_eq!(cue.lines().count(), 2);
}
