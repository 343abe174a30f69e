/*!
 * Tests for language label utilities
 */

use subtimeline::language_utils::{
    display_label, labels_match, normalize_to_part2t, resolve_language,
};
use isolang::Language;

/// Test normalization to ISO 639-2/T
#[test]
fn test_normalizeToPart2t_shouldMapAllForms() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("spa").unwrap(), "spa");
    assert!(normalize_to_part2t("zz").is_err());
}

/// Test label comparison across codes and names
#[test]
fn test_labelsMatch_withCodesAndNames_shouldMatchSameLanguage() {
    assert!(labels_match("fr", "French"));
    assert!(labels_match("french", "fra"));
    assert!(labels_match("custom-track", "CUSTOM-TRACK"));
    assert!(!labels_match("fr", "German"));
    assert!(!labels_match("custom-track", "fr"));
}

/// Test resolving codes and English names to a language
#[test]
fn test_resolveLanguage_withCodesAndNames_shouldFindLanguage() {
    assert_eq!(resolve_language("es"), Some(Language::Spa));
    assert_eq!(resolve_language("ger"), Some(Language::Deu));
    assert_eq!(resolve_language(" german "), Some(Language::Deu));
    assert_eq!(resolve_language("qq"), None);
    assert_eq!(resolve_language(""), None);
}

/// Test labels shown in the language switcher
#[test]
fn test_displayLabel_shouldNameKnownLanguages() {
    assert_eq!(display_label("original"), "Original");
    assert_eq!(display_label("ja"), "Japanese");
    assert_eq!(display_label("my-label"), "my-label");
}
