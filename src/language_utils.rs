/*!
 * Language helpers for track labels.
 *
 * Translation tracks are labelled by whatever the translation collaborator
 * hands back: an ISO 639-1 code ("fr"), an ISO 639-2 code ("fra", "fre") or
 * an English language name ("French"). These helpers let the host compare
 * and display such labels without the registry caring about the spelling.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

use crate::timeline::ORIGINAL_LABEL;

// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(mapped)
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some(part2t) = bibliographic_to_terminology(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Resolve a track label to a language, accepting ISO codes and English names
pub fn resolve_language(label: &str) -> Option<Language> {
    if let Ok(part2t) = normalize_to_part2t(label) {
        return Language::from_639_3(&part2t);
    }

    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => return None,
    };
    Language::from_name(&capitalized)
}

/// Check if two track labels denote the same track.
///
/// Exact matches always win; otherwise both labels must resolve to the same
/// language ("fr", "fre" and "French" all match each other).
pub fn labels_match(label1: &str, label2: &str) -> bool {
    if label1.trim().eq_ignore_ascii_case(label2.trim()) {
        return true;
    }
    match (resolve_language(label1), resolve_language(label2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Human-readable name for a track label, used by the language switcher
pub fn display_label(label: &str) -> String {
    if label == ORIGINAL_LABEL {
        return "Original".to_string();
    }
    match resolve_language(label) {
        Some(lang) => lang.to_name().to_string(),
        None => label.to_string(),
    }
}
