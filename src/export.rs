/*!
 * Writing tracks to disk and finding translations next to an original.
 *
 * Files are named after the original subtitle: `movie.srt` for the original
 * track and `movie_<label>.srt` for each translation, in every configured
 * format.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::app_config::ExportConfig;
use crate::file_utils::FileManager;
use crate::timeline::registry::{ORIGINAL_LABEL, TrackRegistry};
use crate::timeline::serializer::SubtitleFormat;

/// File name for one track in one format
pub fn export_file_name(base: &str, label: &str, format: SubtitleFormat) -> String {
    if label == ORIGINAL_LABEL {
        format!("{}.{}", base, format.extension())
    } else {
        format!("{}_{}.{}", base, sanitize_label(label), format.extension())
    }
}

/// File stem used as the export base name
pub fn base_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtitles".to_string())
}

// Keep labels file-system safe
fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// A translation file found next to the original
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTrack {
    pub label: String,
    pub path: PathBuf,
}

/// Find `<stem>_<label>.srt|vtt` siblings of `original`.
/// When a label exists in both formats the SRT file is used.
pub fn discover_translations<P: AsRef<Path>>(original: P) -> Result<Vec<DiscoveredTrack>> {
    let original = original.as_ref();
    let dir = match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = format!("{}_", base_name(original));

    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    // SRT last so it wins over VTT for the same label
    for format in [SubtitleFormat::Vtt, SubtitleFormat::Srt] {
        for path in FileManager::find_files(&dir, format.extension())? {
            let stem = base_name(&path);
            if let Some(label) = stem.strip_prefix(&prefix) {
                if !label.is_empty() && label != ORIGINAL_LABEL {
                    found.insert(label.to_string(), path);
                }
            }
        }
    }

    debug!("Discovered {} translation file(s) for {:?}", found.len(), original);
    Ok(found
        .into_iter()
        .map(|(label, path)| DiscoveredTrack { label, path })
        .collect())
}

/// Writes every track of a registry in the configured formats
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Write all tracks; returns the files written. Existing files are kept
    /// unless `force_overwrite` is set.
    pub fn write_all(&self, registry: &TrackRegistry, base: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
        FileManager::ensure_dir(out_dir)?;
        let options = self.config.serialize_options();
        let mut written = Vec::new();

        for label in registry.labels() {
            if registry.is_aligned(label) == Some(false) {
                warn!("Exporting track '{}' although it is not aligned with the original", label);
            }

            for &format in &self.config.formats {
                let path = out_dir.join(export_file_name(base, label, format));
                if path.exists() && !self.config.force_overwrite {
                    warn!("Output file already exists: {:?}. Use -f to force overwrite.", path);
                    continue;
                }

                let content = registry
                    .export_with(label, format, &options)
                    .with_context(|| format!("Failed to export track '{}'", label))?;
                FileManager::write_to_file(&path, &content)?;
                info!("Wrote {:?}", path);
                written.push(path);
            }
        }

        Ok(written)
    }
}
