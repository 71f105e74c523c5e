//! Report construction from a detected save file.

use std::ops::RangeInclusive;
use std::path::Path;

use super::{format_size_mb, Extractor, GameMode, Report, SaveMeta, GAME_VERSION};
use crate::error::ExtractionError;

/// Builds a [`Report`] for each detected save file.
///
/// Holds the per-process constants (camp id, uploader id) so every report of
/// one agent run carries the same grouping key.
pub struct ReportBuilder<E> {
    extractor: E,
    camp_id: String,
    uploader_id: String,
    stat_range: RangeInclusive<u8>,
}

impl<E: Extractor> ReportBuilder<E> {
    /// Create a builder around an extractor.
    pub fn new(
        extractor: E,
        camp_id: impl Into<String>,
        uploader_id: impl Into<String>,
        stat_range: RangeInclusive<u8>,
    ) -> Self {
        Self {
            extractor,
            camp_id: camp_id.into(),
            uploader_id: uploader_id.into(),
            stat_range,
        }
    }

    /// Build a report for the file at `path`.
    ///
    /// Reads the file size from metadata only; contents are left to the
    /// extractor. Returns either a fully valid report or an error, never a
    /// partial value. The sink assigns the creation timestamp on write.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read, the path has no file
    /// name, or the extractor output violates the report invariants.
    pub fn build(&self, path: &Path) -> Result<Report, ExtractionError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| ExtractionError::MissingFileName {
                path: path.display().to_string(),
            })?;

        let metadata = std::fs::metadata(path).map_err(|e| ExtractionError::Metadata {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let extraction = self.extractor.extract(path)?;

        if !extraction.stats.all_within(&self.stat_range) {
            return Err(ExtractionError::invalid_output(
                path.display().to_string(),
                format!(
                    "ability score outside {}..={}",
                    self.stat_range.start(),
                    self.stat_range.end()
                ),
            ));
        }

        if extraction.companions.is_empty() {
            return Err(ExtractionError::invalid_output(
                path.display().to_string(),
                "no companions",
            ));
        }

        if extraction.logs.is_empty() {
            return Err(ExtractionError::invalid_output(
                path.display().to_string(),
                "no extraction logs",
            ));
        }

        let meta = SaveMeta {
            mode: GameMode::from_file_name(&filename),
            version: GAME_VERSION.to_string(),
            size: format_size_mb(metadata.len()),
        };

        Ok(Report {
            filename,
            stats: extraction.stats,
            meta,
            companions: extraction.companions,
            logs: extraction.logs,
            uploader: self.uploader_id.clone(),
            camp_id: self.camp_id.clone(),
        })
    }
}
