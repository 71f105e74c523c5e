//! The report data model and its construction.
//!
//! A [`Report`] describes one detected save file and is the unit of delivery
//! to the remote sink. Reports are produced by a [`ReportBuilder`] invoking a
//! pluggable [`Extractor`], so the pipeline stays testable independent of any
//! real save-file parser.

mod builder;
mod extractor;

pub use builder::ReportBuilder;
pub use extractor::{Extraction, Extractor, MockExtractor};

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Game version reported for every save until a real parser reads it out of
/// the file header.
pub const GAME_VERSION: &str = "4.1.1.3622274";

/// File-name marker selecting Honour Mode. Case-sensitive.
pub const HONOUR_MARKER: &str = "Honour";

/// Sink-assigned identifier of a delivered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six ability scores extracted from a save.
///
/// Modeled as a struct so the six-key shape holds by construction; only the
/// value ranges need runtime validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR")]
    pub strength: u8,
    #[serde(rename = "DEX")]
    pub dexterity: u8,
    #[serde(rename = "CON")]
    pub constitution: u8,
    #[serde(rename = "INT")]
    pub intelligence: u8,
    #[serde(rename = "WIS")]
    pub wisdom: u8,
    #[serde(rename = "CHA")]
    pub charisma: u8,
}

impl AbilityScores {
    /// All six values in declaration order.
    #[must_use]
    pub const fn values(&self) -> [u8; 6] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
    }

    /// Whether every score falls inside `range`.
    #[must_use]
    pub fn all_within(&self, range: &RangeInclusive<u8>) -> bool {
        self.values().iter().all(|v| range.contains(v))
    }
}

/// Difficulty mode, derived from the save file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "Honour Mode")]
    HonourMode,
    #[serde(rename = "Tactician")]
    Tactician,
}

impl GameMode {
    /// Derive the mode from a file name. The marker match is case-sensitive.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        if name.contains(HONOUR_MARKER) {
            Self::HonourMode
        } else {
            Self::Tactician
        }
    }

    /// The sink-facing label for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HonourMode => "Honour Mode",
            Self::Tactician => "Tactician",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Save metadata attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMeta {
    /// Difficulty mode.
    pub mode: GameMode,
    /// Game version string.
    pub version: String,
    /// Human-readable file size, e.g. `"1.0 MB"`.
    pub size: String,
}

/// A party companion found in the save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    /// Companion name.
    pub name: String,
    /// Display glyph.
    pub glyph: String,
}

impl Companion {
    /// Create a companion entry.
    pub fn new(name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyph: glyph.into(),
        }
    }
}

/// The structured record describing one detected save file.
///
/// There is deliberately no `createdAt` field: the sink assigns the write
/// timestamp, and the agent never stamps local wall-clock time into a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Base name of the source file.
    pub filename: String,
    /// The six ability scores.
    pub stats: AbilityScores,
    /// Save metadata.
    pub meta: SaveMeta,
    /// Party companions, order-preserving.
    pub companions: Vec<Companion>,
    /// Extraction diagnostics, order-preserving.
    pub logs: Vec<String>,
    /// Identifier of the agent instance that produced this report.
    pub uploader: String,
    /// Operator-supplied grouping key.
    pub camp_id: String,
}

/// Format a byte count as a megabyte string, rounded to two decimals with
/// trailing zeros trimmed down to one decimal (`1_048_576` → `"1.0 MB"`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size_mb(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    let rounded = (mb * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    if text.ends_with('0') {
        text.truncate(text.len() - 1);
    }
    format!("{text} MB")
}
