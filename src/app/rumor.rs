//! The rumor record and its wire representation.
//!
//! Field names are the stable contract the web UI and the snapshot document
//! both depend on: `id`, `title`, `text_nl`, `text_en`, `people`, `active`,
//! `max_prints`, `printed_count`. Every field defaults when absent so older
//! snapshot documents (or ones written by a newer firmware) still load.

use serde::{Deserialize, Serialize};

/// Print quota assigned when a rumor is created or loaded without one.
pub const DEFAULT_MAX_PRINTS: u16 = 5;

fn default_active() -> bool {
    true
}

fn default_quota() -> u16 {
    DEFAULT_MAX_PRINTS
}

/// A storable text record with activation and print-quota state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rumor {
    /// Unique positive id, assigned monotonically, never reused while the
    /// process lives.
    #[serde(default)]
    pub id: u32,
    /// Display label; may be empty.
    #[serde(default)]
    pub title: String,
    /// Dutch payload, printed first.
    #[serde(default)]
    pub text_nl: String,
    /// English payload, printed second.
    #[serde(default)]
    pub text_en: String,
    /// Comma-separated free-text tags used for substring filtering.
    #[serde(default)]
    pub people: String,
    /// Inactive rumors are never eligible for selection.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Maximum number of times this rumor may be selected. Always >= 1.
    #[serde(default = "default_quota")]
    pub max_prints: u16,
    /// Times this rumor has been selected. Only an explicit reset lowers it.
    #[serde(default)]
    pub printed_count: u16,
}

impl Rumor {
    /// Active and under quota.
    pub fn eligible(&self) -> bool {
        self.active && self.printed_count < self.max_prints
    }

    /// Whether any single tag in `people` contains `needle`.
    ///
    /// Tags are split on commas and trimmed; the match is a case-insensitive
    /// substring check per tag. An empty needle matches everything.
    pub fn matches_filter(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.people
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Quota values below 1 are clamped up on every write path.
pub fn clamp_quota(max_prints: u16) -> u16 {
    max_prints.max(1)
}

// ---------------------------------------------------------------------------
// Create / update inputs
// ---------------------------------------------------------------------------

/// Creation input. All core fields are required — serde rejects a partial
/// document, which the façade reports as invalid input.
#[derive(Debug, Clone, Deserialize)]
pub struct RumorDraft {
    pub title: String,
    pub text_nl: String,
    pub text_en: String,
    pub people: String,
    pub active: bool,
    /// Optional; falls back to the configured default quota.
    pub max_prints: Option<u16>,
}

impl RumorDraft {
    /// Materialise the draft under a freshly assigned id.
    pub fn into_rumor(self, id: u32, default_max_prints: u16) -> Rumor {
        Rumor {
            id,
            title: self.title,
            text_nl: self.text_nl,
            text_en: self.text_en,
            people: self.people,
            active: self.active,
            max_prints: clamp_quota(self.max_prints.unwrap_or(default_max_prints)),
            printed_count: 0,
        }
    }
}

/// Partial update input. Supplied fields are merged onto the existing rumor;
/// everything else is left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RumorPatch {
    pub title: Option<String>,
    pub text_nl: Option<String>,
    pub text_en: Option<String>,
    pub people: Option<String>,
    pub active: Option<bool>,
    pub max_prints: Option<u16>,
}

impl RumorPatch {
    /// Merge this patch onto `rumor`.
    pub fn apply(self, rumor: &mut Rumor) {
        if let Some(title) = self.title {
            rumor.title = title;
        }
        if let Some(text_nl) = self.text_nl {
            rumor.text_nl = text_nl;
        }
        if let Some(text_en) = self.text_en {
            rumor.text_en = text_en;
        }
        if let Some(people) = self.people {
            rumor.people = people;
        }
        if let Some(active) = self.active {
            rumor.active = active;
        }
        if let Some(max_prints) = self.max_prints {
            rumor.max_prints = clamp_quota(max_prints);
        }
    }
}
