//! Section manifest of the property guide.

use serde::{Deserialize, Serialize};

/// Subtitle used for sections without a known subtitle.
pub const DEFAULT_SUBTITLE: &str = "Blue Mountain Property Owners Association";

/// One entry of the document, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManifestEntry {
    /// A single fragment included verbatim (cover, table of contents)
    File { file: String, title: String },

    /// A numbered section preceded by a divider page
    Section {
        key: String,
        title: String,
        number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
}

impl ManifestEntry {
    /// Create a verbatim file entry.
    pub fn file(file: impl Into<String>, title: impl Into<String>) -> Self {
        ManifestEntry::File {
            file: file.into(),
            title: title.into(),
        }
    }

    /// Create a numbered section entry.
    pub fn section(
        key: impl Into<String>,
        title: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        ManifestEntry::Section {
            key: key.into(),
            title: title.into(),
            number: number.into(),
            subtitle: None,
        }
    }

    /// Set the divider subtitle of a section entry.
    pub fn with_subtitle(mut self, text: impl Into<String>) -> Self {
        if let ManifestEntry::Section { subtitle, .. } = &mut self {
            *subtitle = Some(text.into());
        }
        self
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        match self {
            ManifestEntry::File { title, .. } | ManifestEntry::Section { title, .. } => title,
        }
    }

    /// Divider subtitle. Falls back to the built-in subtitle for the key.
    pub fn subtitle(&self) -> Option<&str> {
        match self {
            ManifestEntry::File { .. } => None,
            ManifestEntry::Section { key, subtitle, .. } => {
                Some(subtitle.as_deref().unwrap_or_else(|| default_subtitle(key)))
            }
        }
    }
}

/// Built-in divider subtitle for a section key.
pub fn default_subtitle(key: &str) -> &'static str {
    match key {
        "governance" => "Board Structure, Meetings & Construction Requirements",
        "community" => "History, Residents & Natural Beauty",
        "wood-chipping" => "Annual Chipping & Fire Mitigation Program",
        "fire-safety" => "Wildfire Preparedness & Emergency Planning",
        "services" => "Roads, Refuse Collection & Local Amenities",
        "deer-lake" => "Recreation Area Access & Guidelines",
        "lodge" => "Lodge Rental Information & Usage Guidelines",
        "communication" => "Social Events & Community Resources",
        "contacts" => "Emergency Numbers & Contact Directory",
        _ => DEFAULT_SUBTITLE,
    }
}

/// The property guide: cover, table of contents, sections I to IX.
pub fn default_manifest() -> Vec<ManifestEntry> {
    vec![
        ManifestEntry::file("cover.html", "Cover Page"),
        ManifestEntry::file("toc.html", "Table of Contents"),
        ManifestEntry::section("governance", "Governance & Structure", "I"),
        ManifestEntry::section("community", "A Mountain Home", "II"),
        ManifestEntry::section("wood-chipping", "Wood-Chipping Program", "III"),
        ManifestEntry::section(
            "fire-safety",
            "Fire Safety & Emergency Preparedness",
            "IV",
        ),
        ManifestEntry::section("services", "Community Services & Amenities", "V"),
        ManifestEntry::section("deer-lake", "Deer Lake Recreation Area", "VI"),
        ManifestEntry::section("lodge", "The Lodge", "VII"),
        ManifestEntry::section("communication", "Community Communication", "VIII"),
        ManifestEntry::section("contacts", "Contacts & Resources", "IX"),
    ]
}
