use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The display representation of a chat response.
///
/// Produced by [`crate::classify::classify`] and consumed by
/// [`crate::render`]. Values inside tables are kept as raw JSON so nothing is
/// coerced on the way through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotContent {
    /// Plain text, shown verbatim.
    Text { text: String },
    /// A single `Platform | Hours` table.
    Hours { rows: Vec<HoursRow> },
    /// One titled `Platform | Hours` table per feature.
    Features { sections: Vec<FeatureSection> },
}

impl BotContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The plain text, if this is a text response.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// One row of an hours table, derived from a key containing `"hours"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursRow {
    /// Key with `_hours` removed and the first letter upper-cased.
    pub platform: String,
    pub hours: Value,
}

impl HoursRow {
    pub fn new(platform: impl Into<String>, hours: impl Into<Value>) -> Self {
        Self {
            platform: platform.into(),
            hours: hours.into(),
        }
    }
}

/// The hours of one entry in a `features` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSection {
    /// The feature's `name` field, shown as the section title.
    pub name: Option<Value>,
    pub rows: Vec<HoursRow>,
}

/// A sub-feature estimate, rendered as a six-column table under an entry.
///
/// All columns are opaque display values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub sub_feature_name: Value,
    pub android_hours: Value,
    pub ios_hours: Value,
    pub api_hours: Value,
    pub website_hours: Value,
    pub hourly_rate: Value,
}
