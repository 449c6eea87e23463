use core::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::DomainError;

/// Shelving recommendation derived from a demand score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShelfAction {
    Acquire,
    Hold,
    Transfer,
    Deaccession,
}

impl ShelfAction {
    pub const ALL: [ShelfAction; 4] = [
        ShelfAction::Acquire,
        ShelfAction::Hold,
        ShelfAction::Transfer,
        ShelfAction::Deaccession,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShelfAction::Acquire => "Acquire",
            ShelfAction::Hold => "Hold",
            ShelfAction::Transfer => "Transfer",
            ShelfAction::Deaccession => "Deaccession",
        }
    }
}

impl core::fmt::Display for ShelfAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShelfAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ShelfAction::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown action {wanted:?}; expected one of Acquire, Hold, Transfer, Deaccession"
                ))
            })
    }
}

/// One row of caller-supplied book metadata.
///
/// Ephemeral: the scorer reads it and never keeps it. `demand` is the baseline
/// estimate before any model adjustment; `None` means "use the default baseline".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "lenient_demand",
        skip_serializing_if = "Option::is_none"
    )]
    pub demand: Option<f64>,
    /// Previously assigned action, carried through when scoring falls back.
    #[serde(
        default,
        deserialize_with = "lenient_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<ShelfAction>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: category.into(),
            demand: None,
            action: None,
        }
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = Some(demand);
        self
    }

    pub fn with_action(mut self, action: ShelfAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Short text the models see: `"<title> by <author> in <category>"`.
    pub fn descriptor(&self) -> String {
        format!("{} by {} in {}", self.title, self.author, self.category)
    }
}

impl From<&Prediction> for BookRecord {
    fn from(p: &Prediction) -> Self {
        Self {
            title: p.title.clone(),
            author: p.author.clone(),
            category: p.category.clone(),
            demand: Some(p.demand),
            action: Some(p.action),
        }
    }
}

/// Scored output for one `BookRecord`.
///
/// `demand` and `ai_confidence` are both within \[0, 100\].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub title: String,
    pub author: String,
    pub category: String,
    pub demand: f64,
    pub action: ShelfAction,
    pub ai_confidence: f64,
}

// Spreadsheet exports hand us numbers as strings about as often as not.
fn lenient_demand<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => {
                    warn!(value = %s, "demand is not a number; using default baseline");
                    Ok(None)
                }
            }
        }
        Some(Raw::Other(_)) => {
            warn!("demand is neither a number nor text; using default baseline");
            Ok(None)
        }
    }
}

fn lenient_action<'de, D>(deserializer: D) -> Result<Option<ShelfAction>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s.parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
