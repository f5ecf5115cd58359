use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Closed set of feedback categories produced by the analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Skills,
    Experience,
    Formatting,
    General,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 4] = [
        FeedbackCategory::Skills,
        FeedbackCategory::Experience,
        FeedbackCategory::Formatting,
        FeedbackCategory::General,
    ];

    /// Wire value, also used as the filter query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Skills => "skills",
            FeedbackCategory::Experience => "experience",
            FeedbackCategory::Formatting => "formatting",
            FeedbackCategory::General => "general",
        }
    }

    /// Capitalized display label ("Skills", "Experience", ...).
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackCategory::Skills => "Skills",
            FeedbackCategory::Experience => "Experience",
            FeedbackCategory::Formatting => "Formatting",
            FeedbackCategory::General => "General",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feedback category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for FeedbackCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FeedbackCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// The backend is not consistent about casing ("Skills" vs "skills"). A
// category outside the closed set is filed under General so one odd item
// cannot sink the whole result.
impl<'de> Deserialize<'de> for FeedbackCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e: UnknownCategory| {
            warn!("{e}, filing under general");
            FeedbackCategory::General
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub category: FeedbackCategory,
    pub text: String,
}

impl FeedbackItem {
    pub fn new(category: FeedbackCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    /// "Category: text" as shown in the dashboard list and the exported report.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.category.label(), self.text)
    }
}

/// Canonical analysis result. Also the shape mirrored into browser storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitScoreResult {
    /// 0 – 100
    pub fit_score: u8,
    pub matched_skills: Vec<String>,
    pub feedback: Vec<FeedbackItem>,
}
