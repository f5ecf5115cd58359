use std::fmt;
use std::str::FromStr;

use crate::models::analysis::{FeedbackCategory, FeedbackItem, UnknownCategory};

/// The category selected in the dashboard's feedback dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackFilter {
    #[default]
    All,
    Category(FeedbackCategory),
}

impl FeedbackFilter {
    /// Every selectable option, in dropdown order.
    pub fn options() -> impl Iterator<Item = FeedbackFilter> {
        std::iter::once(FeedbackFilter::All)
            .chain(FeedbackCategory::ALL.into_iter().map(FeedbackFilter::Category))
    }

    pub fn value(&self) -> &'static str {
        match self {
            FeedbackFilter::All => "all",
            FeedbackFilter::Category(c) => c.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackFilter::All => "All",
            FeedbackFilter::Category(c) => c.label(),
        }
    }

    pub fn matches(&self, item: &FeedbackItem) -> bool {
        match self {
            FeedbackFilter::All => true,
            FeedbackFilter::Category(c) => item.category == *c,
        }
    }
}

impl fmt::Display for FeedbackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for FeedbackFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(FeedbackFilter::All)
        } else {
            s.parse().map(FeedbackFilter::Category)
        }
    }
}

/// Ordered subsequence of `items` matching `filter` (exact category match).
/// The source slice is never reordered or modified.
pub fn filter_feedback(items: &[FeedbackItem], filter: FeedbackFilter) -> Vec<&FeedbackItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}
