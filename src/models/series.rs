use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ConditionCategory
// ---------------------------------------------------------------------------

/// Coarse item condition derived from the free-text condition of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionCategory {
    New,
    Used,
    Other,
}

impl ConditionCategory {
    /// All categories in display order.
    pub const ALL: [ConditionCategory; 3] = [
        ConditionCategory::New,
        ConditionCategory::Used,
        ConditionCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConditionCategory::New => "New",
            ConditionCategory::Used => "Used",
            ConditionCategory::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// One of the four chart-data derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    PriceDistribution,
    PriceVsFeedback,
    PriceVsDate,
    ConditionCounts,
}

impl Projection {
    pub const ALL: [Projection; 4] = [
        Projection::PriceDistribution,
        Projection::PriceVsFeedback,
        Projection::PriceVsDate,
        Projection::ConditionCounts,
    ];

    /// Stable identifier, also used as the chart element id.
    pub fn slug(self) -> &'static str {
        match self {
            Projection::PriceDistribution => "listing-by-price",
            Projection::PriceVsFeedback => "price-vs-seller-score",
            Projection::PriceVsDate => "price-vs-date",
            Projection::ConditionCounts => "new-vs-used-chart",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Projection::PriceDistribution => "Listings by price",
            Projection::PriceVsFeedback => "Price vs. seller feedback",
            Projection::PriceVsDate => "Price vs. date listed",
            Projection::ConditionCounts => "New vs. used",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Projection::PriceDistribution => 0,
            Projection::PriceVsFeedback => 1,
            Projection::PriceVsDate => 2,
            Projection::ConditionCounts => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPoint {
    /// Seller positive feedback, in percent.
    pub feedback: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub listed: DateTime<Utc>,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// ConditionSeries
// ---------------------------------------------------------------------------

/// Points of one projection split by condition category, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSeries<P> {
    pub new: Vec<P>,
    pub used: Vec<P>,
    pub other: Vec<P>,
}

impl<P> Default for ConditionSeries<P> {
    fn default() -> Self {
        Self {
            new: Vec::new(),
            used: Vec::new(),
            other: Vec::new(),
        }
    }
}

impl<P> ConditionSeries<P> {
    pub fn push(&mut self, category: ConditionCategory, point: P) {
        match category {
            ConditionCategory::New => self.new.push(point),
            ConditionCategory::Used => self.used.push(point),
            ConditionCategory::Other => self.other.push(point),
        }
    }

    pub fn get(&self, category: ConditionCategory) -> &[P] {
        match category {
            ConditionCategory::New => &self.new,
            ConditionCategory::Used => &self.used,
            ConditionCategory::Other => &self.other,
        }
    }

    /// Combined number of points across all categories.
    pub fn len(&self) -> usize {
        self.new.len() + self.used.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(category, points)` in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ConditionCategory, &[P])> + '_ {
        ConditionCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

// ---------------------------------------------------------------------------
// ConditionCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionCounts {
    pub new: usize,
    pub used: usize,
    pub other: usize,
}

impl ConditionCounts {
    pub fn increment(&mut self, category: ConditionCategory) {
        match category {
            ConditionCategory::New => self.new += 1,
            ConditionCategory::Used => self.used += 1,
            ConditionCategory::Other => self.other += 1,
        }
    }

    pub fn get(&self, category: ConditionCategory) -> usize {
        match category {
            ConditionCategory::New => self.new,
            ConditionCategory::Used => self.used,
            ConditionCategory::Other => self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.used + self.other
    }
}

// ---------------------------------------------------------------------------
// Projected
// ---------------------------------------------------------------------------

/// Result of a point projection: the per-category series, or a signal that no
/// listing qualified. `dropped` counts the listings the projection excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Projected<P> {
    Data {
        series: ConditionSeries<P>,
        dropped: usize,
    },
    NoData {
        dropped: usize,
    },
}

impl<P> Projected<P> {
    pub fn series(&self) -> Option<&ConditionSeries<P>> {
        match self {
            Projected::Data { series, .. } => Some(series),
            Projected::NoData { .. } => None,
        }
    }

    pub fn dropped(&self) -> usize {
        match self {
            Projected::Data { dropped, .. } | Projected::NoData { dropped } => *dropped,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Projected::NoData { .. })
    }
}
