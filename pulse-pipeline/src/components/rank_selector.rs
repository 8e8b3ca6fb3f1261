use crate::selector::{Selector, SortOrder};
use crate::types::{CategoryRevenue, DashboardQuery, RfmRecord};

/// Ranks categories by revenue and keeps the first `k`.
pub struct CategoryRankSelector {
    pub k: usize,
    pub order: SortOrder,
}

impl CategoryRankSelector {
    /// Highest earners first.
    pub fn top(k: usize) -> Self {
        Self {
            k,
            order: SortOrder::Descending,
        }
    }

    /// Lowest earners first.
    pub fn bottom(k: usize) -> Self {
        Self {
            k,
            order: SortOrder::Ascending,
        }
    }
}

impl Selector<DashboardQuery, CategoryRevenue> for CategoryRankSelector {
    fn score(&self, candidate: &CategoryRevenue) -> f64 {
        candidate.revenue
    }

    fn order(&self) -> SortOrder {
        self.order
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RfmDimension {
    Recency,
    Frequency,
    Monetary,
}

/// Picks the best `k` customers along one RFM dimension: most recent
/// (fewest days) for recency, highest values for frequency and monetary.
pub struct CustomerRankSelector {
    pub k: usize,
    pub dimension: RfmDimension,
}

impl CustomerRankSelector {
    pub fn new(dimension: RfmDimension, k: usize) -> Self {
        Self { k, dimension }
    }
}

impl Selector<DashboardQuery, RfmRecord> for CustomerRankSelector {
    fn score(&self, candidate: &RfmRecord) -> f64 {
        match self.dimension {
            RfmDimension::Recency => candidate.recency_days as f64,
            RfmDimension::Frequency => candidate.frequency as f64,
            RfmDimension::Monetary => candidate.monetary,
        }
    }

    fn order(&self) -> SortOrder {
        match self.dimension {
            RfmDimension::Recency => SortOrder::Ascending,
            RfmDimension::Frequency | RfmDimension::Monetary => SortOrder::Descending,
        }
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
