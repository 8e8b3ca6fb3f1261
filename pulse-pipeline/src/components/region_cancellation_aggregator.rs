use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::transactions_loader::OrderLine;
use crate::types::{DashboardQuery, RegionCancellations};

/// Counts canceled line items per region, highest first (ties by region).
///
/// The status must equal `canceled_status` exactly and the line must carry
/// an order id; regions without any cancellation are left out.
pub struct RegionCancellationAggregator {
    pub canceled_status: String,
}

impl Default for RegionCancellationAggregator {
    fn default() -> Self {
        Self {
            canceled_status: "canceled".to_string(),
        }
    }
}

impl Aggregator<DashboardQuery, OrderLine> for RegionCancellationAggregator {
    type Output = Vec<RegionCancellations>;

    fn aggregate(
        &self,
        _query: &DashboardQuery,
        candidates: &[OrderLine],
    ) -> Vec<RegionCancellations> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for line in candidates
            .iter()
            .filter(|l| l.order_id.is_some())
            .filter(|l| l.status.as_deref() == Some(self.canceled_status.as_str()))
        {
            if let Some(region) = line.region.as_deref() {
                *counts.entry(region).or_insert(0) += 1;
            }
        }
        let mut by_region: Vec<RegionCancellations> = counts
            .into_iter()
            .map(|(region, canceled)| RegionCancellations {
                region: region.to_string(),
                canceled,
            })
            .collect();
        by_region.sort_by(|a, b| b.canceled.cmp(&a.canceled));
        by_region
    }
}
