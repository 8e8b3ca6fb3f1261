use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::transactions_loader::OrderLine;
use crate::types::{DashboardQuery, StatusCount};

/// Counts line items per order status. Whatever status strings appear in the
/// data form the taxonomy; missing statuses are not counted.
///
/// Most frequent status first, ties by status name.
pub struct StatusDistributionAggregator;

impl Aggregator<DashboardQuery, OrderLine> for StatusDistributionAggregator {
    type Output = Vec<StatusCount>;

    fn aggregate(&self, _query: &DashboardQuery, candidates: &[OrderLine]) -> Vec<StatusCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for status in candidates.iter().filter_map(|l| l.status.as_deref()) {
            *counts.entry(status).or_insert(0) += 1;
        }
        let mut distribution: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count));
        distribution
    }
}
