use async_trait::async_trait;

use crate::error::PulseResult;
use crate::filter::{Filter, FilterResult};
use crate::transactions_loader::OrderLine;
use crate::types::DashboardQuery;

/// Keeps lines whose customer region is one of the selected regions.
///
/// Disabled for an empty selection. Lines without a region never match an
/// active selection.
pub struct RegionFilter;

#[async_trait]
impl Filter<DashboardQuery, OrderLine> for RegionFilter {
    fn enable(&self, query: &DashboardQuery) -> bool {
        !query.regions.is_empty()
    }

    async fn filter(
        &self,
        query: &DashboardQuery,
        candidates: Vec<OrderLine>,
    ) -> PulseResult<FilterResult<OrderLine>> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|line| {
            line.region
                .as_ref()
                .is_some_and(|region| query.regions.contains(region))
        });

        Ok(FilterResult { kept, removed })
    }
}
