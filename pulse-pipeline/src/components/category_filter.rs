use async_trait::async_trait;

use crate::error::PulseResult;
use crate::filter::{Filter, FilterResult};
use crate::transactions_loader::OrderLine;
use crate::types::DashboardQuery;

/// Keeps lines whose product category is one of the selected categories.
/// Disabled for an empty selection.
pub struct CategoryFilter;

#[async_trait]
impl Filter<DashboardQuery, OrderLine> for CategoryFilter {
    fn enable(&self, query: &DashboardQuery) -> bool {
        !query.categories.is_empty()
    }

    async fn filter(
        &self,
        query: &DashboardQuery,
        candidates: Vec<OrderLine>,
    ) -> PulseResult<FilterResult<OrderLine>> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|line| {
            line.category
                .as_ref()
                .is_some_and(|category| query.categories.contains(category))
        });

        Ok(FilterResult { kept, removed })
    }
}
