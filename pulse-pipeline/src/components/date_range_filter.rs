use async_trait::async_trait;

use crate::error::PulseResult;
use crate::filter::{Filter, FilterResult};
use crate::transactions_loader::OrderLine;
use crate::types::DashboardQuery;

/// Keeps lines purchased within the query's inclusive date range.
///
/// Timestamps are truncated to the calendar date before comparison, so the
/// whole end day is included. A start after the end keeps nothing.
pub struct DateRangeFilter;

#[async_trait]
impl Filter<DashboardQuery, OrderLine> for DateRangeFilter {
    fn enable(&self, query: &DashboardQuery) -> bool {
        query.start_date.is_some() || query.end_date.is_some()
    }

    async fn filter(
        &self,
        query: &DashboardQuery,
        candidates: Vec<OrderLine>,
    ) -> PulseResult<FilterResult<OrderLine>> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|line| {
            let date = line.purchase_date();
            query.start_date.map_or(true, |start| date >= start)
                && query.end_date.map_or(true, |end| date <= end)
        });

        Ok(FilterResult { kept, removed })
    }
}
