use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::error::PulseResult;
use crate::query_hydrator::QueryHydrator;
use crate::types::{DashboardQuery, DateRange};

/// Fills a missing start or end date with the dataset's observed bounds,
/// the same defaults a date picker opens with.
pub struct DateBoundsQueryHydrator {
    bounds: Option<DateRange>,
}

impl DateBoundsQueryHydrator {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            bounds: dataset.date_bounds(),
        }
    }
}

#[async_trait]
impl QueryHydrator<DashboardQuery> for DateBoundsQueryHydrator {
    fn enable(&self, query: &DashboardQuery) -> bool {
        self.bounds.is_some() && (query.start_date.is_none() || query.end_date.is_none())
    }

    async fn hydrate(&self, query: &DashboardQuery) -> PulseResult<DashboardQuery> {
        let Some(bounds) = self.bounds else {
            return Ok(query.clone());
        };
        Ok(DashboardQuery {
            start_date: query.start_date.or(Some(bounds.start)),
            end_date: query.end_date.or(Some(bounds.end)),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut DashboardQuery, hydrated: DashboardQuery) {
        query.start_date = hydrated.start_date;
        query.end_date = hydrated.end_date;
    }
}
