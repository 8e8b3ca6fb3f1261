use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::error::PulseResult;
use crate::source::Source;
use crate::transactions_loader::OrderLine;
use crate::types::DashboardQuery;

/// Source that yields every order line of the loaded dataset.
///
/// The dataset is shared, never mutated; each run receives its own copy of
/// the rows to narrow down.
pub struct DatasetSource {
    dataset: Dataset,
}

impl DatasetSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Source<DashboardQuery, OrderLine> for DatasetSource {
    fn enable(&self, _query: &DashboardQuery) -> bool {
        !self.dataset.is_empty()
    }

    async fn get_candidates(&self, _query: &DashboardQuery) -> PulseResult<Vec<OrderLine>> {
        Ok(self.dataset.lines().to_vec())
    }
}
