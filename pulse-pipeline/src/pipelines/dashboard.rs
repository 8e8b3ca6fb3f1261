use async_trait::async_trait;

use crate::aggregator::Aggregator;
use crate::candidate_pipeline::{CandidatePipeline, PipelineResult};
use crate::components::category_filter::CategoryFilter;
use crate::components::category_revenue_aggregator::CategoryRevenueAggregator;
use crate::components::dataset_source::DatasetSource;
use crate::components::date_bounds_query_hydrator::DateBoundsQueryHydrator;
use crate::components::date_range_filter::DateRangeFilter;
use crate::components::monthly_volume_aggregator::MonthlyVolumeAggregator;
use crate::components::region_cancellation_aggregator::RegionCancellationAggregator;
use crate::components::region_filter::RegionFilter;
use crate::components::rfm_aggregator::RfmAggregator;
use crate::components::status_distribution_aggregator::StatusDistributionAggregator;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::PulseResult;
use crate::filter::Filter;
use crate::query_hydrator::QueryHydrator;
use crate::source::Source;
use crate::transactions_loader::OrderLine;
use crate::types::{DashboardQuery, DashboardReport};

/// The e-commerce dashboard pipeline.
///
/// Pipeline flow:
/// 1. DateBoundsQueryHydrator fills missing dates from the dataset bounds
/// 2. DatasetSource yields every order line
/// 3. DateRangeFilter, RegionFilter, CategoryFilter narrow the lines (AND)
/// 4. Five aggregators reduce the kept lines to the dashboard tables
///
/// Every run starts again from the full dataset; nothing is cached.
pub struct DashboardPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>>,
    sources: Vec<Box<dyn Source<DashboardQuery, OrderLine>>>,
    filters: Vec<Box<dyn Filter<DashboardQuery, OrderLine>>>,
    category_revenue: CategoryRevenueAggregator,
    monthly_volume: MonthlyVolumeAggregator,
    status_distribution: StatusDistributionAggregator,
    region_cancellations: RegionCancellationAggregator,
    rfm: RfmAggregator,
}

impl DashboardPipeline {
    /// Create a pipeline over `dataset` with the default list sizes.
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self::with_config(dataset, DashboardConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: DashboardConfig) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>> =
            vec![Box::new(DateBoundsQueryHydrator::new(&dataset))];

        let sources: Vec<Box<dyn Source<DashboardQuery, OrderLine>>> =
            vec![Box::new(DatasetSource::new(dataset))];

        let filters: Vec<Box<dyn Filter<DashboardQuery, OrderLine>>> = vec![
            Box::new(DateRangeFilter),
            Box::new(RegionFilter),
            Box::new(CategoryFilter),
        ];

        Self {
            query_hydrators,
            sources,
            filters,
            category_revenue: CategoryRevenueAggregator {
                limit: config.category_limit,
            },
            monthly_volume: MonthlyVolumeAggregator,
            status_distribution: StatusDistributionAggregator,
            region_cancellations: RegionCancellationAggregator {
                canceled_status: config.canceled_status,
            },
            rfm: RfmAggregator {
                leaderboard_size: config.customer_limit,
            },
        }
    }

    /// Filter the dataset for `query` and aggregate what remains.
    pub async fn run(&self, query: DashboardQuery) -> PulseResult<DashboardReport> {
        let PipelineResult {
            query,
            retrieved_count,
            filtered_candidates,
            selected_candidates,
        } = self.execute(query).await?;

        let mut report = self.aggregate(&query, &selected_candidates);
        report.rows_retrieved = retrieved_count;
        report.rows_filtered_out = filtered_candidates.len();
        Ok(report)
    }

    /// Aggregation stage alone, over lines that are already filtered.
    pub fn aggregate(&self, query: &DashboardQuery, lines: &[OrderLine]) -> DashboardReport {
        log::debug!(
            "request_id={} aggregating {} lines with {}, {}, {}, {}, {}",
            query.request_id,
            lines.len(),
            self.category_revenue.name(),
            self.monthly_volume.name(),
            self.status_distribution.name(),
            self.region_cancellations.name(),
            self.rfm.name()
        );

        DashboardReport {
            request_id: query.request_id.clone(),
            date_range: query.date_range(),
            regions: query.regions.clone(),
            categories: query.categories.clone(),
            rows_retrieved: lines.len(),
            rows_filtered_out: 0,
            rows_kept: lines.len(),
            category_revenue: self.category_revenue.aggregate(query, lines),
            monthly_volume: self.monthly_volume.aggregate(query, lines),
            status_distribution: self.status_distribution.aggregate(query, lines),
            cancellations_by_region: self.region_cancellations.aggregate(query, lines),
            rfm: self.rfm.aggregate(query, lines),
        }
    }
}

#[async_trait]
impl CandidatePipeline<DashboardQuery, OrderLine> for DashboardPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<DashboardQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<DashboardQuery, OrderLine>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<DashboardQuery, OrderLine>>] {
        &self.filters
    }
}
