pub mod category_filter;
pub mod category_revenue_aggregator;
pub mod dataset_source;
pub mod date_bounds_query_hydrator;
pub mod date_range_filter;
pub mod monthly_volume_aggregator;
pub mod rank_selector;
pub mod region_cancellation_aggregator;
pub mod region_filter;
pub mod rfm_aggregator;
pub mod status_distribution_aggregator;
