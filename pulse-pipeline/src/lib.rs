//! Filter and aggregation pipeline behind the e-commerce dashboard.
//!
//! A run takes the immutable [`Dataset`](dataset::Dataset), narrows it with
//! the user's date/region/category selection, and reduces the remaining order
//! lines to five tables: category revenue extremes, monthly volume, status
//! distribution, cancellations by region and RFM customer metrics.

pub mod aggregator;
pub mod candidate_pipeline;
pub mod components;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod pipelines;
pub mod query_hydrator;
pub mod rfm;
pub mod selector;
pub mod source;
pub mod transactions_loader;
pub mod types;
pub mod util;

pub use config::DashboardConfig;
pub use dataset::Dataset;
pub use error::{PulseError, PulseResult};
pub use pipelines::dashboard::DashboardPipeline;
pub use transactions_loader::OrderLine;
