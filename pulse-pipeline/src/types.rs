use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::candidate_pipeline::HasRequestId;
use crate::error::PulseResult;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `date` lies within `[start, end]`. A range whose start is
    /// after its end contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One dashboard interaction: the filter criteria a user has selected.
///
/// Empty `regions` / `categories` mean "no filtering on that dimension".
/// Missing dates are filled from the dataset bounds by the query hydrator.
#[derive(Clone, Debug, Default)]
pub struct DashboardQuery {
    pub request_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub regions: Vec<String>,
    pub categories: Vec<String>,
}

impl DashboardQuery {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_regions<S: Into<String>>(mut self, regions: impl IntoIterator<Item = S>) -> Self {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// The effective date range, once both ends are known.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }
}

impl HasRequestId for DashboardQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Month key
// ---------------------------------------------------------------------------

/// Calendar-month bucket. Orders chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Aggregate tables
// ---------------------------------------------------------------------------

/// Total price revenue for one product category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

/// Highest and lowest earning categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryExtremes {
    /// Sorted by revenue descending.
    pub top: Vec<CategoryRevenue>,
    /// Sorted by revenue ascending.
    pub bottom: Vec<CategoryRevenue>,
}

/// Line items purchased in one calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyVolume {
    pub year_month: YearMonth,
    pub line_items: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionCancellations {
    pub region: String,
    pub canceled: usize,
}

/// One order rolled up from its line items.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub customer_unique_id: String,
    pub purchased_at: NaiveDateTime,
    pub total_product_value: f64,
    pub total_freight_value: f64,
    pub total_order_value: f64,
}

/// Recency / Frequency / Monetary metrics for one customer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RfmRecord {
    pub customer_unique_id: String,
    /// Whole days between the reference date and the latest order.
    pub recency_days: i64,
    /// Distinct orders.
    pub frequency: usize,
    /// Sum of total order value (price + freight).
    pub monetary: f64,
}

/// Population means over the RFM table. NaN when the table is empty.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RfmSummary {
    /// Rounded to 1 decimal.
    pub avg_recency: f64,
    /// Rounded to 2 decimals.
    pub avg_frequency: f64,
    pub avg_monetary: f64,
}

/// Top-N customers under each RFM dimension.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RfmLeaders {
    pub by_recency: Vec<RfmRecord>,
    pub by_frequency: Vec<RfmRecord>,
    pub by_monetary: Vec<RfmRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RfmReport {
    /// Latest purchase timestamp in the filtered rows.
    pub reference_date: Option<NaiveDateTime>,
    pub summary: RfmSummary,
    pub leaders: RfmLeaders,
    /// Full per-customer table, ordered by customer id. Not serialized.
    #[serde(skip_serializing)]
    pub customers: Vec<RfmRecord>,
}

/// Everything one dashboard run produces.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardReport {
    pub request_id: String,
    pub date_range: Option<DateRange>,
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub rows_retrieved: usize,
    pub rows_filtered_out: usize,
    pub rows_kept: usize,
    pub category_revenue: CategoryExtremes,
    pub monthly_volume: Vec<MonthlyVolume>,
    pub status_distribution: Vec<StatusCount>,
    pub cancellations_by_region: Vec<RegionCancellations>,
    pub rfm: RfmReport,
}

impl DashboardReport {
    pub fn to_json_pretty(&self) -> PulseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
