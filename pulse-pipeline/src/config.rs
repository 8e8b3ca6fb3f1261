/// Tunables for a dashboard run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Length of the top and bottom revenue category lists.
    pub category_limit: usize,
    /// Length of each RFM leaderboard.
    pub customer_limit: usize,
    /// Status value counted as a cancellation. Matched exactly, case-sensitive.
    pub canceled_status: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            category_limit: 10,
            customer_limit: 5,
            canceled_status: "canceled".to_string(),
        }
    }
}
