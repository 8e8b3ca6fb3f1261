use crate::aggregator::Aggregator;
use crate::components::rank_selector::{CustomerRankSelector, RfmDimension};
use crate::rfm;
use crate::selector::Selector;
use crate::transactions_loader::OrderLine;
use crate::types::{DashboardQuery, RfmLeaders, RfmRecord, RfmReport};

/// Builds the per-customer RFM table, its means, and a leaderboard per
/// dimension.
pub struct RfmAggregator {
    pub leaderboard_size: usize,
}

impl Default for RfmAggregator {
    fn default() -> Self {
        Self { leaderboard_size: 5 }
    }
}

impl RfmAggregator {
    fn leaders(&self, query: &DashboardQuery, customers: &[RfmRecord]) -> RfmLeaders {
        let rank = |dimension| {
            CustomerRankSelector::new(dimension, self.leaderboard_size)
                .select(query, customers.to_vec())
        };
        RfmLeaders {
            by_recency: rank(RfmDimension::Recency),
            by_frequency: rank(RfmDimension::Frequency),
            by_monetary: rank(RfmDimension::Monetary),
        }
    }
}

impl Aggregator<DashboardQuery, OrderLine> for RfmAggregator {
    type Output = RfmReport;

    fn aggregate(&self, query: &DashboardQuery, candidates: &[OrderLine]) -> RfmReport {
        let reference_date = rfm::reference_date(candidates);
        let customers = match reference_date {
            Some(reference) => rfm::customer_rfm(&rfm::summarize_orders(candidates), reference),
            None => Vec::new(),
        };

        RfmReport {
            reference_date,
            summary: rfm::summarize_rfm(&customers),
            leaders: self.leaders(query, &customers),
            customers,
        }
    }
}
