use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::transactions_loader::OrderLine;
use crate::types::{DashboardQuery, MonthlyVolume, YearMonth};

/// Counts line items per purchase month, oldest month first.
///
/// Line items are counted, not distinct orders; a line without an order id
/// is not counted. Months without counted purchases are absent rather than
/// zero.
pub struct MonthlyVolumeAggregator;

impl Aggregator<DashboardQuery, OrderLine> for MonthlyVolumeAggregator {
    type Output = Vec<MonthlyVolume>;

    fn aggregate(&self, _query: &DashboardQuery, candidates: &[OrderLine]) -> Vec<MonthlyVolume> {
        let mut months: BTreeMap<YearMonth, usize> = BTreeMap::new();
        for line in candidates.iter().filter(|l| l.order_id.is_some()) {
            *months.entry(YearMonth::of(&line.purchased_at)).or_insert(0) += 1;
        }
        months
            .into_iter()
            .map(|(year_month, line_items)| MonthlyVolume {
                year_month,
                line_items,
            })
            .collect()
    }
}
