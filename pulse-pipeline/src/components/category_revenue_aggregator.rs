use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::components::rank_selector::CategoryRankSelector;
use crate::selector::Selector;
use crate::transactions_loader::OrderLine;
use crate::types::{CategoryExtremes, CategoryRevenue, DashboardQuery};

/// Sums item price (freight excluded) per category and keeps the highest
/// and lowest earners.
///
/// Groups come out in ascending category order and ranking is a stable sort,
/// so the top list breaks ties by name. The bottom list is ranked from the
/// reversed groups, which makes it the exact reverse of the full ranking's
/// tail: with at least `2 * limit` categories the two lists never overlap.
pub struct CategoryRevenueAggregator {
    pub limit: usize,
}

impl Default for CategoryRevenueAggregator {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl CategoryRevenueAggregator {
    /// Revenue for every non-null category, ordered by category name.
    pub fn revenue_by_category(lines: &[OrderLine]) -> Vec<CategoryRevenue> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for line in lines {
            if let Some(category) = line.category.as_deref() {
                *totals.entry(category).or_insert(0.0) += line.price.unwrap_or(0.0);
            }
        }
        totals
            .into_iter()
            .map(|(category, revenue)| CategoryRevenue {
                category: category.to_string(),
                revenue,
            })
            .collect()
    }
}

impl Aggregator<DashboardQuery, OrderLine> for CategoryRevenueAggregator {
    type Output = CategoryExtremes;

    fn aggregate(&self, query: &DashboardQuery, candidates: &[OrderLine]) -> CategoryExtremes {
        let revenue = Self::revenue_by_category(candidates);
        let mut reversed = revenue.clone();
        reversed.reverse();
        CategoryExtremes {
            top: CategoryRankSelector::top(self.limit).select(query, revenue),
            bottom: CategoryRankSelector::bottom(self.limit).select(query, reversed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(category: Option<&str>, price: Option<f64>) -> OrderLine {
        OrderLine {
            order_id: Some("o".into()),
            customer_unique_id: Some("c".into()),
            region: Some("SP".into()),
            category: category.map(String::from),
            purchased_at: NaiveDate::from_ymd_opt(2018, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price,
            freight: Some(99.0),
            status: Some("delivered".into()),
        }
    }

    #[test]
    fn sums_price_without_freight() {
        let revenue = CategoryRevenueAggregator::revenue_by_category(&[
            line(Some("toys"), Some(10.0)),
            line(Some("toys"), Some(5.5)),
            line(Some("auto"), None),
            line(None, Some(1000.0)),
        ]);
        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue[0].category, "auto");
        assert_eq!(revenue[0].revenue, 0.0);
        assert_eq!(revenue[1].category, "toys");
        assert!((revenue[1].revenue - 15.5).abs() < 1e-9);
    }

    #[test]
    fn fewer_categories_than_limit_returns_all() {
        let aggregator = CategoryRevenueAggregator::default();
        let query = DashboardQuery::new("t");
        let extremes = aggregator.aggregate(
            &query,
            &[
                line(Some("a"), Some(3.0)),
                line(Some("b"), Some(1.0)),
                line(Some("c"), Some(2.0)),
            ],
        );
        let top: Vec<&str> = extremes.top.iter().map(|c| c.category.as_str()).collect();
        let bottom: Vec<&str> = extremes.bottom.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(top, vec!["a", "c", "b"]);
        assert_eq!(bottom, vec!["b", "c", "a"]);
    }

    #[test]
    fn tied_revenue_keeps_lists_disjoint() {
        let aggregator = CategoryRevenueAggregator { limit: 2 };
        let query = DashboardQuery::new("t");
        let lines: Vec<OrderLine> = ["a", "b", "c", "d"]
            .iter()
            .map(|c| line(Some(*c), Some(1.0)))
            .collect();
        let extremes = aggregator.aggregate(&query, &lines);
        let top: Vec<&str> = extremes.top.iter().map(|c| c.category.as_str()).collect();
        let bottom: Vec<&str> = extremes.bottom.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(top, vec!["a", "b"]);
        assert_eq!(bottom, vec!["d", "c"]);
    }

    #[test]
    fn empty_input_gives_empty_lists() {
        let extremes =
            CategoryRevenueAggregator::default().aggregate(&DashboardQuery::new("t"), &[]);
        assert!(extremes.top.is_empty());
        assert!(extremes.bottom.is_empty());
    }
}
