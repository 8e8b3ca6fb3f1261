//! Recency / Frequency / Monetary derivation.
//!
//! Line items are rolled up into orders, orders are attributed to customers,
//! and each customer gets:
//! - Recency: whole days from their latest order to the reference date
//! - Frequency: number of distinct orders
//! - Monetary: sum of order totals (price + freight)
//!
//! The reference date is the latest purchase in the rows being analysed, not
//! the wall clock, so results depend on the active filters.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::transactions_loader::OrderLine;
use crate::types::{OrderSummary, RfmRecord, RfmSummary};
use crate::util::{mean, round_to};

/// Roll line items up into one summary per order, ordered by order id.
///
/// Customer and timestamp come from the first line seen for each order.
/// Missing prices or freight contribute nothing to the totals. Lines without
/// an order id or a customer id cannot be attributed and are left out.
pub fn summarize_orders(lines: &[OrderLine]) -> Vec<OrderSummary> {
    let mut orders: BTreeMap<&str, OrderSummary> = BTreeMap::new();
    for line in lines {
        let (Some(order_id), Some(customer)) = (&line.order_id, &line.customer_unique_id) else {
            continue;
        };
        let order = orders
            .entry(order_id.as_str())
            .or_insert_with(|| OrderSummary {
                order_id: order_id.clone(),
                customer_unique_id: customer.clone(),
                purchased_at: line.purchased_at,
                total_product_value: 0.0,
                total_freight_value: 0.0,
                total_order_value: 0.0,
            });
        order.total_product_value += line.price.unwrap_or(0.0);
        order.total_freight_value += line.freight.unwrap_or(0.0);
    }

    orders
        .into_values()
        .map(|mut order| {
            order.total_order_value = order.total_product_value + order.total_freight_value;
            order
        })
        .collect()
}

/// Latest purchase timestamp among `lines`.
pub fn reference_date(lines: &[OrderLine]) -> Option<NaiveDateTime> {
    lines.iter().map(|l| l.purchased_at).max()
}

struct CustomerAccumulator {
    latest: NaiveDateTime,
    orders: usize,
    monetary: f64,
}

/// Per-customer RFM table, ordered by customer id.
///
/// `orders` must hold one entry per order id, as `summarize_orders` produces,
/// so counting entries counts distinct orders.
pub fn customer_rfm(orders: &[OrderSummary], reference: NaiveDateTime) -> Vec<RfmRecord> {
    let mut customers: BTreeMap<&str, CustomerAccumulator> = BTreeMap::new();
    for order in orders {
        let acc = customers
            .entry(order.customer_unique_id.as_str())
            .or_insert(CustomerAccumulator {
                latest: order.purchased_at,
                orders: 0,
                monetary: 0.0,
            });
        acc.latest = acc.latest.max(order.purchased_at);
        acc.orders += 1;
        acc.monetary += order.total_order_value;
    }

    customers
        .into_iter()
        .map(|(customer, acc)| RfmRecord {
            customer_unique_id: customer.to_string(),
            // Floor of the elapsed days; never negative since the reference
            // is the maximum timestamp.
            recency_days: (reference - acc.latest).num_days().max(0),
            frequency: acc.orders,
            monetary: acc.monetary,
        })
        .collect()
}

/// Means over the table. Recency is rounded to 1 decimal and frequency to 2;
/// all three are NaN for an empty table.
pub fn summarize_rfm(customers: &[RfmRecord]) -> RfmSummary {
    RfmSummary {
        avg_recency: round_to(mean(customers.iter().map(|c| c.recency_days as f64)), 1),
        avg_frequency: round_to(mean(customers.iter().map(|c| c.frequency as f64)), 2),
        avg_monetary: mean(customers.iter().map(|c| c.monetary)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(date: &str, hour: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn line(
        order_id: &str,
        customer: &str,
        at: NaiveDateTime,
        price: f64,
        freight: f64,
    ) -> OrderLine {
        OrderLine {
            order_id: Some(order_id.into()),
            customer_unique_id: Some(customer.into()),
            region: Some("SP".into()),
            category: Some("toys".into()),
            purchased_at: at,
            price: Some(price),
            freight: Some(freight),
            status: Some("delivered".into()),
        }
    }

    #[test]
    fn multi_item_orders_roll_up_once() {
        let lines = vec![
            line("o-1", "a", ts("2018-01-01", 9), 100.0, 10.0),
            line("o-1", "a", ts("2018-01-01", 9), 50.0, 5.0),
            line("o-2", "b", ts("2018-01-05", 9), 20.0, 2.0),
        ];
        let orders = summarize_orders(&lines);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "o-1");
        assert!((orders[0].total_product_value - 150.0).abs() < 1e-9);
        assert!((orders[0].total_freight_value - 15.0).abs() < 1e-9);
        assert!((orders[0].total_order_value - 165.0).abs() < 1e-9);

        // A two-line order still counts once towards frequency and monetary.
        let rfm = customer_rfm(&orders, reference_date(&lines).unwrap());
        assert_eq!(rfm[0].customer_unique_id, "a");
        assert_eq!(rfm[0].frequency, 1);
        assert!((rfm[0].monetary - 165.0).abs() < 1e-9);
    }

    #[test]
    fn recency_floors_partial_days() {
        let lines = vec![
            line("o-1", "a", ts("2018-01-01", 18), 10.0, 0.0),
            line("o-2", "b", ts("2018-01-03", 9), 10.0, 0.0),
        ];
        let orders = summarize_orders(&lines);
        let rfm = customer_rfm(&orders, reference_date(&lines).unwrap());
        // 1 day 15 hours -> 1 day.
        assert_eq!(rfm[0].recency_days, 1);
        assert_eq!(rfm[1].recency_days, 0);
    }

    #[test]
    fn missing_amounts_count_as_zero() {
        let mut partial = line("o-1", "a", ts("2018-01-01", 9), 0.0, 0.0);
        partial.price = None;
        partial.freight = Some(7.5);
        let orders = summarize_orders(&[partial]);
        assert!((orders[0].total_order_value - 7.5).abs() < 1e-9);
    }

    #[test]
    fn lines_without_ids_stay_out_of_orders() {
        let mut anonymous = line("o-2", "b", ts("2018-01-05", 9), 500.0, 0.0);
        anonymous.customer_unique_id = None;
        let mut orphan = line("o-3", "a", ts("2018-01-06", 9), 70.0, 0.0);
        orphan.order_id = None;
        let lines = vec![line("o-1", "a", ts("2018-01-01", 9), 10.0, 1.0), anonymous, orphan];

        let orders = summarize_orders(&lines);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "o-1");

        // The reference date still comes from every line in the slice.
        let rfm = customer_rfm(&orders, reference_date(&lines).unwrap());
        assert_eq!(rfm.len(), 1);
        assert_eq!(rfm[0].customer_unique_id, "a");
        assert_eq!(rfm[0].recency_days, 5);
        assert!((rfm[0].monetary - 11.0).abs() < 1e-9);
    }

    #[test]
    fn summary_rounds_means() {
        let customers = vec![
            RfmRecord {
                customer_unique_id: "a".into(),
                recency_days: 1,
                frequency: 1,
                monetary: 10.0,
            },
            RfmRecord {
                customer_unique_id: "b".into(),
                recency_days: 2,
                frequency: 1,
                monetary: 20.0,
            },
            RfmRecord {
                customer_unique_id: "c".into(),
                recency_days: 2,
                frequency: 3,
                monetary: 30.0,
            },
        ];
        let summary = summarize_rfm(&customers);
        assert_eq!(summary.avg_recency, 1.7);
        assert_eq!(summary.avg_frequency, 1.67);
        assert!((summary.avg_monetary - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_has_nan_summary() {
        let summary = summarize_rfm(&[]);
        assert!(summary.avg_recency.is_nan());
        assert!(summary.avg_frequency.is_nan());
        assert!(summary.avg_monetary.is_nan());
        assert!(reference_date(&[]).is_none());
    }
}
