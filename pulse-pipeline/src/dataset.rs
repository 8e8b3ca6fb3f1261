//! Immutable handle over the loaded order lines.
//!
//! Loaded once at start-up and shared read-only by every pipeline stage.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::transactions_loader::OrderLine;
use crate::types::DateRange;

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    lines: Arc<Vec<OrderLine>>,
}

impl Dataset {
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self {
            lines: Arc::new(lines),
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct non-null regions, sorted. These are the selectable region filter values.
    pub fn regions(&self) -> Vec<String> {
        distinct(self.lines.iter().filter_map(|l| l.region.as_deref()))
    }

    /// Distinct non-null categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.lines.iter().filter_map(|l| l.category.as_deref()))
    }

    /// Earliest and latest purchase date, `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.lines.first()?.purchase_date();
        let (start, end) = self.lines.iter().map(OrderLine::purchase_date).fold(
            (first, first),
            |(lo, hi), d| (lo.min(d), hi.max(d)),
        );
        Some(DateRange::new(start, end))
    }
}

impl From<Vec<OrderLine>> for Dataset {
    fn from(lines: Vec<OrderLine>) -> Self {
        Self::new(lines)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
