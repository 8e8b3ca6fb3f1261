use std::cmp::Ordering;

use crate::util;

/// Direction a selector ranks in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Selectors rank an aggregate table and truncate it.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Default selection: sort, then truncate to `size()`.
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Extract the value to rank on.
    fn score(&self, candidate: &C) -> f64;

    fn order(&self) -> SortOrder {
        SortOrder::Descending
    }

    /// Stable sort by score in `order()`. Equal scores keep their input
    /// order, so callers control tie-breaks through the order they pass in.
    ///
    /// NaN scores always go to the end regardless of direction.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let order = self.order();
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let sa = self.score(a);
            let sb = self.score(b);
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = sa.partial_cmp(&sb).unwrap_or(Ordering::Equal);
                    match order {
                        SortOrder::Ascending => ord,
                        SortOrder::Descending => ord.reverse(),
                    }
                }
            }
        });
        sorted
    }

    /// Optionally provide a maximum number of rows to keep.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
