use crate::util;

/// Aggregators reduce the filtered candidates to one summary table.
///
/// They are pure: the same candidates always produce the same output, and an
/// empty candidate list produces an empty (or NaN-valued) output rather than
/// an error.
pub trait Aggregator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    type Output;

    fn aggregate(&self, query: &Q, candidates: &[C]) -> Self::Output;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
