use async_trait::async_trait;

use crate::error::PulseResult;
use crate::filter::{Filter, FilterResult};
use crate::query_hydrator::QueryHydrator;
use crate::source::Source;

/// Queries carry a request id so every stage can tag its log lines.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Output of one pipeline execution.
#[derive(Clone, Debug)]
pub struct PipelineResult<Q, C> {
    /// The query after hydration.
    pub query: Q,
    /// Number of candidates the sources produced.
    pub retrieved_count: usize,
    /// Candidates removed by any filter.
    pub filtered_candidates: Vec<C>,
    /// Candidates that passed every filter.
    pub selected_candidates: Vec<C>,
}

/// A staged candidate pipeline: hydrate the query, fetch candidates from
/// the sources, then narrow them through the filters.
///
/// Stages run one after another in declaration order. A failing hydrator or
/// source is logged and skipped. Filters take ownership of the candidates,
/// so a failing filter aborts the run with its error.
#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];

    fn sources(&self) -> &[Box<dyn Source<Q, C>>];

    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];

    async fn execute(&self, query: Q) -> PulseResult<PipelineResult<Q, C>> {
        let query = self.hydrate_query(query).await;
        let retrieved_candidates = self.fetch_candidates(&query).await;
        let retrieved_count = retrieved_candidates.len();
        let (selected_candidates, filtered_candidates) =
            self.run_filters(&query, retrieved_candidates).await?;

        log::info!(
            "request_id={} retrieved={} removed={} kept={}",
            query.request_id(),
            retrieved_count,
            filtered_candidates.len(),
            selected_candidates.len()
        );

        Ok(PipelineResult {
            query,
            retrieved_count,
            filtered_candidates,
            selected_candidates,
        })
    }

    async fn hydrate_query(&self, query: Q) -> Q {
        let mut query = query;
        for hydrator in self.query_hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            match hydrator.hydrate(&query).await {
                Ok(hydrated) => hydrator.update(&mut query, hydrated),
                Err(err) => log::error!(
                    "request_id={} query_hydrator={} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        query
    }

    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let mut candidates = Vec::new();
        for source in self.sources().iter().filter(|s| s.enable(query)) {
            match source.get_candidates(query).await {
                Ok(mut fetched) => {
                    log::debug!(
                        "request_id={} source={} fetched={}",
                        query.request_id(),
                        source.name(),
                        fetched.len()
                    );
                    candidates.append(&mut fetched);
                }
                Err(err) => log::error!(
                    "request_id={} source={} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        candidates
    }

    /// Returns `(kept, removed)`.
    async fn run_filters(&self, query: &Q, candidates: Vec<C>) -> PulseResult<(Vec<C>, Vec<C>)> {
        let mut kept = candidates;
        let mut removed = Vec::new();
        for filter in self.filters().iter().filter(|f| f.enable(query)) {
            let FilterResult {
                kept: next,
                removed: mut dropped,
            } = filter.filter(query, kept).await.map_err(|err| {
                log::error!(
                    "request_id={} filter={} failed: {}",
                    query.request_id(),
                    filter.name(),
                    err
                );
                err
            })?;
            log::debug!(
                "request_id={} filter={} kept={} removed={}",
                query.request_id(),
                filter.name(),
                next.len(),
                dropped.len()
            );
            kept = next;
            removed.append(&mut dropped);
        }
        Ok((kept, removed))
    }
}
