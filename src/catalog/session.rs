//! Interactive query session over a [`MonsterSource`].
//!
//! Every refresh takes a ticket from a [`RequestSequencer`]; when refreshes
//! overlap, only the most recently issued one may publish its page. Older
//! results are dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tracing::debug;

use super::engine::{self, FilteredPage};
use super::pagination::PaginationControls;
use super::state::QueryState;
use crate::domain::MonsterRecord;
use crate::error::Result;
use crate::metrics::QueryMetrics;
use crate::source::MonsterSource;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True when no ticket was issued after `ticket`.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct CatalogSession {
    source: Arc<dyn MonsterSource>,
    state: Mutex<QueryState>,
    sequencer: RequestSequencer,
    current: Mutex<Option<FilteredPage<MonsterRecord>>>,
}

impl CatalogSession {
    pub fn new(source: Arc<dyn MonsterSource>, state: QueryState) -> Self {
        Self {
            source,
            state: Mutex::new(state),
            sequencer: RequestSequencer::default(),
            current: Mutex::new(None),
        }
    }

    pub fn state(&self) -> QueryState {
        lock(&self.state).clone()
    }

    /// Mutates the query state; call [`refresh`](Self::refresh) afterwards.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut QueryState),
    {
        f(&mut lock(&self.state));
    }

    /// The page published by the latest completed refresh.
    pub fn current(&self) -> Option<FilteredPage<MonsterRecord>> {
        lock(&self.current).clone()
    }

    pub fn controls(&self) -> Option<PaginationControls> {
        lock(&self.current)
            .as_ref()
            .map(|page| PaginationControls::derive(page.page, page.total, page.size))
    }

    /// Re-runs the current state against the source.
    ///
    /// Returns `Ok(None)` when a newer refresh was issued while this one was
    /// in flight; its result (or error) is discarded.
    pub async fn refresh(&self) -> Result<Option<FilteredPage<MonsterRecord>>> {
        let ticket = self.sequencer.begin();
        let state = self.state();
        let started = Instant::now();

        let fetched = self.source.collection(state.partition()).await;

        let mut current = lock(&self.current);
        if !self.sequencer.is_latest(ticket) {
            debug!(?ticket, "Discarding stale query result");
            QueryMetrics::record_stale_discarded();
            return Ok(None);
        }

        let page = engine::query(&fetched?, &state);
        QueryMetrics::record_query(started.elapsed().as_secs_f64(), page.total);
        *current = Some(page.clone());
        Ok(Some(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_tracks_latest() {
        let sequencer = RequestSequencer::default();
        let first = sequencer.begin();
        assert!(sequencer.is_latest(first));
        let second = sequencer.begin();
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
        assert!(second > first);
    }
}
