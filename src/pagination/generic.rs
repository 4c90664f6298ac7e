//! Generic (core) paginator
//!
//! Post-filter pagination over any `(offset, limit) -> items` retriever.

use super::engine::{
    accumulate, ensure_within_window, item_window, Cursor, Plan, Round, RoundSource, RoundStatus,
};
use super::growth::GrowthPolicy;
use super::limits::{CancelToken, RunLimits};
use super::types::{FetchRequest, Filter, Retriever, Selection};
use crate::config::PaginatorConfig;
use crate::error::Result;
use std::marker::PhantomData;
use std::time::Instant;

/// Paginates a source whose filter cannot be pushed into retrieval
///
/// Every call accumulates filtered matches from the very start of the
/// source, re-fetching windows of `(offset + limit) × initial_limit_multiple`
/// raw items until enough matches exist or the source returns a short batch,
/// then slices out the requested page.
///
/// ```
/// use siftpage::pagination::{CorePaginator, FetchRequest, Predicate};
/// use siftpage::Result;
///
/// let data: Vec<u32> = (1..=20).collect();
/// let retriever = |r: &FetchRequest| -> Result<Vec<u32>> {
///     Ok(data.iter().skip(r.offset).take(r.limit).copied().collect())
/// };
/// let paginator = CorePaginator::new(retriever, Predicate(|n: &u32| n % 2 == 0));
///
/// assert_eq!(paginator.select(5, 5)?, vec![12, 14, 16, 18, 20]);
/// # Ok::<(), siftpage::Error>(())
/// ```
pub struct CorePaginator<T, R, F> {
    retriever: R,
    filter: F,
    initial_limit_multiple: usize,
    growth: GrowthPolicy,
    limits: RunLimits,
    _item: PhantomData<fn() -> T>,
}

impl<T, R, F> CorePaginator<T, R, F>
where
    R: Retriever<T>,
    F: Filter<T>,
{
    /// Create a paginator with the default configuration
    pub fn new(retriever: R, filter: F) -> Self {
        Self {
            retriever,
            filter,
            initial_limit_multiple: 1,
            growth: GrowthPolicy::Fixed,
            limits: RunLimits::default(),
            _item: PhantomData,
        }
    }

    /// Apply a configuration, validating it first
    pub fn with_config(mut self, config: &PaginatorConfig) -> Result<Self> {
        config.validate()?;
        let cancel = self.limits.cancel.take();
        self.initial_limit_multiple = config.initial_limit_multiple;
        self.growth = config.growth;
        self.limits = config.run_limits();
        self.limits.cancel = cancel;
        Ok(self)
    }

    /// Abort calls once `token` is cancelled
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.limits.cancel = Some(token);
        self
    }

    /// Multiple applied to the item limit for the first window
    pub fn initial_limit_multiple(&self) -> usize {
        self.initial_limit_multiple
    }

    /// Growth policy between rounds
    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    /// Select `limit` filtered items after skipping `offset` filtered items
    pub fn select(&self, offset: usize, limit: usize) -> Result<Vec<T>> {
        Ok(self.select_with_stats(offset, limit)?.items)
    }

    /// Like [`select`](Self::select), also reporting how the items were found
    pub fn select_with_stats(&self, offset: usize, limit: usize) -> Result<Selection<T>> {
        if limit == 0 {
            return Ok(Selection::empty());
        }

        let (item_limit, initial_window) =
            item_window(offset, limit, self.initial_limit_multiple)?;
        let plan = Plan {
            item_limit,
            initial_window,
            growth: self.growth,
            limits: &self.limits,
        };

        let mut rounds = OffsetRounds {
            retriever: &self.retriever,
        };
        let accumulated = accumulate(&mut rounds, &self.filter, &plan)?;
        Ok(accumulated.into_selection(offset, limit))
    }
}

impl<T, R, F> std::fmt::Debug for CorePaginator<T, R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorePaginator")
            .field("initial_limit_multiple", &self.initial_limit_multiple)
            .field("growth", &self.growth)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Rounds served by an offset/limit retriever
struct OffsetRounds<'a, R> {
    retriever: &'a R,
}

impl<T, R> RoundSource<T> for OffsetRounds<'_, R>
where
    R: Retriever<T>,
{
    fn fetch(&mut self, cursor: &Cursor, deadline: Option<Instant>) -> Result<Round<T>> {
        let request = FetchRequest {
            offset: cursor.raw_offset,
            limit: cursor.window,
            round: cursor.round,
            deadline,
        };
        let batch = self.retriever.retrieve(&request)?;
        ensure_within_window(cursor.window, batch.len())?;

        let status = if batch.len() < cursor.window {
            RoundStatus::Exhausted
        } else {
            RoundStatus::Open
        };
        Ok(Round {
            fresh: batch,
            status,
            total: None,
        })
    }
}
