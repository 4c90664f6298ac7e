//! Windowed-query paginator
//!
//! Post-filter pagination over a stateful query descriptor that pages by
//! page number and page size. Every retrieved item is attached to a
//! caller-owned tracking context before any item of its batch is filtered,
//! so filters may consult that context.

use super::engine::{
    accumulate, ensure_within_window, item_window, Cursor, Plan, Round, RoundSource, RoundStatus,
};
use super::growth::GrowthPolicy;
use super::limits::{CancelToken, RunLimits};
use super::types::{FetchRequest, Filter, PagedQuery, QueryRetriever, Selection, Tracker};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::trace;

// ============================================================================
// Query Descriptor
// ============================================================================

/// Minimal paged query: which entity set to read and which page of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Logical name of the queried entity set
    pub entity: String,
    /// 1-based page number
    pub page_number: usize,
    /// Page size
    pub page_size: usize,
}

impl QueryDescriptor {
    /// Create a descriptor positioned on the first page
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            page_number: 1,
            page_size: 0,
        }
    }

    /// Raw offset of the first item on the described page
    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1) * self.page_size
    }
}

impl PagedQuery for QueryDescriptor {
    fn set_page_number(&mut self, page_number: usize) {
        self.page_number = page_number;
    }

    fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[page={}, size={}]",
            self.entity, self.page_number, self.page_size
        )
    }
}

// ============================================================================
// Tracking Contexts
// ============================================================================

/// Tracker that ignores every item
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTracking;

impl<T> Tracker<T> for NoTracking {
    fn attach(&mut self, _item: &T) -> Result<()> {
        Ok(())
    }
}

/// Identity map keyed by a caller-supplied key function
///
/// The first attached instance of a key stays tracked; later instances with
/// the same key only bump [`attach_count`](Self::attach_count).
#[derive(Clone)]
pub struct IdentityMap<K, T> {
    key_of: fn(&T) -> K,
    entries: HashMap<K, T>,
    attach_count: usize,
}

impl<K, T> IdentityMap<K, T>
where
    K: Eq + Hash,
{
    /// Create an empty identity map
    pub fn new(key_of: fn(&T) -> K) -> Self {
        Self {
            key_of,
            entries: HashMap::new(),
            attach_count: 0,
        }
    }

    /// Check if an item with `key` is tracked
    pub fn is_attached(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Tracked item for `key`
    pub fn get(&self, key: &K) -> Option<&T> {
        self.entries.get(key)
    }

    /// Number of distinct tracked items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attach calls, including repeats
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for IdentityMap<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityMap")
            .field("entries", &self.entries)
            .field("attach_count", &self.attach_count)
            .finish_non_exhaustive()
    }
}

impl<K, T> Tracker<T> for IdentityMap<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    fn attach(&mut self, item: &T) -> Result<()> {
        let key = (self.key_of)(item);
        self.attach_count += 1;
        self.entries.entry(key).or_insert_with(|| item.clone());
        Ok(())
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Paginates a paged query descriptor whose filter cannot be pushed into
/// the query
///
/// Uses the same accumulation as [`CorePaginator`](super::CorePaginator) with a
/// fixed window; round `k` reads page `raw_offset / window + 1` of size
/// `window`. Callers must ask for pages aligned to `limit`.
pub struct WindowedQueryPaginator<Q, T, R, F> {
    retriever: R,
    filter: F,
    initial_limit_multiple: usize,
    limits: RunLimits,
    _query: PhantomData<fn(&Q) -> T>,
}

impl<Q, T, R, F> WindowedQueryPaginator<Q, T, R, F>
where
    Q: PagedQuery,
    R: QueryRetriever<Q, T>,
    F: Filter<T>,
{
    /// Create a paginator with the default configuration
    pub fn new(retriever: R, filter: F) -> Self {
        Self {
            retriever,
            filter,
            initial_limit_multiple: 1,
            limits: RunLimits::default(),
            _query: PhantomData,
        }
    }

    /// Apply a configuration, validating it first
    ///
    /// Page-number addressing needs a constant window, so any growth policy
    /// other than [`GrowthPolicy::Fixed`] is rejected.
    pub fn with_config(mut self, config: &PaginatorConfig) -> Result<Self> {
        config.validate()?;
        if !config.growth.is_fixed() {
            return Err(Error::invalid_config(
                "growth",
                "windowed query paging requires a fixed window",
            ));
        }
        let cancel = self.limits.cancel.take();
        self.initial_limit_multiple = config.initial_limit_multiple;
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

    /// Multiple applied to the item limit for the window
    pub fn initial_limit_multiple(&self) -> usize {
        self.initial_limit_multiple
    }

    /// Select `limit` filtered items after skipping `offset` filtered items,
    /// driving `query` page by page and attaching every retrieved item to
    /// `tracker`
    ///
    /// `offset` must be a multiple of `limit`.
    pub fn select<K>(
        &self,
        query: &mut Q,
        tracker: &mut K,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>>
    where
        K: Tracker<T>,
    {
        Ok(self.select_with_stats(query, tracker, offset, limit)?.items)
    }

    /// Like [`select`](Self::select), also reporting how the items were found
    pub fn select_with_stats<K>(
        &self,
        query: &mut Q,
        tracker: &mut K,
        offset: usize,
        limit: usize,
    ) -> Result<Selection<T>>
    where
        K: Tracker<T>,
    {
        if limit == 0 {
            return Err(Error::invalid_argument("limit", "must be at least 1"));
        }
        if offset % limit != 0 {
            return Err(Error::invalid_argument(
                "offset",
                format!("{offset} is not a multiple of limit {limit}"),
            ));
        }

        let (item_limit, initial_window) =
            item_window(offset, limit, self.initial_limit_multiple)?;
        let plan = Plan {
            item_limit,
            initial_window,
            growth: GrowthPolicy::Fixed,
            limits: &self.limits,
        };

        let mut rounds = QueryRounds {
            retriever: &self.retriever,
            query,
            tracker,
        };
        let accumulated = accumulate(&mut rounds, &self.filter, &plan)?;
        Ok(accumulated.into_selection(offset, limit))
    }
}

impl<Q, T, R, F> fmt::Debug for WindowedQueryPaginator<Q, T, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedQueryPaginator")
            .field("initial_limit_multiple", &self.initial_limit_multiple)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Rounds served by re-pointing a query descriptor
struct QueryRounds<'a, Q, R, K> {
    retriever: &'a R,
    query: &'a mut Q,
    tracker: &'a mut K,
}

impl<Q, T, R, K> RoundSource<T> for QueryRounds<'_, Q, R, K>
where
    Q: PagedQuery,
    R: QueryRetriever<Q, T>,
    K: Tracker<T>,
{
    fn fetch(&mut self, cursor: &Cursor, deadline: Option<Instant>) -> Result<Round<T>> {
        let page_number = cursor.raw_offset / cursor.window + 1;
        self.query.set_page_number(page_number);
        self.query.set_page_size(cursor.window);

        let request = FetchRequest {
            offset: cursor.raw_offset,
            limit: cursor.window,
            round: cursor.round,
            deadline,
        };
        let batch = self.retriever.retrieve(&*self.query, &request)?;
        ensure_within_window(cursor.window, batch.len())?;

        for item in &batch {
            self.tracker.attach(item)?;
        }
        trace!(page_number, attached = batch.len(), "Attached query page");

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
