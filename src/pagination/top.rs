//! Top-window paginator
//!
//! Post-filter pagination over a source that serves capped prefixes ("top
//! N") together with its authoritative size. The window grows
//! geometrically and the search ends as soon as the reported size shows
//! nothing is left.

use super::engine::{
    accumulate, ensure_within_window, item_window, Cursor, Plan, Round, RoundSource, RoundStatus,
};
use super::growth::GrowthPolicy;
use super::limits::{CancelToken, RunLimits};
use super::types::{Filter, RunStats, StopReason, TopRequest, TopSource};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result};
use crate::types::Page;
use std::marker::PhantomData;
use std::time::Instant;

/// Page-number addressed post-filter paginator over a top-window source
///
/// ```
/// use siftpage::pagination::{Predicate, TopRequest, TopWindowPaginator};
/// use siftpage::{Result, Top};
///
/// let data: Vec<u32> = (0..100).collect();
/// let source = |r: &TopRequest| -> Result<Top<u32>> { Ok(Top::from_slice(&data, r.window)) };
/// let paginator = TopWindowPaginator::new(source, Predicate(|n: &u32| n % 10 == 0), 3)?;
///
/// let page = paginator.get_page(2)?;
/// assert_eq!(page.items, vec![30, 40, 50]);
/// assert_eq!(page.total_unfiltered_items, 100);
/// # Ok::<(), siftpage::Error>(())
/// ```
pub struct TopWindowPaginator<T, S, F> {
    source: S,
    filter: F,
    page_size: usize,
    initial_limit_multiple: usize,
    extended_search_limit_multiple: usize,
    limits: RunLimits,
    _item: PhantomData<fn() -> T>,
}

impl<T, S, F> TopWindowPaginator<T, S, F>
where
    S: TopSource<T>,
    F: Filter<T>,
{
    /// Create a paginator serving pages of `page_size` items
    pub fn new(source: S, filter: F, page_size: usize) -> Result<Self> {
        if page_size < 1 {
            return Err(Error::invalid_config("page_size", "must be at least 1"));
        }
        Ok(Self {
            source,
            filter,
            page_size,
            initial_limit_multiple: 1,
            extended_search_limit_multiple: 2,
            limits: RunLimits::default(),
            _item: PhantomData,
        })
    }

    /// Apply a configuration, validating it first
    pub fn with_config(mut self, config: &PaginatorConfig) -> Result<Self> {
        config.validate()?;
        let cancel = self.limits.cancel.take();
        self.initial_limit_multiple = config.initial_limit_multiple;
        self.extended_search_limit_multiple = config.extended_search_limit_multiple;
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

    /// Items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Multiple applied to the item limit for the first window
    pub fn initial_limit_multiple(&self) -> usize {
        self.initial_limit_multiple
    }

    /// Window growth factor between rounds
    pub fn extended_search_limit_multiple(&self) -> usize {
        self.extended_search_limit_multiple
    }

    /// Fetch the 1-based page `page_number`
    pub fn get_page(&self, page_number: usize) -> Result<Page<T>> {
        Ok(self.get_page_with_stats(page_number)?.0)
    }

    /// Like [`get_page`](Self::get_page), also reporting how the items were
    /// found
    ///
    /// The page total is the source size when the search stopped with enough
    /// matches or on a source with nothing left to examine, and the number of
    /// matches when a window covering the whole source still came up short.
    pub fn get_page_with_stats(&self, page_number: usize) -> Result<(Page<T>, RunStats)> {
        if page_number < 1 {
            return Err(Error::invalid_argument("page_number", "pages are numbered from 1"));
        }

        let item_offset = (page_number - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| Error::invalid_argument("page_number", "page offset overflows"))?;
        let (item_limit, initial_window) =
            item_window(item_offset, self.page_size, self.initial_limit_multiple)?;
        let plan = Plan {
            item_limit,
            initial_window,
            growth: GrowthPolicy::geometric(self.extended_search_limit_multiple),
            limits: &self.limits,
        };

        let mut rounds = TopRounds {
            source: &self.source,
        };
        let accumulated = accumulate(&mut rounds, &self.filter, &plan)?;
        let stats = accumulated.stats();

        let total = match stats.stop {
            StopReason::Satisfied | StopReason::Drained => stats.total.unwrap_or(0),
            StopReason::Exhausted => stats.matched,
        };
        let selection = accumulated.into_selection(item_offset, self.page_size);
        let page = Page::new(selection.items, page_number, self.page_size, total);
        Ok((page, stats))
    }
}

impl<T, S, F> std::fmt::Debug for TopWindowPaginator<T, S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopWindowPaginator")
            .field("page_size", &self.page_size)
            .field("initial_limit_multiple", &self.initial_limit_multiple)
            .field(
                "extended_search_limit_multiple",
                &self.extended_search_limit_multiple,
            )
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Rounds served by re-fetching a larger top window and skipping the prefix
/// already examined
struct TopRounds<'a, S> {
    source: &'a S,
}

impl<T, S> RoundSource<T> for TopRounds<'_, S>
where
    S: TopSource<T>,
{
    fn fetch(&mut self, cursor: &Cursor, deadline: Option<Instant>) -> Result<Round<T>> {
        let request = TopRequest {
            window: cursor.window,
            round: cursor.round,
            deadline,
        };
        let top = self.source.top(&request)?;
        ensure_within_window(cursor.window, top.items.len())?;

        let total = top.total_unfiltered_items;
        if cursor.raw_offset >= total {
            return Ok(Round {
                fresh: Vec::new(),
                status: RoundStatus::Drained,
                total: Some(total),
            });
        }

        let status = if cursor.window >= total {
            RoundStatus::Exhausted
        } else {
            RoundStatus::Open
        };
        Ok(Round {
            fresh: top.items.into_iter().skip(cursor.raw_offset).collect(),
            status,
            total: Some(total),
        })
    }
}
