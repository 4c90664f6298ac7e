//! Pagination types and traits
//!
//! Defines the delegate seams every paginator is built from: retrieval,
//! filtering and tracking, plus the per-call result bookkeeping.

use crate::error::Result;
use crate::types::Top;
use serde::Serialize;
use std::time::Instant;

// ============================================================================
// Requests
// ============================================================================

/// Parameters of one offset/limit retrieval round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Raw (unfiltered) offset to start from
    pub offset: usize,
    /// Maximum number of raw items to return
    pub limit: usize,
    /// 0-based round within the current call
    pub round: usize,
    /// Deadline of the current call, if one is configured
    pub deadline: Option<Instant>,
}

/// Parameters of one top-window retrieval round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopRequest {
    /// Maximum number of raw items to return from the start of the source
    pub window: usize,
    /// 0-based round within the current call
    pub round: usize,
    /// Deadline of the current call, if one is configured
    pub deadline: Option<Instant>,
}

// ============================================================================
// Delegates
// ============================================================================

/// Fetches raw items by offset and limit
///
/// Returning fewer than `request.limit` items means the source is exhausted.
pub trait Retriever<T> {
    /// Fetch up to `request.limit` raw items starting at `request.offset`
    fn retrieve(&self, request: &FetchRequest) -> Result<Vec<T>>;
}

impl<T, F> Retriever<T> for F
where
    F: Fn(&FetchRequest) -> Result<Vec<T>>,
{
    fn retrieve(&self, request: &FetchRequest) -> Result<Vec<T>> {
        self(request)
    }
}

/// Fetches a capped prefix of a source along with its total size
pub trait TopSource<T> {
    /// Fetch the first `request.window` raw items and the source total
    fn top(&self, request: &TopRequest) -> Result<Top<T>>;
}

impl<T, F> TopSource<T> for F
where
    F: Fn(&TopRequest) -> Result<Top<T>>,
{
    fn top(&self, request: &TopRequest) -> Result<Top<T>> {
        self(request)
    }
}

/// A query descriptor addressed by page number and page size
pub trait PagedQuery {
    /// Set the 1-based page number
    fn set_page_number(&mut self, page_number: usize);

    /// Set the page size
    fn set_page_size(&mut self, page_size: usize);
}

/// Runs a paged query descriptor against its backing store
pub trait QueryRetriever<Q, T> {
    /// Fetch the page currently described by `query`
    fn retrieve(&self, query: &Q, request: &FetchRequest) -> Result<Vec<T>>;
}

impl<Q, T, F> QueryRetriever<Q, T> for F
where
    F: Fn(&Q, &FetchRequest) -> Result<Vec<T>>,
{
    fn retrieve(&self, query: &Q, request: &FetchRequest) -> Result<Vec<T>> {
        self(query, request)
    }
}

/// Post-retrieval predicate
pub trait Filter<T> {
    /// Check whether `item` belongs in the result set
    fn matches(&self, item: &T) -> Result<bool>;
}

impl<T, F> Filter<T> for F
where
    F: Fn(&T) -> Result<bool>,
{
    fn matches(&self, item: &T) -> Result<bool> {
        self(item)
    }
}

/// Filter that accepts every item
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<T> Filter<T> for AcceptAll {
    fn matches(&self, _item: &T) -> Result<bool> {
        Ok(true)
    }
}

/// Adapts an infallible `Fn(&T) -> bool` predicate into a [`Filter`]
#[derive(Debug, Clone, Copy)]
pub struct Predicate<F>(pub F);

impl<T, F> Filter<T> for Predicate<F>
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, item: &T) -> Result<bool> {
        Ok((self.0)(item))
    }
}

/// Caller-owned context that every retrieved item is attached to before
/// the filter runs
pub trait Tracker<T> {
    /// Register a freshly retrieved item
    fn attach(&mut self, item: &T) -> Result<()>;
}

/// Records clones of every attached item in attach order
impl<T: Clone> Tracker<T> for Vec<T> {
    fn attach(&mut self, item: &T) -> Result<()> {
        self.push(item.clone());
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Why an accumulation run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough filtered items were accumulated
    Satisfied,
    /// The source returned less than was asked for
    Exhausted,
    /// The source reported nothing left to examine before any scanning
    Drained,
}

impl StopReason {
    /// Check if the whole source was consumed
    pub fn reached_end(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Drained)
    }
}

/// Bookkeeping of one paginator call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Retrieval calls made
    pub rounds: usize,
    /// Raw items passed to the filter
    pub examined: usize,
    /// Filtered items accumulated before slicing
    pub matched: usize,
    /// Why the run stopped
    pub stop: StopReason,
    /// Last total reported by the source, if it reports one
    pub total: Option<usize>,
}

/// Items selected by one call plus the bookkeeping of how they were found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection<T> {
    /// The requested slice of the filtered sequence
    pub items: Vec<T>,
    /// How the items were found
    pub stats: RunStats,
}

impl<T> Selection<T> {
    /// Selection of a call that needed no retrieval
    pub(crate) fn empty() -> Self {
        Self {
            items: Vec::new(),
            stats: RunStats {
                rounds: 0,
                examined: 0,
                matched: 0,
                stop: StopReason::Satisfied,
                total: None,
            },
        }
    }
}
