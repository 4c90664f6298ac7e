//! Pagination module
//!
//! Supports: offset/limit retrievers, paged query descriptors, top-window sources
//!
//! # Overview
//!
//! Each paginator produces exact pages from a source whose filter can only
//! run after retrieval. They share one accumulation loop and differ in how a
//! round is fetched and how the window evolves between rounds:
//!
//! - [`CorePaginator`] - `(offset, limit)` retrieval, configurable [`GrowthPolicy`]
//! - [`WindowedQueryPaginator`] - page-number/page-size query descriptor, fixed
//!   window, every item attached to a [`Tracker`] before filtering
//! - [`TopWindowPaginator`] - top-N retrieval with an authoritative total,
//!   geometric window growth, page-number addressing

mod engine;
mod generic;
mod growth;
mod limits;
mod top;
mod types;
mod windowed;

pub use generic::CorePaginator;
pub use growth::GrowthPolicy;
pub use limits::{CancelToken, RunLimits};
pub use top::TopWindowPaginator;
pub use types::{
    AcceptAll, FetchRequest, Filter, PagedQuery, Predicate, QueryRetriever, Retriever, RunStats,
    Selection, StopReason, TopRequest, TopSource, Tracker,
};
pub use windowed::{IdentityMap, NoTracking, QueryDescriptor, WindowedQueryPaginator};
