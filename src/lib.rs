//! # siftpage
//!
//! Exact pagination over sources whose filter can only run after retrieval.
//!
//! When a filter cannot be pushed into the data source, asking the source
//! for one page and filtering it yields short, unpredictable pages. siftpage
//! keeps retrieving larger or further windows until enough filtered items
//! are known to serve the requested page, and stops as early as it can.
//!
//! ## Features
//!
//! - **Offset Retrieval**: `(offset, limit)` retrievers with fixed, geometric
//!   or median-reselect window growth
//! - **Paged Queries**: page-number/page-size query descriptors with a
//!   tracking context attached to every retrieved item
//! - **Top Windows**: top-N sources reporting their total size, served as
//!   numbered pages with a total
//! - **Run Limits**: round caps, deadlines and cancellation
//! - **YAML/JSON Configuration**: tuning knobs loaded from files
//!
//! ## Quick Start
//!
//! ```rust
//! use siftpage::pagination::{CorePaginator, FetchRequest, Predicate};
//! use siftpage::Result;
//!
//! let data: Vec<u32> = (1..=20).collect();
//! let retriever = |r: &FetchRequest| -> Result<Vec<u32>> {
//!     Ok(data.iter().skip(r.offset).take(r.limit).copied().collect())
//! };
//! let paginator = CorePaginator::new(retriever, Predicate(|n: &u32| n % 2 == 0));
//!
//! assert_eq!(paginator.select(5, 5)?, vec![12, 14, 16, 18, 20]);
//! # Ok::<(), siftpage::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  CorePaginator      WindowedQueryPaginator    TopWindowPaginator│
//! │  select(off, lim)   select(q, tracker, ...)   get_page(n)       │
//! └────────────────────────────────────────────────────────────────┘
//!                               │ RoundSource
//! ┌──────────────┬──────────────┴───────────┬─────────────────────┐
//! │  Accumulate  │  Growth                  │  Run Limits         │
//! ├──────────────┼──────────────────────────┼─────────────────────┤
//! │  filter      │  Fixed                   │  max_rounds         │
//! │  early stop  │  Geometric               │  timeout            │
//! │  skip/take   │  MedianReselect          │  cancel token       │
//! └──────────────┴──────────────────────────┴─────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod pagination;
pub mod types;

pub use config::PaginatorConfig;
pub use error::{Error, Result};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
