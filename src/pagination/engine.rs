//! Accumulator loop shared by every paginator
//!
//! Each paginator adapts its retrieval primitive to a [`RoundSource`]; this
//! loop fetches rounds, filters fresh items in source order, and grows the
//! window until enough matches are accumulated or the source runs dry.

use super::growth::GrowthPolicy;
use super::limits::RunLimits;
use super::types::{Filter, RunStats, Selection, StopReason};
use crate::error::{Error, Result};
use std::time::Instant;
use tracing::debug;

/// Position of the next retrieval round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    /// 0-based round number
    pub round: usize,
    /// Raw items already examined
    pub raw_offset: usize,
    /// Raw items requested this round
    pub window: usize,
}

/// What a source says about the data beyond a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoundStatus {
    /// More data may follow
    Open,
    /// This round reached the end of the source
    Exhausted,
    /// Nothing past the cursor exists; `fresh` is empty
    Drained,
}

/// One fetched round, already trimmed to items not examined before
#[derive(Debug)]
pub(crate) struct Round<T> {
    pub fresh: Vec<T>,
    pub status: RoundStatus,
    /// Source size, for sources that report one
    pub total: Option<usize>,
}

/// Adapter from a retrieval primitive to the accumulator loop
pub(crate) trait RoundSource<T> {
    fn fetch(&mut self, cursor: &Cursor, deadline: Option<Instant>) -> Result<Round<T>>;
}

/// Inputs of one accumulation run
#[derive(Debug)]
pub(crate) struct Plan<'a> {
    /// Filtered matches needed from the start of the source
    pub item_limit: usize,
    pub initial_window: usize,
    pub growth: GrowthPolicy,
    pub limits: &'a RunLimits,
}

/// Matches accumulated from the start of the source
#[derive(Debug)]
pub(crate) struct Accumulated<T> {
    pub items: Vec<T>,
    pub rounds: usize,
    pub examined: usize,
    pub stop: StopReason,
    pub total: Option<usize>,
}

impl<T> Accumulated<T> {
    /// Cut the requested page out of the accumulated matches
    pub fn into_selection(self, offset: usize, limit: usize) -> Selection<T> {
        let stats = self.stats();
        Selection {
            items: self.items.into_iter().skip(offset).take(limit).collect(),
            stats,
        }
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            rounds: self.rounds,
            examined: self.examined,
            matched: self.items.len(),
            stop: self.stop,
            total: self.total,
        }
    }
}

/// Item limit and first window for a request of `limit` items after
/// `offset` filtered matches
pub(crate) fn item_window(offset: usize, limit: usize, multiple: usize) -> Result<(usize, usize)> {
    let item_limit = offset
        .checked_add(limit)
        .ok_or_else(|| Error::invalid_argument("limit", "offset + limit overflows"))?;
    let initial_window = item_limit.checked_mul(multiple).ok_or_else(|| {
        Error::invalid_argument("limit", "initial window overflows for this limit multiple")
    })?;
    Ok((item_limit, initial_window))
}

/// Reject batches larger than the window they answer
pub(crate) fn ensure_within_window(requested: usize, returned: usize) -> Result<()> {
    if returned > requested {
        return Err(Error::OversizedBatch {
            requested,
            returned,
        });
    }
    Ok(())
}

/// Run rounds against `source` until `plan.item_limit` matches are found or
/// the source ends
pub(crate) fn accumulate<T, S, F>(
    source: &mut S,
    filter: &F,
    plan: &Plan<'_>,
) -> Result<Accumulated<T>>
where
    S: RoundSource<T>,
    F: Filter<T>,
{
    let mut acc = Accumulated {
        items: Vec::new(),
        rounds: 0,
        examined: 0,
        stop: StopReason::Satisfied,
        total: None,
    };

    if plan.item_limit == 0 {
        return Ok(acc);
    }

    let guard = plan.limits.start();
    let mut cursor = Cursor {
        round: 0,
        raw_offset: 0,
        window: plan.initial_window.max(1),
    };

    loop {
        guard.check(cursor.round)?;

        let round = source.fetch(&cursor, guard.deadline())?;
        acc.rounds += 1;
        if round.total.is_some() {
            acc.total = round.total;
        }

        let fetched = round.fresh.len();
        debug!(
            round = cursor.round,
            raw_offset = cursor.raw_offset,
            window = cursor.window,
            fetched,
            accumulated = acc.items.len(),
            "Fetched post-filter round"
        );

        if round.status == RoundStatus::Drained {
            return Ok(finish(acc, StopReason::Drained));
        }

        for item in round.fresh {
            acc.examined += 1;
            if filter.matches(&item)? {
                acc.items.push(item);
                if acc.items.len() >= plan.item_limit {
                    return Ok(finish(acc, StopReason::Satisfied));
                }
            }
        }

        if round.status == RoundStatus::Exhausted {
            return Ok(finish(acc, StopReason::Exhausted));
        }

        let remaining = plan.item_limit - acc.items.len();
        let mut window = plan.growth.next_window(cursor.window, remaining);
        if let Some(total) = round.total {
            window = window.min(total).max(1);
        }

        cursor = Cursor {
            round: cursor.round + 1,
            raw_offset: cursor.raw_offset + fetched,
            window,
        };
    }
}

fn finish<T>(mut acc: Accumulated<T>, stop: StopReason) -> Accumulated<T> {
    debug!(
        ?stop,
        rounds = acc.rounds,
        examined = acc.examined,
        matched = acc.items.len(),
        "Post-filter accumulation finished"
    );
    acc.stop = stop;
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::types::Predicate;

    /// In-memory source that serves `data` by offset and records windows
    struct VecSource {
        data: Vec<u32>,
        windows: Vec<usize>,
    }

    impl RoundSource<u32> for VecSource {
        fn fetch(&mut self, cursor: &Cursor, _deadline: Option<Instant>) -> Result<Round<u32>> {
            self.windows.push(cursor.window);
            let fresh: Vec<u32> = self
                .data
                .iter()
                .skip(cursor.raw_offset)
                .take(cursor.window)
                .copied()
                .collect();
            let status = if fresh.len() < cursor.window {
                RoundStatus::Exhausted
            } else {
                RoundStatus::Open
            };
            Ok(Round {
                fresh,
                status,
                total: None,
            })
        }
    }

    fn source(len: u32) -> VecSource {
        VecSource {
            data: (1..=len).collect(),
            windows: Vec::new(),
        }
    }

    #[test]
    fn test_zero_item_limit_skips_retrieval() {
        let limits = RunLimits::new();
        let mut src = source(10);
        let plan = Plan {
            item_limit: 0,
            initial_window: 0,
            growth: GrowthPolicy::Fixed,
            limits: &limits,
        };
        let acc = accumulate(&mut src, &Predicate(|_: &u32| true), &plan).unwrap();
        assert!(acc.items.is_empty());
        assert_eq!(acc.rounds, 0);
        assert!(src.windows.is_empty());
    }

    #[test]
    fn test_stops_mid_round_once_satisfied() {
        let limits = RunLimits::new();
        let mut src = source(20);
        let plan = Plan {
            item_limit: 2,
            initial_window: 10,
            growth: GrowthPolicy::Fixed,
            limits: &limits,
        };
        let acc = accumulate(&mut src, &Predicate(|n: &u32| n % 3 == 0), &plan).unwrap();
        assert_eq!(acc.items, vec![3, 6]);
        assert_eq!(acc.examined, 6);
        assert_eq!(acc.stop, StopReason::Satisfied);
    }

    #[test]
    fn test_median_reselect_shrinks_towards_need() {
        let limits = RunLimits::new();
        let mut src = source(100);
        let plan = Plan {
            item_limit: 4,
            initial_window: 20,
            growth: GrowthPolicy::MedianReselect,
            limits: &limits,
        };
        // multiples of 30 are sparse: 30, 60, 90
        let acc = accumulate(&mut src, &Predicate(|n: &u32| n % 30 == 0), &plan).unwrap();
        assert_eq!(acc.items, vec![30, 60, 90]);
        assert_eq!(acc.stop, StopReason::Exhausted);
        assert_eq!(&src.windows[..3], &[20, 12, 8]);
        assert_eq!(acc.examined, 100);
    }

    #[test]
    fn test_selection_slices_after_accumulating() {
        let acc = Accumulated {
            items: vec![1, 2, 3, 4, 5],
            rounds: 2,
            examined: 9,
            stop: StopReason::Exhausted,
            total: None,
        };
        let selection = acc.into_selection(3, 5);
        assert_eq!(selection.items, vec![4, 5]);
        assert_eq!(selection.stats.matched, 5);
        assert_eq!(selection.stats.rounds, 2);
    }

    #[test]
    fn test_item_window() {
        assert_eq!(item_window(5, 5, 1).unwrap(), (10, 10));
        assert_eq!(item_window(0, 3, 4).unwrap(), (3, 12));
        assert!(item_window(usize::MAX, 1, 1).unwrap_err().is_argument_error());
        assert!(item_window(usize::MAX / 2, 1, 3).is_err());
    }

    #[test]
    fn test_ensure_within_window() {
        assert!(ensure_within_window(5, 5).is_ok());
        assert!(ensure_within_window(5, 0).is_ok());
        assert!(matches!(
            ensure_within_window(5, 6),
            Err(Error::OversizedBatch {
                requested: 5,
                returned: 6
            })
        ));
    }
}
