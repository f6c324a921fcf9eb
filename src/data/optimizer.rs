// ABOUTME: Branch-and-bound search for the cheapest fixed cache refresh schedule
// One token arrives per step; refresh positions are searched in parallel per first split

use super::cost_model::CostModel;
use crate::utils::error::{Result, SimError};
use crossbeam_channel::bounded;
use std::thread;
use tracing::debug;

/// A refresh schedule and its simulated cost
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    /// Strictly increasing steps after which the cache is rewritten
    pub splits: Vec<usize>,
    pub cost: f64,
}

/// Best schedule across every refresh count that was searched
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalPlan {
    pub refreshes: usize,
    pub plan: SplitPlan,
}

/// Cost of a context of `length` single-token steps, refreshing after each step in `times`.
/// `times` must be sorted.
pub fn scheduled_cost(times: &[usize], length: usize) -> f64 {
    let mut model = CostModel::new();
    for n in 0..length {
        model.infer(1);
        if times.binary_search(&n).is_ok() {
            model.make_cache();
        }
    }
    model.cost()
}

/// Pruning estimate for a partial schedule holding `depth` of `total` splits
pub fn estimate_min_cost(splits: &[usize], depth: usize, length: usize, total: usize) -> f64 {
    if depth == 0 {
        return 0.0;
    }
    let last_split = splits[depth - 1];
    let remaining_splits = total - depth;
    let remaining_length = length - last_split;
    (remaining_splits * remaining_length) as f64 * (3.0 + 0.3 * depth as f64) / 1e6
}

/// Uncached reference cost of a context of `length` tokens, in USD
pub fn uncached_reference_cost(length: usize) -> f64 {
    3.0 * (length as f64).powi(2) / 2e6
}

struct SearchState {
    depth: usize,
    last_split: usize,
    splits: Vec<usize>,
}

/// Depth-first search over every schedule starting at `first`
fn search_from(first: usize, total: usize, length: usize) -> SplitPlan {
    let mut best = SplitPlan {
        splits: Vec::new(),
        cost: f64::INFINITY,
    };

    let mut splits = vec![0; total];
    splits[0] = first;
    let mut stack = vec![SearchState {
        depth: 1,
        last_split: first,
        splits,
    }];

    while let Some(SearchState {
        depth,
        last_split,
        mut splits,
    }) = stack.pop()
    {
        if depth == total {
            let cost = scheduled_cost(&splits, length);
            if cost < best.cost {
                best = SplitPlan { splits, cost };
            }
            continue;
        }

        for j in (last_split + 1)..=(length - (total - depth)) {
            splits[depth] = j;
            if estimate_min_cost(&splits, depth + 1, length, total) < best.cost {
                stack.push(SearchState {
                    depth: depth + 1,
                    last_split: j,
                    splits: splits.clone(),
                });
            }
        }
    }

    best
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Cheapest schedule with exactly `total` refreshes over `length` steps
pub fn optimize_splits(total: usize, length: usize) -> Result<SplitPlan> {
    optimize_splits_with_workers(total, length, default_workers())
}

/// Same as [`optimize_splits`] with an explicit worker count.
///
/// Every first split is searched independently, so the result does not depend
/// on the number of workers. Ties go to the earliest first split.
pub fn optimize_splits_with_workers(total: usize, length: usize, workers: usize) -> Result<SplitPlan> {
    if total == 0 || total > length {
        return Err(SimError::InvalidSchedule {
            splits: total,
            length,
        });
    }

    let candidates = length - total + 1;
    let workers = workers.clamp(1, candidates);

    let (job_tx, job_rx) = bounded::<usize>(candidates);
    let (result_tx, result_rx) = bounded::<(usize, SplitPlan)>(candidates);

    for first in 0..candidates {
        job_tx.send(first)?;
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for first in job_rx.iter() {
                    let plan = search_from(first, total, length);
                    if result_tx.send((first, plan)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<(usize, SplitPlan)> = result_rx.iter().collect();
    results.sort_by_key(|(first, _)| *first);

    let mut best: Option<SplitPlan> = None;
    for (_, plan) in results {
        if best.as_ref().map_or(true, |b| plan.cost < b.cost) {
            best = Some(plan);
        }
    }

    best.ok_or(SimError::InvalidSchedule {
        splits: total,
        length,
    })
}

/// Search refresh counts `1..=max_refreshes`, reporting each result through `on_plan`
pub fn find_optimal_n<F>(max_refreshes: usize, length: usize, mut on_plan: F) -> Result<OptimalPlan>
where
    F: FnMut(usize, &SplitPlan),
{
    let upper = max_refreshes.min(length);
    if upper == 0 {
        return Err(SimError::InvalidSchedule {
            splits: max_refreshes,
            length,
        });
    }

    let mut optimal: Option<OptimalPlan> = None;
    for refreshes in 1..=upper {
        let plan = optimize_splits(refreshes, length)?;
        debug!(refreshes, cost = plan.cost, splits = ?plan.splits, "optimized refresh schedule");
        on_plan(refreshes, &plan);

        if optimal.as_ref().map_or(true, |o| plan.cost < o.plan.cost) {
            optimal = Some(OptimalPlan { refreshes, plan });
        }
    }

    optimal.ok_or(SimError::InvalidSchedule {
        splits: max_refreshes,
        length,
    })
}
