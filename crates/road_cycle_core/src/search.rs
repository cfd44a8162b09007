//! Randomized swap/rotate local search over closed tours.
//!
//! The loop is bounded: a fixed number of rounds, no convergence check and no
//! early exit. A candidate replaces the current best only when it is strictly
//! cheaper.

use std::thread;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{City, Error, Result, Tour};

pub const DEFAULT_ROUNDS: usize = 10_001;
pub const DEFAULT_SEED: u64 = 12_345;

const PROGRESS_LOG_INTERVAL: usize = 1_000;
const THREAD_FALLBACK_PARALLELISM: usize = 2;

const ERR_ZERO_RESTARTS: &str = "restarts must be > 0";
const ERR_NO_RESULTS: &str = "No results";

/// Source of uniform tour positions.
pub trait IndexSource {
    /// Returns a uniform index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<R: Rng> IndexSource for R {
    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Which tour the rotate move is scored on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RotationScore {
    /// Score the tour as it was before rotating. The comparison is then
    /// `best` against itself, so a rotation is never accepted.
    #[default]
    PreRotation,
    /// Score the rotated tour.
    PostRotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Perturb-and-compare rounds after the initial swap.
    pub rounds: usize,
    pub seed: u64,
    /// Independent search loops. `1` runs the plain single-threaded search;
    /// more fan out over a thread pool and keep the cheapest result.
    pub restarts: usize,
    pub rotation_score: RotationScore,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            seed: DEFAULT_SEED,
            restarts: 1,
            rotation_score: RotationScore::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub tour: Tour,
    pub cost: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct TourOptimizer {
    rounds: usize,
    rotation_score: RotationScore,
}

impl TourOptimizer {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            rounds: config.rounds,
            rotation_score: config.rotation_score,
        }
    }

    /// Runs the search from `tour`, calling `on_round(round, best_cost)` after
    /// every round.
    pub fn search<S, F>(&self, tour: &Tour, source: &mut S, mut on_round: F) -> Result<Solution>
    where
        S: IndexSource + ?Sized,
        F: FnMut(usize, f64),
    {
        let n = tour.len();
        let i = source.next_index(n);
        let j = source.next_index(n);
        let (mut best, mut best_cost) = tour.swap(i, j)?;

        log::debug!("search.loop: start n={n} rounds={} initial={best_cost:.4}", self.rounds);

        for round in 0..self.rounds {
            let rotated = best.rotate();
            let rotated_cost = match self.rotation_score {
                RotationScore::PreRotation => best.cost(),
                RotationScore::PostRotation => rotated.cost(),
            };
            if best_cost > rotated_cost {
                best = rotated;
                best_cost = rotated_cost;
            }

            let i = source.next_index(n);
            let j = source.next_index(n);
            let (swapped, swapped_cost) = best.swap(i, j)?;
            if best_cost > swapped_cost {
                log::trace!("search.swap: accepted round={round} i={i} j={j} cost={swapped_cost:.4}");
                best = swapped;
                best_cost = swapped_cost;
            }

            on_round(round, best_cost);

            if (round + 1) % PROGRESS_LOG_INTERVAL == 0 {
                log::debug!("search.loop: round={} best={best_cost:.4}", round + 1);
            }
        }

        Ok(Solution {
            tour: best,
            cost: best_cost,
        })
    }

    fn search_restarts(&self, tour: &Tour, base_seed: u64, restarts: usize) -> Result<Solution> {
        let parallelism = threads().min(restarts);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .build()
            .map_err(|e| Error::other(format!("rayon pool: {e}")))?;

        log::info!("search.restarts: start restarts={restarts} threads={parallelism}");

        let results = pool.install(|| {
            generate_seeds(base_seed, restarts)
                .into_par_iter()
                .enumerate()
                .map(|(idx, seed)| -> Result<Solution> {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let solution = self.search(tour, &mut rng, |_, _| {})?;
                    log::debug!(
                        "search.restarts: done idx={idx} seed={seed} cost={:.4}",
                        solution.cost
                    );
                    Ok(solution)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        // `min_by` keeps the first of equal minima, i.e. the lowest restart index.
        results
            .into_iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .ok_or_else(|| Error::other(ERR_NO_RESULTS))
    }
}

/// Searches for a short cycle through `cities` with `iterations` rounds and a
/// `StdRng` seeded from `seed`.
pub fn optimize(cities: &[City], iterations: i64, seed: u64) -> Result<Solution> {
    let rounds =
        usize::try_from(iterations).map_err(|_| Error::InvalidIterationCount(iterations))?;
    optimize_with_config(
        cities,
        &SearchConfig {
            rounds,
            seed,
            ..SearchConfig::default()
        },
    )
}

pub fn optimize_with_config(cities: &[City], config: &SearchConfig) -> Result<Solution> {
    if config.restarts == 0 {
        return Err(Error::invalid_input(ERR_ZERO_RESTARTS));
    }
    let tour = Tour::new(cities.to_vec())?;
    let optimizer = TourOptimizer::new(config);

    log::info!(
        "search: start n={} rounds={} seed={} restarts={} initial={:.4}",
        tour.len(),
        config.rounds,
        config.seed,
        config.restarts,
        tour.cost()
    );

    let solution = if config.restarts == 1 {
        let mut rng = StdRng::seed_from_u64(config.seed);
        optimizer.search(&tour, &mut rng, |_, _| {})?
    } else {
        optimizer.search_restarts(&tour, config.seed, config.restarts)?
    };

    log::info!("search: complete best={:.4}", solution.cost);
    Ok(solution)
}

fn generate_seeds(base_seed: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(base_seed);
    (0..count).map(|_| rng.random::<u64>()).collect()
}

fn threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(THREAD_FALLBACK_PARALLELISM)
}
