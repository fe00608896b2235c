//! Parallel multi-start portfolio.
//!
//! Each annealing run owns its entire state, so independent runs with
//! distinct seeds can execute in parallel and only the best result is kept.

use super::config::SaConfig;
use super::runner::{SaResult, SaRunner};
use super::types::{CandidateError, SaProblem};
use rayon::prelude::*;

/// Runs `runs` independent annealing instances in parallel and returns the
/// best result.
///
/// Seeds are derived from `config.seed` (or an OS-random base when absent),
/// so a seeded portfolio is reproducible as a whole. The first encoding
/// violation from any run aborts the portfolio.
///
/// # Panics
/// Panics if `runs` is 0 or the configuration is invalid.
pub fn run_portfolio<P: SaProblem>(
    problem: &P,
    config: &SaConfig,
    runs: usize,
) -> Result<SaResult<P::Solution, P::Artifact>, CandidateError> {
    assert!(runs > 0, "portfolio needs at least one run");
    config.validate().expect("invalid SaConfig");

    let base_seed = config.seed.unwrap_or_else(rand::random);

    let results: Vec<SaResult<P::Solution, P::Artifact>> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let run_config = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            SaRunner::run(problem, &run_config)
        })
        .collect::<Result<_, _>>()?;

    Ok(results
        .into_iter()
        .min_by(|a, b| {
            a.best_cost
                .partial_cmp(&b.best_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("runs > 0"))
}
