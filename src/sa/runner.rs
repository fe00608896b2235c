//! SA execution loop.

use super::config::SaConfig;
use super::types::{CandidateError, SaProblem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Snapshot handed to the progress observer every
/// [`progress_interval`](SaConfig::progress_interval) iterations.
///
/// Rendering is the caller's concern; the engine only reports the numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEvent {
    /// Iterations completed so far.
    pub iteration: usize,

    /// Temperature at the time of the event.
    pub temperature: f64,

    /// Best cost found so far.
    pub best_cost: f64,
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone, A: Clone> {
    /// The best candidate found.
    pub best: S,

    /// Cost of the best candidate.
    pub best_cost: f64,

    /// Decoded artifact of the best candidate (schedule, tour, ...).
    pub best_artifact: A,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Best cost sampled at regular intervals for history tracking.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    ///
    /// Returns an error only when a decoded candidate violates the
    /// permutation encoding, which indicates a bug in the problem
    /// implementation; the run is aborted without a partial result.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`SaConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution, P::Artifact>, CandidateError> {
        Self::run_with_observer(problem, config, None)
    }

    /// Runs SA with an optional progress observer.
    pub fn run_with_observer<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        mut observer: Option<&mut dyn FnMut(ProgressEvent)>,
    ) -> Result<SaResult<P::Solution, P::Artifact>, CandidateError> {
        config.validate().expect("invalid SaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        // Initialize: seed current and best from one evaluation.
        let mut current = problem.initial_solution(&mut rng);
        let (initial_artifact, initial_cost) = problem.decode(&current)?;
        let mut current_cost = initial_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_artifact = initial_artifact;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        debug!(initial_cost, temperature, "starting annealing run");

        // Cost history: sample every N iterations
        let history_interval = 100.max(config.iterations_per_temperature);
        let mut cost_history = vec![best_cost];

        // The temperature check runs strictly before any acceptance
        // probability is computed at that temperature; together with
        // min_temperature > 0 from validate(), the exponent below never
        // divides by zero.
        while temperature > config.min_temperature {
            for _ in 0..config.iterations_per_temperature {
                if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                    break;
                }

                let neighbor = problem.neighbor(&current, &mut rng);
                let (neighbor_artifact, neighbor_cost) = problem.decode(&neighbor)?;
                let delta = neighbor_cost - current_cost;

                // Metropolis acceptance criterion
                let accept = if delta < 0.0 {
                    improving_moves += 1;
                    true
                } else {
                    let probability = (-delta / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                };

                if accept {
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted_moves += 1;

                    // Unconditional on the branch taken above: an accepted
                    // equal-cost move must still be compared against best.
                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        best_artifact = neighbor_artifact;
                        trace!(iteration = total_iterations, best_cost, "new incumbent");
                    }
                }

                total_iterations += 1;

                // Record history
                if total_iterations.is_multiple_of(history_interval) {
                    cost_history.push(best_cost);
                }

                if total_iterations.is_multiple_of(config.progress_interval) {
                    if let Some(cb) = observer.as_mut() {
                        cb(ProgressEvent {
                            iteration: total_iterations,
                            temperature,
                            best_cost,
                        });
                    }
                }
            }

            // Check hard iteration limit
            if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                break;
            }

            // Geometric cooling
            temperature *= config.cooling_rate;
        }

        // Final history entry
        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        debug!(
            best_cost,
            iterations = total_iterations,
            final_temperature = temperature,
            "annealing run finished"
        );

        Ok(SaResult {
            best,
            best_cost,
            best_artifact,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cost_history,
        })
    }
}
