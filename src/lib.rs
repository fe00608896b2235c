//! Simulated annealing over permutation encodings.
//!
//! A candidate solution is an ordered sequence of move-tokens; validity
//! requires each token to appear exactly once. The generic engine drives the
//! iterate/cool/terminate loop, while problem models supply decoding,
//! costing, and neighborhood moves through the [`sa::SaProblem`] trait:
//!
//! - **Job-shop scheduling**: tokens are (job, operation) pairs; decoding
//!   builds a feasible schedule and costs it by makespan.
//! - **Traveling salesman**: tokens are city indices; decoding costs the
//!   cyclic tour distance.
//!
//! # Architecture
//!
//! The annealing loop (Boltzmann acceptance, geometric cooling, incumbent
//! tracking) is written once in [`sa`] and parameterized over the problem
//! trait. Problem models in [`problems`] own instance validation and the
//! encoding rules; the engine never inspects token contents. Randomness is
//! drawn from a single seedable generator owned by the runner, so runs with
//! the same seed reproduce identical trajectories.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on configs, instances, and decoded
//!   artifacts.
//! - `parallel`: rayon-based multi-start portfolio (`sa::run_portfolio`).

pub mod problems;
pub mod sa;
