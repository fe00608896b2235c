//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The loop here is problem-agnostic: candidate construction, decoding,
//! and neighbor moves come from a [`SaProblem`] implementation, the
//! acceptance test and geometric cooling live in [`SaRunner`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
#[cfg(feature = "parallel")]
mod portfolio;
mod runner;
mod types;

pub use config::SaConfig;
#[cfg(feature = "parallel")]
pub use portfolio::run_portfolio;
pub use runner::{ProgressEvent, SaResult, SaRunner};
pub use types::{CandidateError, SaProblem};
