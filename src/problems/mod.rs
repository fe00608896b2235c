//! Problem models plugged into the annealing engine.
//!
//! Each model owns its instance data, validates structural invariants at
//! construction time, and implements [`SaProblem`](crate::sa::SaProblem)
//! for decoding, costing, and neighbor generation.

use thiserror::Error;

pub mod job_shop;
pub mod tsp;

pub use job_shop::{JobShopInstance, OpId, Operation, Schedule, ScheduledOp};
pub use tsp::{Tour, TourInstance};

/// A problem instance violated a structural invariant.
///
/// Raised at construction time, before any annealing step runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// The instance declares no jobs at all.
    #[error("instance has no jobs")]
    NoJobs,

    /// A job must have at least one operation.
    #[error("job {job} has no operations")]
    EmptyJob { job: usize },

    /// Machine identifiers must be contiguous integers starting at 0.
    #[error("machine {machine} is never used; machine ids must be contiguous from 0")]
    MachineGap { machine: usize },

    /// The distance matrix declares no cities.
    #[error("distance matrix is empty")]
    EmptyMatrix,

    /// The distance matrix must be square.
    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Distances must be finite and non-negative.
    #[error("distance from {from} to {to} is {value}; distances must be finite and non-negative")]
    BadDistance { from: usize, to: usize, value: f64 },

    /// The self-distance of every city must be zero.
    #[error("self-distance of city {city} is {value}, expected 0")]
    NonZeroDiagonal { city: usize, value: f64 },
}
