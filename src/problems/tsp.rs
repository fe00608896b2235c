//! Traveling salesman: minimize cyclic tour distance.
//!
//! A candidate is a permutation of all city indices; position is visit
//! order. The cost is the sum of consecutive edges plus the closing edge
//! back to the start.

use super::InstanceError;
use crate::sa::{CandidateError, SaProblem};
use rand::seq::SliceRandom;
use rand::Rng;

/// Decoded artifact: the visit order and its total cyclic distance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    pub order: Vec<usize>,
    pub length: f64,
}

/// An immutable TSP instance: a square matrix of pairwise distances.
///
/// The matrix must be square with a zero diagonal and finite, non-negative
/// entries; all of it is checked by [`new`](TourInstance::new). The matrix
/// does not have to be symmetric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourInstance {
    distances: Vec<Vec<f64>>,
}

impl TourInstance {
    /// Builds an instance from a distance matrix, validating the structural
    /// invariants.
    pub fn new(distances: Vec<Vec<f64>>) -> Result<Self, InstanceError> {
        if distances.is_empty() {
            return Err(InstanceError::EmptyMatrix);
        }

        let expected = distances.len();
        for (row, entries) in distances.iter().enumerate() {
            if entries.len() != expected {
                return Err(InstanceError::NotSquare {
                    row,
                    len: entries.len(),
                    expected,
                });
            }
            for (col, &value) in entries.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(InstanceError::BadDistance {
                        from: row,
                        to: col,
                        value,
                    });
                }
            }
            if distances[row][row] != 0.0 {
                return Err(InstanceError::NonZeroDiagonal {
                    city: row,
                    value: distances[row][row],
                });
            }
        }

        Ok(Self { distances })
    }

    pub fn num_cities(&self) -> usize {
        self.distances.len()
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }
}

impl SaProblem for TourInstance {
    type Solution = Vec<usize>;
    type Artifact = Tour;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut tour: Vec<usize> = (0..self.num_cities()).collect();
        tour.shuffle(rng);
        tour
    }

    fn decode(&self, solution: &Vec<usize>) -> Result<(Tour, f64), CandidateError> {
        let n = self.num_cities();
        if solution.len() != n {
            return Err(CandidateError::LengthMismatch {
                expected: n,
                actual: solution.len(),
            });
        }

        let mut seen = vec![false; n];
        for (position, &city) in solution.iter().enumerate() {
            if city >= n {
                return Err(CandidateError::TokenOutOfRange { position });
            }
            if seen[city] {
                return Err(CandidateError::DuplicateToken { position });
            }
            seen[city] = true;
        }

        let mut length = 0.0;
        for pair in solution.windows(2) {
            length += self.distances[pair[0]][pair[1]];
        }
        // Closing edge back to the start of the cycle.
        length += self.distances[solution[n - 1]][solution[0]];

        Ok((
            Tour {
                order: solution.clone(),
                length,
            },
            length,
        ))
    }

    fn neighbor<R: Rng>(&self, solution: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut neighbor = solution.clone();
        if neighbor.len() < 2 {
            // A single city has no swap move: defined no-op.
            return neighbor;
        }
        let picked = rand::seq::index::sample(rng, neighbor.len(), 2);
        neighbor.swap(picked.index(0), picked.index(1));
        neighbor
    }
}
