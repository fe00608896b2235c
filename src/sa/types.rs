//! Core trait for Simulated Annealing.

use rand::Rng;
use thiserror::Error;

/// Permutation-completeness violation detected while decoding a candidate.
///
/// Candidates are produced by the engine itself (initial shuffle plus
/// neighbor moves), so any of these indicates a bug in a problem
/// implementation, not bad user input. The runner aborts the whole run on
/// the first occurrence: a corrupted trajectory makes the best-so-far
/// bookkeeping untrustworthy, so there is no partial-result salvage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The candidate does not contain one token per required move.
    #[error("candidate has {actual} tokens, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A token occurs more than once in the candidate.
    #[error("duplicate token at position {position}")]
    DuplicateToken { position: usize },

    /// A token does not name a valid move of the instance.
    #[error("token at position {position} is out of range")]
    TokenOutOfRange { position: usize },
}

/// Defines a Simulated Annealing problem over a permutation encoding.
///
/// The user implements initial-candidate construction, decoding, and
/// neighbor generation. The SA framework handles temperature management,
/// the acceptance criterion, and cooling.
///
/// # Minimization
///
/// SA minimizes the cost returned by [`decode`](SaProblem::decode). For
/// maximization, negate the cost.
///
/// # Examples
///
/// ```ignore
/// struct TspProblem { distances: Vec<Vec<f64>> }
///
/// impl SaProblem for TspProblem {
///     type Solution = Vec<usize>;
///     type Artifact = Vec<usize>;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
///         let mut tour: Vec<usize> = (0..self.distances.len()).collect();
///         tour.shuffle(rng);
///         tour
///     }
///
///     fn decode(&self, tour: &Vec<usize>) -> Result<(Vec<usize>, f64), CandidateError> {
///         let length: f64 = tour.windows(2).map(|w| self.distances[w[0]][w[1]]).sum();
///         Ok((tour.clone(), length))
///     }
///
///     fn neighbor<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Vec<usize> {
///         let mut new = tour.clone();
///         let picked = rand::seq::index::sample(rng, new.len(), 2);
///         new.swap(picked.index(0), picked.index(1));
///         new
///     }
/// }
/// ```
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem: Send + Sync {
    /// The candidate representation: an ordered sequence of move-tokens.
    type Solution: Clone + Send;

    /// What a candidate decodes to (a schedule, a tour) for reporting.
    type Artifact: Clone + Send;

    /// Creates a random initial candidate: every valid token exactly once,
    /// shuffled uniformly.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Decodes a candidate into its artifact and scalar cost. Lower is
    /// better.
    ///
    /// A structurally invalid candidate (wrong length, duplicate or
    /// out-of-range token) must fail fast with a [`CandidateError`] rather
    /// than silently produce a wrong cost.
    fn decode(&self, solution: &Self::Solution) -> Result<(Self::Artifact, f64), CandidateError>;

    /// Generates a neighbor of the current candidate without mutating it.
    ///
    /// The move must keep the result decodable. A degenerate neighborhood
    /// (no legal move exists) returns the input unchanged; this is a
    /// defined no-op, not an error.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;
}
