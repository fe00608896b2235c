//! Job-shop scheduling: minimize makespan.
//!
//! A candidate is a permutation of every (job, operation) token. Decoding
//! walks the sequence in order and places each operation at the earliest
//! time both its machine and its job are free; the makespan is the end of
//! the last-finishing operation. Per-job precedence is enforced through the
//! accumulated job-completion time, not through sequence position, so any
//! permutation of the tokens decodes to a feasible schedule.

use super::InstanceError;
use crate::sa::{CandidateError, SaProblem};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// One step of a job: which machine it runs on and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    pub machine: usize,
    pub duration: u64,
}

impl Operation {
    pub fn new(machine: usize, duration: u64) -> Self {
        Self { machine, duration }
    }
}

/// Move-token of the permutation encoding: the `op`-th operation of job
/// `job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpId {
    pub job: usize,
    pub op: usize,
}

/// One operation placed on the timeline by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledOp {
    pub job: usize,
    pub op: usize,
    pub machine: usize,
    pub start: u64,
    pub end: u64,
    pub duration: u64,
}

/// Decoded artifact: operations in schedule order plus the makespan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    pub operations: Vec<ScheduledOp>,
    pub makespan: u64,
}

/// An immutable job-shop instance: for each job, its ordered operations.
///
/// Machine identifiers must be contiguous integers starting at 0 and every
/// job needs at least one operation; both are checked by
/// [`new`](JobShopInstance::new).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobShopInstance {
    jobs: Vec<Vec<Operation>>,
    num_machines: usize,
    total_ops: usize,
}

impl JobShopInstance {
    /// Builds an instance from per-job operation lists, validating the
    /// structural invariants.
    pub fn new(jobs: Vec<Vec<Operation>>) -> Result<Self, InstanceError> {
        if jobs.is_empty() {
            return Err(InstanceError::NoJobs);
        }

        let mut max_machine = 0;
        for (job, ops) in jobs.iter().enumerate() {
            if ops.is_empty() {
                return Err(InstanceError::EmptyJob { job });
            }
            for op in ops {
                max_machine = max_machine.max(op.machine);
            }
        }

        let num_machines = max_machine + 1;
        let mut used = vec![false; num_machines];
        for ops in &jobs {
            for op in ops {
                used[op.machine] = true;
            }
        }
        if let Some(machine) = used.iter().position(|&u| !u) {
            return Err(InstanceError::MachineGap { machine });
        }

        let total_ops = jobs.iter().map(Vec::len).sum();
        Ok(Self {
            jobs,
            num_machines,
            total_ops,
        })
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    pub fn total_operations(&self) -> usize {
        self.total_ops
    }

    fn operation(&self, token: OpId) -> Option<Operation> {
        self.jobs.get(token.job)?.get(token.op).copied()
    }
}

impl SaProblem for JobShopInstance {
    type Solution = Vec<OpId>;
    type Artifact = Schedule;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<OpId> {
        let mut tokens: Vec<OpId> = (0..self.jobs.len())
            .flat_map(|job| (0..self.jobs[job].len()).map(move |op| OpId { job, op }))
            .collect();
        tokens.shuffle(rng);
        tokens
    }

    fn decode(&self, solution: &Vec<OpId>) -> Result<(Schedule, f64), CandidateError> {
        if solution.len() != self.total_ops {
            return Err(CandidateError::LengthMismatch {
                expected: self.total_ops,
                actual: solution.len(),
            });
        }

        let mut seen: Vec<Vec<bool>> = self.jobs.iter().map(|ops| vec![false; ops.len()]).collect();
        let mut machine_free = vec![0u64; self.num_machines];
        let mut job_free = vec![0u64; self.jobs.len()];
        let mut operations = Vec::with_capacity(solution.len());
        let mut makespan = 0u64;

        // Tokens are processed strictly in candidate order: order is the
        // only thing the encoding communicates beyond token identity.
        for (position, &token) in solution.iter().enumerate() {
            let Some(Operation { machine, duration }) = self.operation(token) else {
                return Err(CandidateError::TokenOutOfRange { position });
            };
            if seen[token.job][token.op] {
                return Err(CandidateError::DuplicateToken { position });
            }
            seen[token.job][token.op] = true;

            let start = machine_free[machine].max(job_free[token.job]);
            let end = start + duration;
            machine_free[machine] = end;
            job_free[token.job] = end;
            makespan = makespan.max(end);

            operations.push(ScheduledOp {
                job: token.job,
                op: token.op,
                machine,
                start,
                end,
                duration,
            });
        }

        Ok((
            Schedule {
                operations,
                makespan,
            },
            makespan as f64,
        ))
    }

    fn neighbor<R: Rng>(&self, solution: &Vec<OpId>, rng: &mut R) -> Vec<OpId> {
        let mut neighbor = solution.clone();

        // Group candidate positions by the machine their token runs on;
        // only a swap within one machine's positions changes scheduling
        // order where it matters.
        let mut machine_positions: Vec<Vec<usize>> = vec![Vec::new(); self.num_machines];
        for (position, token) in neighbor.iter().enumerate() {
            machine_positions[self.jobs[token.job][token.op].machine].push(position);
        }

        let eligible: Vec<&Vec<usize>> = machine_positions
            .iter()
            .filter(|positions| positions.len() >= 2)
            .collect();
        let Some(&positions) = eligible.choose(rng) else {
            // No machine has two operations to reorder: defined no-op.
            return neighbor;
        };

        let picked = rand::seq::index::sample(rng, positions.len(), 2);
        neighbor.swap(positions[picked.index(0)], positions[picked.index(1)]);
        neighbor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::{SaConfig, SaRunner};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Three jobs on three machines, no two jobs visiting machines in the
    /// same order.
    fn three_job_instance() -> JobShopInstance {
        JobShopInstance::new(vec![
            vec![Operation::new(0, 3), Operation::new(1, 2), Operation::new(2, 2)],
            vec![Operation::new(0, 2), Operation::new(2, 1), Operation::new(1, 4)],
            vec![Operation::new(1, 4), Operation::new(0, 3), Operation::new(2, 1)],
        ])
        .unwrap()
    }

    fn all_tokens(instance: &JobShopInstance) -> Vec<OpId> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut tokens = instance.initial_solution(&mut rng);
        tokens.sort_by_key(|t| (t.job, t.op));
        tokens
    }

    #[test]
    fn test_instance_accessors() {
        let instance = three_job_instance();
        assert_eq!(instance.num_jobs(), 3);
        assert_eq!(instance.num_machines(), 3);
        assert_eq!(instance.total_operations(), 9);
    }

    #[test]
    fn test_instance_no_jobs() {
        assert_eq!(JobShopInstance::new(vec![]), Err(InstanceError::NoJobs));
    }

    #[test]
    fn test_instance_empty_job() {
        let result = JobShopInstance::new(vec![vec![Operation::new(0, 1)], vec![]]);
        assert_eq!(result, Err(InstanceError::EmptyJob { job: 1 }));
    }

    #[test]
    fn test_instance_machine_gap() {
        let result = JobShopInstance::new(vec![vec![
            Operation::new(0, 1),
            Operation::new(2, 1),
        ]]);
        assert_eq!(result, Err(InstanceError::MachineGap { machine: 1 }));
    }

    #[test]
    fn test_decode_respects_machine_and_job_availability() {
        let instance = three_job_instance();
        let mut rng = StdRng::seed_from_u64(11);
        let candidate = instance.initial_solution(&mut rng);

        let (schedule, cost) = instance.decode(&candidate).unwrap();

        // Replay the free-time tables over the schedule in decode order.
        let mut machine_free = vec![0u64; instance.num_machines()];
        let mut job_free = vec![0u64; instance.num_jobs()];
        for op in &schedule.operations {
            assert!(op.start >= machine_free[op.machine]);
            assert!(op.start >= job_free[op.job]);
            assert_eq!(op.end, op.start + op.duration);
            machine_free[op.machine] = op.end;
            job_free[op.job] = op.end;
        }
        let max_end = schedule.operations.iter().map(|op| op.end).max().unwrap();
        assert_eq!(schedule.makespan, max_end);
        assert!((cost - schedule.makespan as f64).abs() < 1e-15);
    }

    #[test]
    fn test_decode_sequential_candidate() {
        // Jobs laid out one after the other: every operation chains on its
        // own job, so the makespan is bounded below by each job's total work.
        let instance = three_job_instance();
        let candidate = all_tokens(&instance);

        let (schedule, _) = instance.decode(&candidate).unwrap();

        let job_work: Vec<u64> = vec![7, 7, 8];
        for (job, &work) in job_work.iter().enumerate() {
            let last_end = schedule
                .operations
                .iter()
                .filter(|op| op.job == job)
                .map(|op| op.end)
                .max()
                .unwrap();
            assert!(last_end >= work);
        }
        assert!(schedule.makespan >= 8);
    }

    #[test]
    fn test_decode_wrong_length() {
        let instance = three_job_instance();
        let mut candidate = all_tokens(&instance);
        candidate.pop();

        assert_eq!(
            instance.decode(&candidate),
            Err(CandidateError::LengthMismatch {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn test_decode_duplicate_token() {
        let instance = three_job_instance();
        let mut candidate = all_tokens(&instance);
        candidate[3] = candidate[0];

        assert_eq!(
            instance.decode(&candidate),
            Err(CandidateError::DuplicateToken { position: 3 })
        );
    }

    #[test]
    fn test_decode_token_out_of_range() {
        let instance = three_job_instance();
        let mut candidate = all_tokens(&instance);
        candidate[5] = OpId { job: 7, op: 0 };

        assert_eq!(
            instance.decode(&candidate),
            Err(CandidateError::TokenOutOfRange { position: 5 })
        );
    }

    #[test]
    fn test_neighbor_swaps_within_one_machine() {
        let instance = three_job_instance();
        let mut rng = StdRng::seed_from_u64(3);
        let candidate = instance.initial_solution(&mut rng);

        for _ in 0..50 {
            let neighbor = instance.neighbor(&candidate, &mut rng);
            let changed: Vec<usize> = (0..candidate.len())
                .filter(|&i| candidate[i] != neighbor[i])
                .collect();

            assert_eq!(changed.len(), 2, "exactly one swap expected");
            let (i, j) = (changed[0], changed[1]);
            assert_eq!(candidate[i], neighbor[j]);
            assert_eq!(candidate[j], neighbor[i]);

            let machine_of = |t: OpId| instance.operation(t).unwrap().machine;
            assert_eq!(machine_of(candidate[i]), machine_of(candidate[j]));
        }
    }

    #[test]
    fn test_neighbor_degenerate_is_noop() {
        // Two single-operation jobs on different machines: no machine has
        // two operations, so the neighborhood is empty.
        let instance = JobShopInstance::new(vec![
            vec![Operation::new(0, 5)],
            vec![Operation::new(1, 2)],
        ])
        .unwrap();
        let candidate = vec![OpId { job: 1, op: 0 }, OpId { job: 0, op: 0 }];

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(instance.neighbor(&candidate, &mut rng), candidate);
    }

    #[test]
    fn test_anneal_two_jobs_two_machines() {
        // Both jobs run machine 0 for 2 then machine 1 for 3. Machine 1 is
        // the bottleneck: 6 units of work that cannot start before time 2,
        // so the optimum interleaving finishes at 8.
        let instance = JobShopInstance::new(vec![
            vec![Operation::new(0, 2), Operation::new(1, 3)],
            vec![Operation::new(0, 2), Operation::new(1, 3)],
        ])
        .unwrap();
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.01)
            .with_cooling_rate(0.95)
            .with_iterations_per_temperature(50)
            .with_seed(42);

        let result = SaRunner::run(&instance, &config).unwrap();

        // Machine 1 processes 3+3=6 time units and cannot start before 2.
        assert!(result.best_cost >= 8.0 - 1e-9, "makespan below the lower bound");
        assert!((result.best_cost - 8.0).abs() < 1e-9, "optimum not found");
        assert_eq!(result.best_artifact.makespan, 8);

        // A job's later-decoded operations never complete before its
        // earlier-decoded ones.
        for job in 0..instance.num_jobs() {
            let ends: Vec<u64> = result
                .best_artifact
                .operations
                .iter()
                .filter(|op| op.job == job)
                .map(|op| op.end)
                .collect();
            assert!(ends.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_anneal_three_job_instance_converges() {
        let instance = three_job_instance();
        let config = SaConfig::default()
            .with_initial_temperature(1000.0)
            .with_min_temperature(0.01)
            .with_cooling_rate(0.99)
            .with_iterations_per_temperature(1)
            .with_max_iterations(2000)
            .with_seed(42);

        let result = SaRunner::run(&instance, &config).unwrap();

        // Job 2 alone needs 8 time units; a correct engine can never
        // report less.
        assert!(result.best_cost >= 8.0 - 1e-9);
        assert!(result.best_cost <= 14.0, "poor convergence: {}", result.best_cost);
        let (_, decoded_cost) = instance.decode(&result.best).unwrap();
        assert!((decoded_cost - result.best_cost).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_neighbor_preserves_permutation(seed in any::<u64>()) {
            let instance = three_job_instance();
            let mut rng = StdRng::seed_from_u64(seed);
            let candidate = instance.initial_solution(&mut rng);
            let neighbor = instance.neighbor(&candidate, &mut rng);

            let mut before = candidate.clone();
            let mut after = neighbor.clone();
            before.sort_by_key(|t| (t.job, t.op));
            after.sort_by_key(|t| (t.job, t.op));
            prop_assert_eq!(before, after);

            let changed = (0..candidate.len())
                .filter(|&i| candidate[i] != neighbor[i])
                .count();
            prop_assert!(changed == 0 || changed == 2);
        }
    }
}
