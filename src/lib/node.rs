//! Process-group roles and single-process wiring.
//!
//! The group has exactly five members with fixed identities: rank 0 is the
//! coordinator and ranks 1 through 4 are the category workers. Role
//! assignment is closed; any other rank is a fatal startup error.

use std::path::Path;
use std::thread;

use anyhow::{anyhow, Result};

use crate::category::{Category, NUM_CATEGORIES};
use crate::coordinator::Coordinator;
use crate::errors::StorymillError;
use crate::fabric::local::local_process_group;
use crate::worker::Worker;

/// Total process-group size: the coordinator plus one worker per category.
pub const NUM_ROLES: usize = NUM_CATEGORIES + 1;

/// A member of the fixed process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Coordinator,
    Worker(Category),
}

impl Role {
    /// Map a startup rank to its role.
    pub fn from_rank(rank: usize) -> Result<Self, StorymillError> {
        if rank == 0 {
            Ok(Role::Coordinator)
        } else {
            Category::from_rank(rank)
                .map(Role::Worker)
                .ok_or(StorymillError::InvalidRank { rank, expected: NUM_ROLES })
        }
    }

    /// This role's startup rank.
    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            Role::Coordinator => 0,
            Role::Worker(category) => category.rank(),
        }
    }

    /// Short identity used in log output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Role::Coordinator => "coordinator",
            Role::Worker(category) => category.label(),
        }
    }
}

/// Run all five roles in one process over the in-process fabric.
///
/// The coordinator runs on the calling thread's scope alongside one thread
/// per worker. Returns the number of paragraphs written to `output`.
pub fn run_local(
    input: &Path,
    output: &Path,
    threads_per_worker: usize,
    batch_size: usize,
) -> Result<u64> {
    let (coordinator_ends, worker_ends) = local_process_group();

    thread::scope(|scope| {
        let worker_handles: Vec<_> = worker_ends
            .into_iter()
            .map(|(category, mut link)| {
                let worker = Worker::new(category, threads_per_worker, batch_size);
                scope.spawn(move || worker.run(&mut link))
            })
            .collect();

        let written = Coordinator::new(input, output).run(coordinator_ends);

        let mut first_error = None;
        for handle in worker_handles {
            let result = handle
                .join()
                .map_err(|_| anyhow!("worker thread panicked"))
                .and_then(|r| r);
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        // A coordinator failure is the root cause when both sides fail.
        match (written, first_error) {
            (Err(e), _) => Err(e),
            (Ok(_), Some(e)) => Err(e),
            (Ok(n), None) => Ok(n),
        }
    })
}
