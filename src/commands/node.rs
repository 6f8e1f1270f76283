//! Run one member of the five-process group over TCP.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use storymill_lib::coordinator::Coordinator;
use storymill_lib::fabric::tcp::{accept_workers, connect_to_coordinator};
use storymill_lib::logging::OperationTimer;
use storymill_lib::node::Role;
use storymill_lib::validation::validate_file_exists;
use storymill_lib::worker::{default_worker_threads, Worker, DEFAULT_BATCH_SIZE};

use crate::commands::command::Command;

/// Run one process-group member.
///
/// Start exactly five processes against the same address: rank 0 (the
/// coordinator, which listens) plus ranks 1-4 (the genre workers, which
/// connect). Any other group composition is a fatal startup error.
#[derive(Debug, Parser)]
#[command(
    name = "node",
    about = "Run one member of the five-process group (rank 0 coordinates, ranks 1-4 work)"
)]
pub struct Node {
    /// Process-group rank: 0 = coordinator, 1 = horror, 2 = comedy,
    /// 3 = fantasy, 4 = science-fiction.
    #[arg(short = 'r', long = "rank")]
    pub rank: usize,

    /// Address the coordinator listens on and the workers connect to.
    #[arg(short = 'a', long = "addr", default_value = "127.0.0.1:7733")]
    pub addr: String,

    /// Input text file (coordinator rank only).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output text file (coordinator rank only).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Pool threads (worker ranks only). Defaults to available cores minus one.
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Lines handed to one pool job (worker ranks only).
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

impl Command for Node {
    fn execute(&self) -> Result<()> {
        let role = Role::from_rank(self.rank)?;
        info!("Starting as {} (rank {})", role.name(), self.rank);

        match role {
            Role::Coordinator => {
                let input = self
                    .input
                    .as_deref()
                    .context("--input is required for the coordinator rank")?;
                let output = self
                    .output
                    .as_deref()
                    .context("--output is required for the coordinator rank")?;
                validate_file_exists(input, "input file")?;

                let links = accept_workers(&self.addr)?;
                let timer = OperationTimer::new("Transforming paragraphs");
                let written = Coordinator::new(input, output).run(links)?;
                timer.log_completion(written, "paragraphs");
                Ok(())
            }
            Role::Worker(category) => {
                let threads = self.threads.unwrap_or_else(default_worker_threads);
                let mut link = connect_to_coordinator(&self.addr, category)?;
                Worker::new(category, threads, self.batch_size).run(&mut link)
            }
        }
    }
}
