//! Run the whole pipeline in a single process.

use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use storymill_lib::logging::OperationTimer;
use storymill_lib::node::run_local;
use storymill_lib::validation::validate_file_exists;
use storymill_lib::worker::{default_worker_threads, DEFAULT_BATCH_SIZE};

use crate::commands::command::Command;

/// Transform a story file in one process.
///
/// All five roles (the coordinator and the four genre workers) run as
/// threads of this process, joined by the in-process fabric. The wire
/// protocol is identical to the multi-process `node` deployment.
#[derive(Debug, Parser)]
#[command(
    name = "run",
    about = "Transform a genre-labeled story file in a single process"
)]
pub struct Run {
    /// Input text file: blank-line-delimited paragraphs, each headed by a
    /// genre label (horror, comedy, fantasy, science-fiction).
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output text file, written in original paragraph order.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Pool threads per worker. Defaults to the available cores minus one.
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Lines handed to one pool job.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

impl Command for Run {
    fn execute(&self) -> Result<()> {
        validate_file_exists(&self.input, "input file")?;
        let threads = self.threads.unwrap_or_else(default_worker_threads);
        info!(
            "Transforming {} -> {} ({threads} pool threads per worker)",
            self.input.display(),
            self.output.display()
        );

        let timer = OperationTimer::new("Transforming paragraphs");
        let written = run_local(&self.input, &self.output, threads, self.batch_size)?;
        timer.log_completion(written, "paragraphs");
        Ok(())
    }
}
