//! Worker role: transform one category's paragraphs with a local thread pool.
//!
//! A worker first runs its receive loop: for each announced paragraph it
//! splits the body into lines and farms fixed-size line batches into its
//! [`ThreadPool`], accumulating the paragraphs in arrival order. When the
//! coordinator's end-of-stream sentinel arrives, it drains and shuts down the
//! pool, then runs its send loop, returning every transformed paragraph in
//! the order it was received, followed by its own sentinel.
//!
//! Batch results are keyed by batch index rather than by completion order;
//! the transforms are line-local, so batch boundaries never affect output.

use std::sync::{Arc, OnceLock};

use anyhow::{ensure, Context, Result};
use log::debug;

use crate::category::Category;
use crate::fabric::Channel;
use crate::pool::ThreadPool;
use crate::progress::ProgressTracker;
use crate::transform::LineTransform;
use crate::wire;

/// Default number of lines handed to one pool job.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Pool sizing used when the caller does not specify one: all cores but the
/// one running the worker's own receive/send loops, and at least one.
#[must_use]
pub fn default_worker_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get().saturating_sub(1).max(1))
}

/// A received paragraph whose line batches are being transformed in place on
/// the pool. Slot `i` holds the transformed lines of batch `i`.
struct PendingParagraph {
    index: i32,
    batches: Arc<Vec<OnceLock<Vec<String>>>>,
}

/// The worker role for one category.
pub struct Worker {
    category: Category,
    threads: usize,
    batch_size: usize,
}

impl Worker {
    #[must_use]
    pub fn new(category: Category, threads: usize, batch_size: usize) -> Self {
        Self { category, threads: threads.max(1), batch_size: batch_size.max(1) }
    }

    /// Run the receive loop, the pool drain, and the send loop over the link
    /// to the coordinator.
    pub fn run<C: Channel>(&self, link: &mut C) -> Result<()> {
        debug!("[{}] worker started ({} pool threads)", self.category, self.threads);

        let mut pool = ThreadPool::new();
        ensure!(pool.start(self.threads), "thread pool already running");

        let pending = self.receive_loop(link, &pool)?;

        // All line batches must land before anything is sent back.
        pool.drain();
        pool.shutdown();

        self.send_loop(link, &pending)?;
        debug!("[{}] worker finished ({} paragraphs)", self.category, pending.len());
        Ok(())
    }

    /// Pull paragraphs until the coordinator's sentinel, queueing line-range
    /// jobs as each body arrives.
    fn receive_loop<C: Channel>(
        &self,
        link: &mut C,
        pool: &ThreadPool,
    ) -> Result<Vec<PendingParagraph>> {
        let transform = self.category.transform();
        let tracker = ProgressTracker::new(format!("[{}] received paragraphs", self.category));
        let mut pending = Vec::new();

        loop {
            let index = wire::recv_index(link)?;
            if index < 0 {
                tracker.log_final();
                return Ok(pending);
            }
            let body = wire::recv_body(link)?;
            pending.push(self.enqueue_paragraph(pool, transform, index, &body)?);
            tracker.log_if_needed(1);
        }
    }

    /// Split a body into lines and submit one job per line batch.
    fn enqueue_paragraph(
        &self,
        pool: &ThreadPool,
        transform: LineTransform,
        index: i32,
        body: &str,
    ) -> Result<PendingParagraph> {
        let lines: Vec<String> = body.split('\n').map(str::to_string).collect();
        let line_batches: Vec<Vec<String>> =
            lines.chunks(self.batch_size).map(<[String]>::to_vec).collect();

        let batches: Arc<Vec<OnceLock<Vec<String>>>> =
            Arc::new((0..line_batches.len()).map(|_| OnceLock::new()).collect());

        for (batch_index, lines) in line_batches.into_iter().enumerate() {
            let batches = Arc::clone(&batches);
            let accepted = pool.submit(move || {
                let transformed: Vec<String> = lines.iter().map(|l| transform(l)).collect();
                // Batch indices are unique per paragraph, so this cannot
                // already be set.
                batches[batch_index].set(transformed).ok();
            });
            ensure!(accepted, "thread pool rejected a job mid-stream");
        }

        Ok(PendingParagraph { index, batches })
    }

    /// Return every transformed paragraph in arrival order, then the
    /// sentinel.
    fn send_loop<C: Channel>(&self, link: &mut C, pending: &[PendingParagraph]) -> Result<()> {
        for paragraph in pending {
            let mut lines: Vec<&str> = Vec::new();
            for batch in paragraph.batches.iter() {
                let transformed = batch
                    .get()
                    .with_context(|| format!("line batch of paragraph {} never completed", paragraph.index))?;
                lines.extend(transformed.iter().map(String::as_str));
            }
            wire::send_index(link, paragraph.index)?;
            wire::send_body(link, &lines.join("\n"))?;
        }
        Ok(wire::send_index(link, wire::END_OF_STREAM)?)
    }
}
