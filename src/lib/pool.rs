//! Bounded FIFO thread pool for line-level parallelism.
//!
//! Each worker role owns one pool and farms line-range jobs into it from its
//! receive loop. The pool is deliberately minimal: jobs have no identity, no
//! priority and no return value, so results must be written to a location
//! derived from the source data (a batch index) rather than from completion
//! order.
//!
//! # Single-producer contract
//!
//! Only the thread that called [`ThreadPool::start`] may call
//! [`submit`](ThreadPool::submit), [`drain`](ThreadPool::drain) or
//! [`shutdown`](ThreadPool::shutdown). Concurrent producers are intentionally
//! unsupported; the owning worker's receive loop is the sole producer.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

/// A unit of work with no identity and no return value.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Queue state guarded by the pool mutex.
struct PoolState {
    jobs: VecDeque<Job>,
    /// Jobs popped from the queue but still executing.
    in_flight: usize,
    shutdown: bool,
}

/// State shared between the producer and the executor threads.
struct Shared {
    state: Mutex<PoolState>,
    /// Signaled when a job is queued or shutdown is requested.
    job_ready: Condvar,
    /// Signaled when the queue empties and no job is executing.
    all_done: Condvar,
}

/// Single-producer, multi-consumer FIFO job pool.
pub struct ThreadPool {
    shared: Arc<Shared>,
    executors: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Create a pool with no executor threads. Call [`start`](Self::start)
    /// before submitting jobs.
    #[must_use]
    pub fn new() -> Self {
        let shared = Shared {
            state: Mutex::new(PoolState { jobs: VecDeque::new(), in_flight: 0, shutdown: true }),
            job_ready: Condvar::new(),
            all_done: Condvar::new(),
        };
        Self { shared: Arc::new(shared), executors: Vec::new() }
    }

    /// Spawn `num_threads` executor threads.
    ///
    /// Returns `false` (and does nothing) if the pool is already running.
    pub fn start(&mut self, num_threads: usize) -> bool {
        {
            let mut state = self.shared.state.lock();
            if !state.shutdown {
                return false;
            }
            state.shutdown = false;
        }

        for _ in 0..num_threads {
            let shared = Arc::clone(&self.shared);
            self.executors.push(thread::spawn(move || executor(&shared)));
        }
        true
    }

    /// Enqueue a job.
    ///
    /// Returns `false` if the pool has been shut down; otherwise the job is
    /// always accepted (the queue is unbounded, there is no backpressure).
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return false;
        }
        state.jobs.push_back(Box::new(job));
        self.shared.job_ready.notify_one();
        true
    }

    /// Block until every previously submitted job has finished executing.
    ///
    /// Returns immediately if the pool is shut down.
    pub fn drain(&self) {
        let mut state = self.shared.state.lock();
        while !state.shutdown && !(state.jobs.is_empty() && state.in_flight == 0) {
            self.shared.all_done.wait(&mut state);
        }
    }

    /// Signal executors to exit after their current job, join them and
    /// discard any unexecuted jobs.
    ///
    /// Returns `false` if the pool was already shut down.
    pub fn shutdown(&mut self) -> bool {
        {
            let mut state = self.shared.state.lock();
            if state.shutdown {
                return false;
            }
            state.shutdown = true;
        }
        self.shared.job_ready.notify_all();

        for handle in self.executors.drain(..) {
            // An executor only terminates on shutdown, so join cannot block
            // forever; a panicked job is not propagated to the producer.
            let _ = handle.join();
        }

        let mut state = self.shared.state.lock();
        state.jobs.clear();
        // Wake any drain() still parked on the condvar.
        self.shared.all_done.notify_all();
        true
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Executor loop: wait for shutdown or a queued job; exit on shutdown,
/// otherwise pop one job, run it outside the lock, and signal completion.
fn executor(shared: &Shared) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            break;
        }
        if let Some(job) = state.jobs.pop_front() {
            state.in_flight += 1;
            drop(state);
            job();
            state = shared.state.lock();
            state.in_flight -= 1;
            if state.jobs.is_empty() && state.in_flight == 0 {
                shared.all_done.notify_all();
            }
        } else {
            shared.job_ready.wait(&mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_start_twice_fails() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(2));
        assert!(!pool.start(2));
        assert!(pool.shutdown());
    }

    #[test]
    fn test_submit_before_start_fails() {
        let pool = ThreadPool::new();
        assert!(!pool.submit(|| {}));
    }

    #[test]
    fn test_drain_waits_for_all_jobs() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(4));

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            assert!(pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        pool.drain();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert!(pool.shutdown());
    }

    #[test]
    fn test_drain_includes_in_flight_jobs() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(1));

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let counter = Arc::clone(&counter);
            assert!(pool.submit(move || {
                std::thread::sleep(std::time::Duration::from_millis(10));
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        // With a single executor the queue can look empty while the last job
        // is still running; drain must still wait for it.
        pool.drain();
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert!(pool.shutdown());
    }

    #[test]
    fn test_shutdown_twice_fails() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(1));
        assert!(pool.shutdown());
        assert!(!pool.shutdown());
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(1));
        assert!(pool.shutdown());
        assert!(!pool.submit(|| {}));
    }

    #[test]
    fn test_restart_after_shutdown() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(1));
        assert!(pool.shutdown());
        assert!(pool.start(2));

        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        assert!(pool.submit(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        pool.drain();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_jobs_run_fifo_on_single_thread() {
        let mut pool = ThreadPool::new();
        assert!(pool.start(1));

        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let order = Arc::clone(&order);
            assert!(pool.submit(move || {
                order.lock().push(i);
            }));
        }
        pool.drain();
        assert_eq!(*order.lock(), (0..10).collect::<Vec<_>>());
    }
}
