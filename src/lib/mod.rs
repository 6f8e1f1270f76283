#![deny(unsafe_code)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # storymill - distributed paragraph transformation
//!
//! This library splits a genre-labeled text file into paragraphs, routes each
//! paragraph to the worker owning its genre over a point-to-point message
//! fabric, transforms the paragraph's lines in parallel on the worker's
//! thread pool, and reassembles everything in original file order.
//!
//! ## Core modules
//!
//! - **[`category`]** - the four genres, their header labels and worker ranks
//! - **[`transform`]** - the per-genre pure line transforms
//! - **[`coordinator`]** - dispatcher/collector thread pairs and output writing
//! - **[`worker`]** - the per-genre worker role and its receive/send loops
//! - **[`pool`]** - single-producer FIFO thread pool for line batches
//! - **[`fabric`]** - the message fabric (in-process and TCP implementations)
//! - **[`wire`]** - protocol framing shared by both fabrics
//! - **[`buffer`]** - the order-indexed shared result buffer
//! - **[`node`]** - process-group roles and single-process wiring
//!
//! ## Utilities
//!
//! - **[`errors`]** - typed errors for transport and protocol failures
//! - **[`logging`]** - run-summary formatting helpers
//! - **[`progress`]** - interval progress logging
//! - **[`validation`]** - input file validation
//!
//! ## Protocol sketch
//!
//! Per category link, coordinator to worker: repeated `index, length, body`,
//! then the `-1` sentinel; worker to coordinator: the same shape in arrival
//! order. Global indices are derived independently by each dispatcher from
//! its own full scan of the input file, which makes the final reassembly a
//! plain array write with no cross-category coordination.

pub mod buffer;
pub mod category;
pub mod coordinator;
pub mod errors;
pub mod fabric;
pub mod logging;
pub mod node;
pub mod pool;
pub mod progress;
pub mod transform;
pub mod validation;
pub mod wire;
pub mod worker;

pub use buffer::{Paragraph, ResultBuffer};
pub use category::{Category, NUM_CATEGORIES};
pub use node::{run_local, Role, NUM_ROLES};
