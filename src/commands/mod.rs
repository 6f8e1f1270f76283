//! CLI command implementations for storymill.
//!
//! - [`run`] - the whole pipeline in one process over the in-process fabric
//! - [`node`] - one member of a five-process group over the TCP fabric

pub mod command;
pub mod node;
pub mod run;
