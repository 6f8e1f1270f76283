//! Point-to-point message fabric between the coordinator and the workers.
//!
//! The process group has a fixed topology: one coordinator and exactly one
//! worker per category, known at group-formation time. A [`Channel`] is one
//! end of a reliable, ordered link between the coordinator and a single
//! worker; receives observe sends in the order the peer issued them.
//!
//! Sends and receives are blocking, with no timeout. A peer that never sends
//! leaves its partner blocked until the link is dropped, at which point the
//! partner observes [`Disconnected`](crate::errors::StorymillError::Disconnected).
//! The shared protocol
//! statically guarantees matching message counts, so a healthy run never
//! relies on that escape hatch.
//!
//! Two implementations share identical payload bytes: [`local`] carries
//! messages over in-process channels for single-binary runs and tests, and
//! [`tcp`] carries them over sockets for true multi-process deployment.

pub mod local;
pub mod tcp;

use crate::errors::Result;

/// One end of an ordered, reliable, point-to-point message link.
///
/// Messages are discrete byte payloads; the fabric preserves their
/// boundaries. Protocol-level framing on top of these messages lives in
/// [`crate::wire`].
pub trait Channel: Send {
    /// Name of the role on the other end of the link, for diagnostics.
    fn peer(&self) -> &str;

    /// Send one message, blocking until the transport accepts it.
    fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Receive the next message, blocking until one arrives.
    fn recv(&mut self) -> Result<Vec<u8>>;
}
