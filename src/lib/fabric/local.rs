//! In-process fabric over crossbeam channels.
//!
//! Used by the single-binary `run` command and by tests: all five roles live
//! in one process, one thread (or thread group) per role, with a pair of
//! unbounded channels standing in for each coordinator-worker link.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::category::Category;
use crate::errors::{Result, StorymillError};
use crate::fabric::Channel;

/// One end of an in-process link.
pub struct LocalChannel {
    peer: String,
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl Channel for LocalChannel {
    fn peer(&self) -> &str {
        &self.peer
    }

    fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.tx
            .send(payload.to_vec())
            .map_err(|_| StorymillError::Disconnected { peer: self.peer.clone() })
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        self.rx.recv().map_err(|_| StorymillError::Disconnected { peer: self.peer.clone() })
    }
}

/// Create a cross-wired pair of channel ends.
///
/// The first end reports `first_peer` as its remote role, the second end
/// `second_peer`.
#[must_use]
pub fn channel_pair(first_peer: &str, second_peer: &str) -> (LocalChannel, LocalChannel) {
    let (a_tx, b_rx) = unbounded();
    let (b_tx, a_rx) = unbounded();
    (
        LocalChannel { peer: first_peer.to_string(), tx: a_tx, rx: a_rx },
        LocalChannel { peer: second_peer.to_string(), tx: b_tx, rx: b_rx },
    )
}

/// Form the full in-process group: one link per category.
///
/// Returns the coordinator's ends and the workers' ends, both in
/// [`Category::ALL`] order.
#[must_use]
pub fn local_process_group() -> (Vec<(Category, LocalChannel)>, Vec<(Category, LocalChannel)>) {
    let mut coordinator_ends = Vec::with_capacity(Category::ALL.len());
    let mut worker_ends = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let (coordinator_end, worker_end) = channel_pair(category.label(), "coordinator");
        coordinator_ends.push((category, coordinator_end));
        worker_ends.push((category, worker_end));
    }
    (coordinator_ends, worker_ends)
}
