//! Order-indexed result buffer shared by the collector threads.
//!
//! Every dispatcher derives the same file-wide paragraph count from its own
//! full scan of the input, so all four arrive at an identical buffer size.
//! Exactly one of them performs the allocation, decided by an atomic
//! test-and-set flag; the others observe the flag already taken and skip it.
//!
//! Element writes need no per-slot lock: each paragraph's header line maps it
//! to exactly one category, so exactly one collector ever stores a given
//! index. Slots are single-assignment [`OnceLock`] cells rather than mutexes
//! precisely so a violation of that partitioning invariant surfaces as an
//! error instead of being silently serialized away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::category::Category;
use crate::errors::{Result, StorymillError};

/// A paragraph keyed by its 0-based position among all paragraphs in the
/// input file, regardless of category. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub index: usize,
    pub category: Category,
    /// Paragraph lines, newline-joined, no trailing newline.
    pub body: String,
}

/// Shared buffer of transformed paragraphs, indexed by global index.
#[derive(Debug, Default)]
pub struct ResultBuffer {
    /// Test-and-set flag deciding which dispatcher allocates the slots.
    claimed: AtomicBool,
    slots: OnceLock<Vec<OnceLock<Paragraph>>>,
}

impl ResultBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the buffer exactly once.
    ///
    /// The first caller wins the flag and performs the allocation; later
    /// callers are no-ops. Returns `true` for the caller that allocated.
    /// Every dispatcher must call this after its scan and before its
    /// collector stores anything, which guarantees the slots exist before
    /// any [`store`](Self::store).
    pub fn init_once(&self, len: usize) -> bool {
        if self.claimed.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
        {
            let slots = (0..len).map(|_| OnceLock::new()).collect();
            // The flag was won exactly once, so this set cannot race.
            self.slots.set(slots).ok();
            return true;
        }
        // A loser may observe the flag before the winner's allocation lands;
        // the window is a handful of instructions, so spinning is enough.
        while self.slots.get().is_none() {
            std::thread::yield_now();
        }
        false
    }

    /// Number of slots, if the buffer has been sized.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.slots.get().map(Vec::len)
    }

    /// Store a transformed paragraph at its global index.
    ///
    /// Out-of-range indices and double stores are protocol violations: both
    /// ends run the same state machine, so they indicate a programming error
    /// rather than a condition to recover from.
    pub fn store(&self, paragraph: Paragraph) -> Result<()> {
        let peer = paragraph.category.label().to_string();
        let slots = self.slots.get().ok_or_else(|| StorymillError::ProtocolViolation {
            peer: peer.clone(),
            reason: "paragraph stored before the buffer was sized".to_string(),
        })?;
        let slot =
            slots.get(paragraph.index).ok_or_else(|| StorymillError::ProtocolViolation {
                peer: peer.clone(),
                reason: format!(
                    "paragraph index {} out of range for {} paragraphs",
                    paragraph.index,
                    slots.len()
                ),
            })?;
        let index = paragraph.index;
        slot.set(paragraph).map_err(|_| StorymillError::ProtocolViolation {
            peer,
            reason: format!("two paragraphs stored at index {index}"),
        })
    }

    /// Consume the buffer in increasing index order.
    ///
    /// Only meaningful after every collector thread has joined. Unfilled
    /// slots come back as `None` (they can arise from stray blank lines in
    /// the input inflating the shared count).
    #[must_use]
    pub fn into_paragraphs(self) -> Vec<Option<Paragraph>> {
        match self.slots.into_inner() {
            Some(slots) => slots.into_iter().map(OnceLock::into_inner).collect(),
            None => Vec::new(),
        }
    }
}
