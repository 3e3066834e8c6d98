use crate::types::Sequence;
use parking_lot::Mutex;

/// Issues `ICMP` echo sequence numbers.
///
/// Numbers start at zero and wrap to zero after `65535`. A single `Sequencer` is meant to be
/// shared (via `Arc`) by every prober in the process so that concurrent checks never reuse a
/// sequence number within a wrap cycle.
#[derive(Debug, Default)]
pub struct Sequencer {
    next: Mutex<u16>,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Mutex::new(0),
        }
    }

    /// Return the current sequence number and advance the counter.
    pub fn next(&self) -> Sequence {
        let mut next = self.next.lock();
        let current = *next;
        *next = current.wrapping_add(1);
        Sequence(current)
    }
}
