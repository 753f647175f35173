//! Bounded message log
//!
//! Fixed-capacity record of decoded messages in arrival order. Overflow
//! evicts the oldest entry, so the log never grows past its capacity and
//! pushes never block on anything but the lock itself.

use parking_lot::Mutex;
use std::collections::VecDeque;
use types::OscMessage;

/// Bounded FIFO of recently received messages.
#[derive(Debug)]
pub struct MessageLog {
    entries: Mutex<VecDeque<OscMessage>>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a message, evicting the oldest entry when full.
    pub fn push(&self, message: OscMessage) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message);
    }

    /// The last `count` messages in arrival order, newest last.
    pub fn recent(&self, count: usize) -> Vec<OscMessage> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
