//! Communication statistics
//!
//! Counters and timestamps mutated on the hot send/receive paths and read
//! via snapshot. One writer class (the receive loop) and any number of
//! caller threads share the tracker, so the inner state sits behind a lock.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Default, Clone)]
struct StatsInner {
    messages_sent: u64,
    messages_received: u64,
    last_send_time: Option<DateTime<Utc>>,
    last_receive_time: Option<DateTime<Utc>>,
}

/// Monotonic counters and last-activity timestamps for the OSC layer.
#[derive(Debug, Default)]
pub struct StatsTracker {
    inner: RwLock<StatsInner>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully transmitted datagram.
    pub fn record_send(&self) {
        let mut inner = self.inner.write();
        inner.messages_sent += 1;
        inner.last_send_time = Some(Utc::now());
    }

    /// Record one successfully decoded inbound message. Malformed datagrams
    /// are dropped before this point and never counted.
    pub fn record_receive(&self) {
        let mut inner = self.inner.write();
        inner.messages_received += 1;
        inner.last_receive_time = Some(Utc::now());
    }

    /// Read-only snapshot, combined with context the manager supplies from
    /// the log, registry, and transport state.
    pub fn snapshot(&self, queue_size: usize, handlers_registered: usize, listening: bool) -> OscStats {
        let inner = self.inner.read();
        OscStats {
            messages_sent: inner.messages_sent,
            messages_received: inner.messages_received,
            last_send_time: inner.last_send_time,
            last_receive_time: inner.last_receive_time,
            queue_size,
            handlers_registered,
            listening,
        }
    }
}

/// Point-in-time view of the communication statistics.
#[derive(Debug, Clone, Serialize)]
pub struct OscStats {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub last_send_time: Option<DateTime<Utc>>,
    pub last_receive_time: Option<DateTime<Utc>>,
    /// Current number of entries in the message log
    pub queue_size: usize,
    /// Current number of address handlers
    pub handlers_registered: usize,
    /// Whether the receive loop is running
    pub listening: bool,
}
