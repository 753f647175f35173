//! # Fogbridge Network Layer
//!
//! Bidirectional OSC-over-UDP endpoint: a background receive loop feeding a
//! dispatcher, a bounded message log, and communication statistics, wired
//! together by an explicitly owned [`OscManager`].
//!
//! ## Control Flow
//!
//! ```text
//! receive loop → codec::decode → dispatch (handler + observer)
//!                       ↓              ↓
//!                drop + log     MessageLog / StatsTracker
//!
//! caller → OscManager::send → codec::encode → send socket
//! ```
//!
//! Consumers (hardware detection, the zone calculator, the performance
//! controller) interact exclusively through
//! [`register_handler`](OscManager::register_handler),
//! [`set_observer_callback`](OscManager::set_observer_callback), and
//! [`send`](OscManager::send).

pub mod config;
pub mod dispatch;
pub mod error;
pub mod log;
pub mod manager;
pub mod stats;
pub mod transport;

// Re-export commonly used types
pub use config::TransportConfig;
pub use dispatch::{Dispatcher, Handler, ObserverCallback};
pub use error::{Result, TransportError};
pub use log::MessageLog;
pub use manager::OscManager;
pub use stats::{OscStats, StatsTracker};
pub use transport::OscTransport;

use std::time::Duration;

// Constants for configuration
pub const DEFAULT_RECEIVE_PORT: u16 = 7000;
pub const DEFAULT_SEND_PORT: u16 = 7001;
pub const DEFAULT_SEND_HOST: &str = "localhost";
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_LOG_CAPACITY: usize = 1000;
