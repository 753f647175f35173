//! Transport configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, TransportError};
use crate::{
    DEFAULT_JOIN_TIMEOUT, DEFAULT_LOG_CAPACITY, DEFAULT_RECEIVE_PORT, DEFAULT_RECEIVE_TIMEOUT,
    DEFAULT_SEND_HOST, DEFAULT_SEND_PORT,
};

/// UDP transport configuration
///
/// Changing ports or host on a live manager goes through the
/// tear-down-then-rebind path in [`setup`](crate::OscManager::setup);
/// sockets are never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Port the receive socket binds on (`0.0.0.0:receive_port`)
    pub receive_port: u16,
    /// Default destination port for outbound messages
    pub send_port: u16,
    /// Default destination host for outbound messages
    pub send_host: String,
    /// Bounded socket read timeout; the stop flag is observed at least once
    /// per interval
    pub receive_timeout: Duration,
    /// Upper bound on waiting for the receive loop to exit during stop
    pub join_timeout: Duration,
    /// Capacity of the bounded message log
    pub log_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            receive_port: DEFAULT_RECEIVE_PORT,
            send_port: DEFAULT_SEND_PORT,
            send_host: DEFAULT_SEND_HOST.to_string(),
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl TransportConfig {
    /// Resolve an optional `"host[:port]"` override into a `host:port`
    /// destination string, falling back to the configured defaults.
    ///
    /// A bare host uses the configured `send_port`.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<String> {
        match target {
            None => Ok(format!("{}:{}", self.send_host, self.send_port)),
            Some(target) => match target.rsplit_once(':') {
                Some((host, port)) => {
                    let port: u16 = port.parse().map_err(|_| {
                        TransportError::configuration(format!(
                            "invalid port in send target {:?}",
                            target
                        ))
                    })?;
                    Ok(format!("{}:{}", host, port))
                }
                None => Ok(format!("{}:{}", target, self.send_port)),
            },
        }
    }
}
