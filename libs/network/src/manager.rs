//! OSC manager
//!
//! Composition root for the OSC layer. Owns the transport, dispatcher,
//! message log, and stats tracker for its lifetime, and exposes the public
//! operations the rest of the installation talks to: hardware detection,
//! the zone calculator, and the performance controller only ever see this
//! surface, never sockets or codec internals.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::TransportConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::log::MessageLog;
use crate::stats::{OscStats, StatsTracker};
use crate::transport::OscTransport;
use types::{OscMessage, OscValue};

/// Explicitly constructed OSC endpoint. No ambient global state: every
/// manager owns its own sockets, registry, log, and counters.
pub struct OscManager {
    transport: OscTransport,
    dispatcher: Arc<Dispatcher>,
    log: Arc<MessageLog>,
    stats: Arc<StatsTracker>,
}

impl OscManager {
    /// Create a manager from configuration. No sockets are opened until
    /// [`setup`](Self::setup).
    pub fn new(config: TransportConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let log = Arc::new(MessageLog::new(config.log_capacity));
        let stats = Arc::new(StatsTracker::new());
        let transport = OscTransport::new(
            config,
            dispatcher.clone(),
            log.clone(),
            stats.clone(),
        );
        Self {
            transport,
            dispatcher,
            log,
            stats,
        }
    }

    /// Manager with the default configuration (receive 7000, send 7001,
    /// host "localhost").
    pub fn with_defaults() -> Self {
        Self::new(TransportConfig::default())
    }

    /// Bind sockets and start the receive loop, applying any overrides to
    /// the configured defaults. Rebinding a live manager tears the old
    /// sockets down first.
    pub async fn setup(
        &mut self,
        receive_port: Option<u16>,
        send_port: Option<u16>,
        send_host: Option<&str>,
    ) -> Result<()> {
        let mut config = self.transport.config().clone();
        if let Some(port) = receive_port {
            config.receive_port = port;
        }
        if let Some(port) = send_port {
            config.send_port = port;
        }
        if let Some(host) = send_host {
            config.send_host = host.to_string();
        }
        self.transport.setup(config).await
    }

    /// Stop the receive loop and close both sockets. Blocks at most the
    /// configured join timeout.
    pub async fn stop_listening(&mut self) -> Result<()> {
        self.transport.stop().await
    }

    /// Encode and transmit one message. `target` overrides the configured
    /// destination as `"host[:port]"`; a bare host keeps the configured
    /// send port. Never blocks on acknowledgment.
    pub async fn send(
        &self,
        address: &str,
        args: &[OscValue],
        target: Option<&str>,
    ) -> Result<()> {
        self.transport.send(address, args, target).await
    }

    /// Register a handler for an exact address, replacing any prior one.
    pub fn register_handler<F>(&self, address: impl Into<String>, handler: F)
    where
        F: Fn(&OscMessage) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.dispatcher.register_handler(address, handler);
    }

    /// Remove the handler for an address, if one is registered.
    pub fn unregister_handler(&self, address: &str) {
        self.dispatcher.unregister_handler(address);
    }

    /// Install the single global observer, invoked for every successfully
    /// decoded message in addition to any address handler.
    pub fn set_observer_callback<F>(&self, callback: F)
    where
        F: Fn(&str, &[OscValue]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.dispatcher.set_observer_callback(callback);
    }

    /// Read-only statistics snapshot.
    pub fn get_statistics(&self) -> OscStats {
        self.stats.snapshot(
            self.log.len(),
            self.dispatcher.handler_count(),
            self.transport.is_bound(),
        )
    }

    /// The last `count` logged messages in arrival order, newest last.
    pub fn get_recent_messages(&self, count: usize) -> Vec<OscMessage> {
        self.log.recent(count)
    }

    /// Whether the receive loop is currently running.
    pub fn is_listening(&self) -> bool {
        self.transport.is_bound()
    }

    /// Local address of the receive socket once listening. Reports the
    /// OS-assigned port when configured with port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.local_addr()
    }
}

impl std::fmt::Debug for OscManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscManager")
            .field("listening", &self.is_listening())
            .field("local_addr", &self.local_addr())
            .field("handlers", &self.dispatcher.handler_count())
            .field("logged", &self.log.len())
            .finish()
    }
}
