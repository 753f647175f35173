//! UDP transport
//!
//! Owns the two UDP sockets and the background receive loop. The receive
//! socket is used only by the loop task; the send socket only by caller
//! tasks; neither is ever shared across those roles.
//!
//! State machine: `Uninitialized → Bound → Stopped`. Rebinding while bound
//! goes through an internal stop first, so a live transport can never hold
//! two receive loops or collide with its own previous binding.

use bytes::BytesMut;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, TransportError};
use crate::log::MessageLog;
use crate::stats::StatsTracker;
use types::OscValue;

/// Live socket state, present only between setup and stop.
struct BoundState {
    send_socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    stop: Arc<AtomicBool>,
    receive_task: JoinHandle<()>,
}

/// Bidirectional UDP endpoint with a background receive loop.
pub struct OscTransport {
    config: TransportConfig,
    dispatcher: Arc<Dispatcher>,
    log: Arc<MessageLog>,
    stats: Arc<StatsTracker>,
    bound: Option<BoundState>,
}

impl OscTransport {
    pub fn new(
        config: TransportConfig,
        dispatcher: Arc<Dispatcher>,
        log: Arc<MessageLog>,
        stats: Arc<StatsTracker>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            log,
            stats,
            bound: None,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Whether the receive loop is currently running.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Local address of the receive socket, once bound. With a configured
    /// port of 0 this reports the OS-assigned port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.bound.as_ref().map(|state| state.local_addr)
    }

    /// Bind both sockets and start the receive loop.
    ///
    /// Idempotent with respect to rebinding: an already-bound transport is
    /// stopped and its sockets closed before the new binding, preventing
    /// address-in-use failures and duplicate loops. Bind failures are fatal
    /// and surfaced to the caller.
    pub async fn setup(&mut self, config: TransportConfig) -> Result<()> {
        if self.bound.is_some() {
            debug!("transport already bound, tearing down before rebind");
            self.stop().await?;
        }
        self.config = config;

        let bind_addr: SocketAddr = ([0, 0, 0, 0], self.config.receive_port).into();
        let receive_socket = bind_reuse(bind_addr)?;
        let local_addr = receive_socket
            .local_addr()
            .map_err(|e| TransportError::io("failed to read local address", e))?;

        // Send socket needs no fixed port; the OS picks one.
        let send_addr: SocketAddr = ([0, 0, 0, 0], 0).into();
        let send_socket = std::net::UdpSocket::bind(send_addr)
            .and_then(|socket| {
                socket.set_nonblocking(true)?;
                UdpSocket::from_std(socket)
            })
            .map_err(|e| TransportError::io("failed to open send socket", e))?;

        let stop = Arc::new(AtomicBool::new(false));
        let receive_task = tokio::spawn(receive_loop(
            receive_socket,
            stop.clone(),
            self.config.receive_timeout,
            self.dispatcher.clone(),
            self.log.clone(),
            self.stats.clone(),
        ));

        info!(
            %local_addr,
            send_host = %self.config.send_host,
            send_port = self.config.send_port,
            "OSC transport bound, receive loop started"
        );

        self.bound = Some(BoundState {
            send_socket: Arc::new(send_socket),
            local_addr,
            stop,
            receive_task,
        });
        Ok(())
    }

    /// Encode and transmit one datagram.
    ///
    /// The destination is `target` (`"host[:port]"`, bare host using the
    /// configured send port) or the configured `send_host:send_port`.
    /// Encoding failures surface before any I/O; UDP delivery is not
    /// acknowledged and never retried.
    pub async fn send(
        &self,
        address: &str,
        args: &[OscValue],
        target: Option<&str>,
    ) -> Result<()> {
        let state = self.bound.as_ref().ok_or(TransportError::NotBound)?;
        let payload = codec::encode(address, args)?;
        let destination = self.config.resolve_target(target)?;

        state
            .send_socket
            .send_to(&payload, destination.as_str())
            .await
            .map_err(|e| TransportError::io(format!("failed to send to {}", destination), e))?;

        self.stats.record_send();
        debug!(%address, %destination, bytes = payload.len(), "sent OSC message");
        Ok(())
    }

    /// Stop the receive loop and close both sockets.
    ///
    /// Cooperative: sets the stop flag, then waits for the loop task to
    /// observe it, bounded by the configured join timeout. The sockets are
    /// dropped only after the task has exited. On a join timeout the task is
    /// aborted and a timeout error surfaced instead of hanging.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(state) = self.bound.take() else {
            return Ok(());
        };
        state.stop.store(true, Ordering::Release);

        let mut receive_task = state.receive_task;
        let join_timeout = self.config.join_timeout;
        if timeout(join_timeout, &mut receive_task).await.is_err() {
            receive_task.abort();
            warn!("receive loop did not exit within join timeout");
            return Err(TransportError::timeout(
                "receive loop join",
                join_timeout.as_millis() as u64,
            ));
        }

        info!("OSC transport stopped");
        Ok(())
    }
}

/// Bind a UDP socket with SO_REUSEADDR and hand it to tokio.
///
/// tokio's own `UdpSocket::bind` cannot set the option, so the socket is
/// created through socket2 and converted.
fn bind_reuse(addr: SocketAddr) -> Result<UdpSocket> {
    let make = || -> std::io::Result<UdpSocket> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;
        UdpSocket::from_std(socket.into())
    };
    make().map_err(|source| TransportError::Bind { addr, source })
}

/// Background receive loop: read, decode, record, dispatch.
///
/// Runs until the stop flag is observed. The bounded read timeout is the
/// only suspension point, so the flag is checked at least once per interval.
/// A single bad read never terminates the loop.
async fn receive_loop(
    socket: UdpSocket,
    stop: Arc<AtomicBool>,
    receive_timeout: Duration,
    dispatcher: Arc<Dispatcher>,
    log: Arc<MessageLog>,
    stats: Arc<StatsTracker>,
) {
    let mut buf = BytesMut::zeroed(codec::MAX_DATAGRAM_SIZE);
    debug!("receive loop running");

    while !stop.load(Ordering::Acquire) {
        match timeout(receive_timeout, socket.recv_from(&mut buf)).await {
            // Read timeout: loop back and re-check the stop flag.
            Err(_) => continue,
            Ok(Ok((len, peer))) => match codec::decode(&buf[..len]) {
                Ok(message) => {
                    stats.record_receive();
                    log.push(message.clone());
                    debug!(%peer, address = %message.address, args = message.args.len(), "received OSC message");
                    dispatcher.dispatch(&message);
                }
                Err(error) => {
                    debug!(%peer, %error, bytes = len, "dropping malformed datagram");
                }
            },
            Ok(Err(error)) => {
                if !stop.load(Ordering::Acquire) {
                    warn!(%error, "UDP receive error");
                }
            }
        }
    }

    debug!("receive loop exited");
}
