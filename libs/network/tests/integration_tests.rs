//! Integration Tests for the OSC Network Layer
//!
//! Exercises the full manager surface over real loopback sockets:
//! - wire round trips for float and boolean arguments
//! - dispatch isolation between failing and healthy callbacks
//! - malformed-datagram survival of the receive loop
//! - bounded shutdown and idempotent rebinding
//! - statistics and message-log bookkeeping

use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::timeout;

use network::{OscManager, TransportConfig};
use types::{OscMessage, OscValue};

const RECV_DEADLINE: Duration = Duration::from_secs(2);

/// Manager bound to an ephemeral port, plus the loopback target string
/// other tests can send to.
async fn ephemeral_manager() -> (OscManager, String) {
    let mut manager = OscManager::new(TransportConfig::default());
    manager
        .setup(Some(0), None, None)
        .await
        .expect("setup on an ephemeral port should succeed");
    let addr = manager
        .local_addr()
        .expect("bound manager must report its local address");
    (manager, format!("127.0.0.1:{}", addr.port()))
}

#[test_log::test(tokio::test)]
async fn float_round_trip_over_loopback() {
    let (manager, target) = ephemeral_manager().await;

    let (tx, mut rx) = mpsc::unbounded_channel::<OscMessage>();
    manager.register_handler("/zones/close", move |msg| {
        tx.send(msg.clone())?;
        Ok(())
    });

    manager
        .send("/zones/close", &[OscValue::Float32(0.75)], Some(&target))
        .await
        .expect("loopback send should succeed");

    let msg = timeout(RECV_DEADLINE, rx.recv())
        .await
        .expect("message should arrive within the deadline")
        .expect("handler channel should stay open");

    assert_eq!(msg.address, "/zones/close");
    match msg.args.as_slice() {
        [OscValue::Float32(value)] => {
            // Single precision travels unmodified; the round trip is bit-exact.
            assert_eq!(value.to_bits(), 0.75_f32.to_bits());
        }
        other => panic!("expected one float argument, got {:?}", other),
    }

    let stats = manager.get_statistics();
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.messages_received, 1);
    assert!(stats.last_send_time.is_some());
    assert!(stats.last_receive_time.is_some());
}

#[test_log::test(tokio::test)]
async fn boolean_true_invokes_handler_exactly_once() {
    let (manager, target) = ephemeral_manager().await;

    let (tx, mut rx) = mpsc::unbounded_channel::<OscMessage>();
    manager.register_handler("/kinect/enable", move |msg| {
        tx.send(msg.clone())?;
        Ok(())
    });

    manager
        .send("/kinect/enable", &[OscValue::Bool(true)], Some(&target))
        .await
        .expect("loopback send should succeed");

    let msg = timeout(RECV_DEADLINE, rx.recv())
        .await
        .expect("message should arrive within the deadline")
        .expect("handler channel should stay open");
    assert_eq!(msg.args, vec![OscValue::Bool(true)]);

    // The T tag carries no argument bytes and must dispatch exactly once.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        rx.try_recv().is_err(),
        "handler must not be invoked a second time"
    );
}

#[test_log::test(tokio::test)]
async fn failing_handler_blocks_neither_observer_nor_next_message() {
    let (manager, target) = ephemeral_manager().await;

    let (observed_tx, mut observed_rx) = mpsc::unbounded_channel::<String>();
    let (handled_tx, mut handled_rx) = mpsc::unbounded_channel::<String>();

    manager.register_handler("/a", |_| Err(anyhow::anyhow!("handler exploded")));
    manager.register_handler("/b", move |msg| {
        handled_tx.send(msg.address.clone())?;
        Ok(())
    });
    manager.set_observer_callback(move |address, _args| {
        observed_tx.send(address.to_string())?;
        Ok(())
    });

    manager
        .send("/a", &[OscValue::Int32(1)], Some(&target))
        .await
        .expect("send of /a should succeed");

    // The observer still fires for the message whose handler failed.
    let first = timeout(RECV_DEADLINE, observed_rx.recv())
        .await
        .expect("observer should run for /a")
        .expect("observer channel should stay open");
    assert_eq!(first, "/a");

    // A subsequently arriving message dispatches normally.
    manager
        .send("/b", &[OscValue::Int32(2)], Some(&target))
        .await
        .expect("send of /b should succeed");

    let handled = timeout(RECV_DEADLINE, handled_rx.recv())
        .await
        .expect("handler for /b should run after /a failed")
        .expect("handler channel should stay open");
    assert_eq!(handled, "/b");

    let second = timeout(RECV_DEADLINE, observed_rx.recv())
        .await
        .expect("observer should run for /b")
        .expect("observer channel should stay open");
    assert_eq!(second, "/b");
}

#[test_log::test(tokio::test)]
async fn malformed_datagrams_are_dropped_not_counted() {
    let (manager, target) = ephemeral_manager().await;

    let (tx, mut rx) = mpsc::unbounded_channel::<OscMessage>();
    manager.register_handler("/valid", move |msg| {
        tx.send(msg.clone())?;
        Ok(())
    });

    // Raw garbage straight onto the wire, bypassing the encoder.
    let raw = std::net::UdpSocket::bind("127.0.0.1:0").expect("raw socket should bind");
    raw.send_to(&[0xFF; 32], &target)
        .expect("raw garbage send should succeed");
    raw.send_to(b"no-slash\0\0\0\0,\0\0\0", &target)
        .expect("raw malformed send should succeed");

    // A valid message after the garbage proves the loop survived it.
    manager
        .send("/valid", &[OscValue::Int32(9)], Some(&target))
        .await
        .expect("valid send should succeed");

    let msg = timeout(RECV_DEADLINE, rx.recv())
        .await
        .expect("valid message should still arrive")
        .expect("handler channel should stay open");
    assert_eq!(msg.args, vec![OscValue::Int32(9)]);

    let stats = manager.get_statistics();
    assert_eq!(
        stats.messages_received, 1,
        "dropped datagrams must not be counted as received"
    );
    assert_eq!(manager.get_recent_messages(10).len(), 1);
}

#[test_log::test(tokio::test)]
async fn recent_messages_are_newest_last() {
    let (manager, target) = ephemeral_manager().await;

    let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
    manager.register_handler("/seq", move |msg| {
        if let Some(OscValue::Int32(n)) = msg.args.first() {
            tx.send(*n)?;
        }
        Ok(())
    });

    // Await each dispatch before sending the next so arrival order is fixed.
    for n in 0..3 {
        manager
            .send("/seq", &[OscValue::Int32(n)], Some(&target))
            .await
            .expect("sequential send should succeed");
        let echoed = timeout(RECV_DEADLINE, rx.recv())
            .await
            .expect("sequential message should arrive")
            .expect("handler channel should stay open");
        assert_eq!(echoed, n);
    }

    let recent: Vec<_> = manager
        .get_recent_messages(2)
        .into_iter()
        .map(|msg| msg.args[0].clone())
        .collect();
    assert_eq!(recent, vec![OscValue::Int32(1), OscValue::Int32(2)]);
}

#[test_log::test(tokio::test)]
async fn shutdown_is_bounded_and_idempotent() {
    let (mut manager, _target) = ephemeral_manager().await;
    assert!(manager.is_listening());

    let start = Instant::now();
    manager
        .stop_listening()
        .await
        .expect("stop should succeed while the loop is idle");
    let elapsed = start.elapsed();

    // One receive-timeout cycle plus scheduling slack, well inside the join bound.
    assert!(
        elapsed < Duration::from_secs(3),
        "stop took {:?}, expected bounded shutdown",
        elapsed
    );
    assert!(!manager.is_listening());
    assert!(manager.local_addr().is_none());

    // Stopping an already-stopped manager is a no-op.
    manager
        .stop_listening()
        .await
        .expect("second stop should be a no-op");
}

#[test_log::test(tokio::test)]
async fn rebinding_a_live_manager_tears_down_first() {
    let (mut manager, _target) = ephemeral_manager().await;
    assert!(manager.is_listening());

    manager
        .setup(Some(0), None, None)
        .await
        .expect("rebind while bound should tear down and succeed");
    let second_addr = manager.local_addr().expect("rebind should report address");
    assert!(manager.is_listening());

    let target = format!("127.0.0.1:{}", second_addr.port());
    let (tx, mut rx) = mpsc::unbounded_channel::<OscMessage>();
    manager.register_handler("/after/rebind", move |msg| {
        tx.send(msg.clone())?;
        Ok(())
    });
    manager
        .send("/after/rebind", &[OscValue::Bool(false)], Some(&target))
        .await
        .expect("send after rebind should succeed");

    let msg = timeout(RECV_DEADLINE, rx.recv())
        .await
        .expect("message should arrive on the rebound socket")
        .expect("handler channel should stay open");
    assert_eq!(msg.args, vec![OscValue::Bool(false)]);
}

#[test_log::test(tokio::test)]
async fn send_requires_setup() {
    let manager = OscManager::with_defaults();
    let result = manager.send("/too/early", &[], None).await;
    assert!(
        matches!(result, Err(network::TransportError::NotBound)),
        "send before setup must fail without I/O"
    );
}

#[test_log::test(tokio::test)]
async fn encode_failure_surfaces_before_any_io() {
    let (manager, _target) = ephemeral_manager().await;
    let before = manager.get_statistics().messages_sent;

    let result = manager.send("missing-slash", &[], None).await;
    assert!(
        matches!(result, Err(network::TransportError::Encode(_))),
        "invalid address must fail synchronously"
    );
    assert_eq!(
        manager.get_statistics().messages_sent,
        before,
        "a failed encode must not count as a send"
    );
}

#[test_log::test(tokio::test)]
async fn bare_host_target_uses_configured_send_port() {
    // Configure the manager so its default send target is its own receive
    // socket, then exercise the bare-host override form.
    let mut manager = OscManager::new(TransportConfig::default());
    manager
        .setup(Some(0), None, None)
        .await
        .expect("setup should succeed");
    let port = manager
        .local_addr()
        .expect("bound manager must report address")
        .port();
    manager
        .setup(Some(port), Some(port), Some("127.0.0.1"))
        .await
        .expect("rebind on the same port should succeed after teardown");

    let (tx, mut rx) = mpsc::unbounded_channel::<OscMessage>();
    manager.register_handler("/bare/host", move |msg| {
        tx.send(msg.clone())?;
        Ok(())
    });

    // Bare host, no colon: the configured send_port applies.
    manager
        .send("/bare/host", &[OscValue::Str("fog".into())], Some("127.0.0.1"))
        .await
        .expect("bare-host send should succeed");

    let msg = timeout(RECV_DEADLINE, rx.recv())
        .await
        .expect("bare-host message should arrive")
        .expect("handler channel should stay open");
    assert_eq!(msg.args, vec![OscValue::Str("fog".to_string())]);
}
