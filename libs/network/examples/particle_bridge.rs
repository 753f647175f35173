//! # Particle Bridge Demo
//!
//! Wires up an OSC manager over loopback and drives the particle-control
//! addresses an installation frontend would listen on:
//! - an address handler for `/particles/count`
//! - a global observer seeing every decoded message
//! - statistics and the recent-message log after traffic

use network::{OscManager, TransportConfig};
use std::time::Duration;
use types::OscValue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mut manager = OscManager::new(TransportConfig::default());
    manager.setup(Some(0), None, None).await?;
    let port = manager
        .local_addr()
        .expect("bound manager reports its address")
        .port();
    let target = format!("127.0.0.1:{}", port);
    println!("OSC endpoint listening on {}", target);

    manager.register_handler("/particles/count", |msg| {
        println!("particle count handler: {}", msg);
        Ok(())
    });

    manager.set_observer_callback(|address, args| {
        println!("observer saw {} with {} args", address, args.len());
        Ok(())
    });

    manager
        .send("/particles/count", &[OscValue::Int32(4200)], Some(&target))
        .await?;
    manager
        .send(
            "/zones/close",
            &[OscValue::Float32(0.75), OscValue::Bool(true)],
            Some(&target),
        )
        .await?;

    // Give the receive loop a moment to dispatch both datagrams.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stats = manager.get_statistics();
    println!(
        "sent={} received={} logged={} handlers={}",
        stats.messages_sent, stats.messages_received, stats.queue_size, stats.handlers_registered
    );
    for msg in manager.get_recent_messages(10) {
        println!("log entry: {}", msg);
    }

    manager.stop_listening().await?;
    Ok(())
}
