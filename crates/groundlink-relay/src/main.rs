//! GroundLink relay worker.
//!
//! Receives telemetry datagrams on the configured UDP port, decompresses the
//! embedded point cloud, and re-frames each packet toward the local consumer.
//! The host lifecycle is explicit: start, drive `process_one` until
//! interrupted, stop.

use tracing_subscriber::{fmt, EnvFilter};

use groundlink_relay::{config, relay::Relay};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "groundlink.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");

    let recv_port = cfg.relay.recv_port;
    let mut relay = Relay::new(cfg);
    relay.start(recv_port).await.expect("relay start failed");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = relay.process_one() => {}
        }
    }

    relay.stop();
}
