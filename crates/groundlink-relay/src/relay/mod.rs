//! Relay state machine: one receive-decode-reframe-send cycle per call.
//!
//! A `Relay` is owned by a single worker for its whole Running lifetime; the
//! host drives it explicitly (`start` → `process_one` loop → `stop`) and
//! delivers cancellation by simply not calling `process_one` again. No state
//! survives a cycle: each datagram is validated, decoded, re-framed, and sent
//! (or dropped) before the next receive begins, so a slow decode throttles
//! receive throughput by design — stale packets beat unbounded queuing on a
//! fire-and-forget transport.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;

use groundlink_core::cloud::{NullDecoder, PointCloudDecoder, WireDecoder};
use groundlink_core::error::{ErrorKind, Result};
use groundlink_core::protocol::frame;
use groundlink_core::protocol::header::MAX_DATAGRAM_LEN;

use crate::config::{DecoderKind, RelayConfig};
use crate::obs::RelayMetrics;

/// Yield while Stopped so a misbehaving host loop cannot busy-spin.
const STOPPED_YIELD: Duration = Duration::from_millis(50);

/// Brief yield after a receive error before the next cycle.
const RECV_ERROR_YIELD: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Stopped,
    Running,
}

/// Per-cycle outcome reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// One datagram received, transcoded, and sent.
    Relayed { points: usize, bytes: usize },
    /// One datagram received and discarded (no partial send).
    Dropped(ErrorKind),
    /// Nothing processed (Stopped, or the receive itself failed).
    Idle,
}

struct Sockets {
    recv: UdpSocket,
    send: UdpSocket,
}

pub struct Relay {
    cfg: RelayConfig,
    decoder: Arc<dyn PointCloudDecoder>,
    metrics: Arc<RelayMetrics>,
    sockets: Option<Sockets>,
    /// Reused across cycles; bounds one UDP receive.
    buf: Vec<u8>,
}

impl Relay {
    pub fn new(cfg: RelayConfig) -> Self {
        let decoder: Arc<dyn PointCloudDecoder> = match cfg.relay.decoder {
            DecoderKind::Wire => Arc::new(WireDecoder),
            DecoderKind::None => Arc::new(NullDecoder),
        };
        let buf = vec![0u8; cfg.relay.recv_buffer_bytes.min(MAX_DATAGRAM_LEN)];
        Self {
            cfg,
            decoder,
            metrics: Arc::new(RelayMetrics::default()),
            sockets: None,
            buf,
        }
    }

    pub fn state(&self) -> RelayState {
        if self.sockets.is_some() {
            RelayState::Running
        } else {
            RelayState::Stopped
        }
    }

    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Local address of the receive socket while Running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.sockets.as_ref().and_then(|s| s.recv.local_addr().ok())
    }

    /// Bind the receive socket and connect the send socket to the configured
    /// destination. On failure the relay stays Stopped and the caller must
    /// not begin cycling. A no-op while already Running.
    pub async fn start(&mut self, recv_port: u16) -> Result<()> {
        if self.sockets.is_some() {
            return Ok(());
        }

        let recv = UdpSocket::bind(("0.0.0.0", recv_port)).await.map_err(|e| {
            tracing::error!(recv_port, error = %e, "receive socket bind failed");
            e
        })?;
        let send = UdpSocket::bind(("0.0.0.0", 0)).await.map_err(|e| {
            tracing::error!(error = %e, "send socket bind failed");
            e
        })?;
        let dest = (self.cfg.relay.dest_host.as_str(), self.cfg.relay.dest_port);
        send.connect(dest).await.map_err(|e| {
            tracing::error!(
                dest_host = %self.cfg.relay.dest_host,
                dest_port = self.cfg.relay.dest_port,
                error = %e,
                "send socket connect failed"
            );
            e
        })?;

        tracing::info!(
            recv_port,
            dest_host = %self.cfg.relay.dest_host,
            dest_port = self.cfg.relay.dest_port,
            "relay started"
        );
        self.sockets = Some(Sockets { recv, send });
        Ok(())
    }

    /// Run one cycle. The receive is the only suspension point; everything
    /// after it completes without yielding back to the host.
    pub async fn process_one(&mut self) -> CycleOutcome {
        let Some(sockets) = &self.sockets else {
            tokio::time::sleep(STOPPED_YIELD).await;
            return CycleOutcome::Idle;
        };

        let n = match sockets.recv.recv(&mut self.buf).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "receive failed");
                tokio::time::sleep(RECV_ERROR_YIELD).await;
                return CycleOutcome::Idle;
            }
        };
        self.metrics.packets_received.inc(&[]);

        match run_cycle(self.decoder.as_ref(), &sockets.send, &self.buf[..n]).await {
            Ok((points, bytes)) => {
                self.metrics.packets_relayed.inc(&[]);
                self.metrics.bytes_relayed.add(&[], bytes as u64);
                CycleOutcome::Relayed { points, bytes }
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(error = %e, kind = kind.as_str(), "packet dropped");
                self.metrics
                    .packets_dropped
                    .inc(&[("reason", kind.as_str())]);
                CycleOutcome::Dropped(kind)
            }
        }
    }

    /// Release both sockets. Idempotent.
    pub fn stop(&mut self) {
        if self.sockets.take().is_some() {
            tracing::info!("relay stopped");
        }
    }
}

/// Validate, decode, re-frame, send. Any error drops the whole packet; no
/// partial datagram is ever sent.
async fn run_cycle(
    decoder: &dyn PointCloudDecoder,
    send: &UdpSocket,
    datagram: &[u8],
) -> Result<(usize, usize)> {
    let inbound = frame::split_datagram(datagram)?;
    let positions = decoder.decode(inbound.cloud)?;

    // Decoded floats go out raw, native order, matching the header floats.
    let mut cloud_bytes = Vec::with_capacity(positions.len() * 4);
    for v in &positions {
        cloud_bytes.extend_from_slice(&v.to_ne_bytes());
    }

    tracing::debug!(
        odom = ?inbound.header.odom,
        quaternion = ?inbound.header.quaternion,
        rcgoal = ?inbound.header.rcgoal,
        cloud_in = inbound.cloud.len(),
        cloud_out = cloud_bytes.len(),
        frontier = inbound.frontier.len(),
        points = positions.len() / 3,
        "relaying packet"
    );

    let out = frame::assemble_datagram(&inbound.header, &cloud_bytes, inbound.frontier)?;
    send.send(&out).await?;
    Ok((positions.len() / 3, out.len()))
}
