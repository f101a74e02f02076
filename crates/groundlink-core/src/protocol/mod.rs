//! Telemetry packet protocol (header codec + datagram framing).
//!
//! One datagram is `PacketHeader ++ compressed point-cloud region ++ frontier
//! region`, where the header declares the byte length of both trailing
//! regions. All parsers here are panic-free: malformed input is reported as
//! `GroundLinkError::Format` instead of indexing raw buffers, keeping the
//! relay resilient to truncated or hostile traffic.

pub mod frame;
pub mod header;
